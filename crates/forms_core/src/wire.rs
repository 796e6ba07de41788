//! Request and response shapes of the two pricing endpoints.
//!
//! Requests carry numeric fields as text, exactly as read from the page.
//! Response scalars are kept as raw JSON and rendered verbatim.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Option type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallPut {
    /// Call option
    Call,
    /// Put option
    Put,
}

impl CallPut {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

/// Coupon payment frequency of a bond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponPeriodicity {
    /// Zero-coupon bond
    NoCoupon,
    /// Twelve coupons a year
    Monthly,
    /// Four coupons a year
    Quarterly,
    /// Two coupons a year
    SemiAnnual,
    /// One coupon a year
    Annual,
}

impl CouponPeriodicity {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCoupon => "no_coupon",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::SemiAnnual => "semi_annual",
            Self::Annual => "annual",
        }
    }
}

/// Wire names of optional selections; an absent selection is sent as an
/// empty value rather than dropped from the query string.
trait WireName {
    fn wire_name(&self) -> &'static str;
}

impl WireName for CallPut {
    fn wire_name(&self) -> &'static str {
        self.as_str()
    }
}

impl WireName for CouponPeriodicity {
    fn wire_name(&self) -> &'static str {
        self.as_str()
    }
}

fn serialize_selection<T, S>(selection: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: WireName,
    S: Serializer,
{
    serializer.serialize_str(selection.as_ref().map_or("", WireName::wire_name))
}

/// Query parameters of the option pricing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionPricingRequest {
    /// Spot price of the underlying
    pub underlying_price: String,
    /// Strike price
    pub strike_price: String,
    /// Risk-free rate
    pub rate: String,
    /// Time to maturity in years
    pub time_to_maturity: String,
    /// Volatility
    pub volatility: String,
    /// Selected option type, if any
    #[serde(serialize_with = "serialize_selection")]
    pub call_put: Option<CallPut>,
}

/// Query parameters of the bond pricing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BondPricingRequest {
    /// Face value
    pub par_value: String,
    /// Annual discount rate
    pub annual_discount_rate: String,
    /// Annual coupon rate
    pub annual_coupon_rate: String,
    /// Maturity in years
    pub maturity: String,
    /// Selected coupon frequency, if any
    #[serde(serialize_with = "serialize_selection")]
    pub coupon_periodicity: Option<CouponPeriodicity>,
}

/// A response scalar rendered exactly as the server sent it.
///
/// Absent and `null` fields render as the empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayValue(Option<Value>);

impl DisplayValue {
    /// Wrap a raw JSON value
    pub fn new(value: Value) -> Self {
        match value {
            Value::Null => Self(None),
            other => Self(Some(other)),
        }
    }
}

impl<'de> Deserialize<'de> for DisplayValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::new)
    }
}

impl std::fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            None | Some(Value::Null) => Ok(()),
            Some(Value::String(s)) => f.write_str(s),
            Some(Value::Bool(b)) => write!(f, "{b}"),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    write!(f, "{i}")
                } else if let Some(u) = n.as_u64() {
                    write!(f, "{u}")
                } else if let Some(x) = n.as_f64() {
                    f.write_str(&format_float(x))
                } else {
                    write!(f, "{n}")
                }
            }
            Some(other) => write!(f, "{other}"),
        }
    }
}

/// Number text as a browser prints it. Shortest round-trip digits, with
/// exponent form outside `[1e-6, 1e21)` and negative zero shown as `0`.
fn format_float(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    let magnitude = x.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{x}");
    }
    let sci = format!("{x:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => sci,
    }
}

/// Response of the option pricing endpoint
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct OptionPricingResponse {
    /// Option premium
    pub option_price: DisplayValue,
    /// Delta
    pub delta: DisplayValue,
    /// Gamma
    pub gamma: DisplayValue,
    /// Vega
    pub vega: DisplayValue,
    /// Theta
    pub theta: DisplayValue,
    /// Rho
    pub rho: DisplayValue,
}

/// One coupon date of a bond schedule
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CouponRow {
    /// Coupon period number
    #[serde(rename = "Period")]
    pub period: DisplayValue,
    /// Coupon amount
    #[serde(rename = "Payment")]
    pub payment: DisplayValue,
    /// Discounted coupon amount
    #[serde(rename = "PresentValue")]
    pub present_value: DisplayValue,
}

impl CouponRow {
    /// Table cells in column order: Period, Payment, PresentValue
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.period.to_string(),
            self.payment.to_string(),
            self.present_value.to_string(),
        ]
    }
}

/// Response of the bond pricing endpoint
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BondPricingResponse {
    /// Dirty price
    pub price: DisplayValue,
    /// Modified duration style sensitivity
    pub sensitivity: DisplayValue,
    /// Convexity
    pub convexity: DisplayValue,
    /// Coupon schedule in server order
    #[serde(deserialize_with = "deserialize_coupons")]
    pub coupons: Vec<CouponRow>,
}

fn deserialize_coupons<'de, D>(deserializer: D) -> Result<Vec<CouponRow>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CouponRow>>::deserialize(deserializer)?.unwrap_or_default())
}
