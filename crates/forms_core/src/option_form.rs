//! Option pricing form.
//!
//! Reads five option parameters and the call/put choice from the page,
//! sends them to the option pricing endpoint and writes the premium and the
//! five Greeks back into their display elements.

use tracing::{debug, warn};

use crate::dispatch::Outcome;
use crate::error::FormError;
use crate::page::Page;
use crate::selection::{MissingSelectionPolicy, RadioGroup};
use crate::service::{PricingService, ServiceError};
use crate::surface::{read_field, FormSurface};
use crate::wire::{CallPut, OptionPricingRequest, OptionPricingResponse};

/// Element ids of the option pricing page
pub mod ids {
    /// Underlying price input
    pub const UNDERLYING_PRICE: &str = "underlyingPrice";
    /// Strike price input
    pub const STRIKE_PRICE: &str = "strikePrice";
    /// Risk-free rate input
    pub const RATE: &str = "rate";
    /// Time to maturity input
    pub const TIME_TO_MATURITY: &str = "timeToMaturity";
    /// Volatility input
    pub const VOLATILITY: &str = "volatility";
    /// Call radio button
    pub const CALL: &str = "call";
    /// Put radio button
    pub const PUT: &str = "put";
    /// Radio group of the option type
    pub const OPTION_TYPE_GROUP: &str = "optionType";
    /// Trigger button
    pub const CALCULATE: &str = "calculate";
    /// Premium display
    pub const OPTION_PRICE: &str = "optionPrice";
    /// Delta display
    pub const DELTA: &str = "delta";
    /// Gamma display
    pub const GAMMA: &str = "gamma";
    /// Vega display
    pub const VEGA: &str = "vega";
    /// Theta display
    pub const THETA: &str = "theta";
    /// Rho display
    pub const RHO: &str = "rho";
}

/// Warning raised when neither call nor put is checked
pub const MISSING_OPTION_TYPE: &str = "You need to select the option type.";

/// Build the standard option pricing page
pub fn option_pricing_page() -> Page {
    Page::new("Option Pricer")
        .with_input(ids::UNDERLYING_PRICE, "Underlying price", "100")
        .with_input(ids::STRIKE_PRICE, "Strike price", "100")
        .with_input(ids::RATE, "Rate", "0.05")
        .with_input(ids::TIME_TO_MATURITY, "Time to maturity (years)", "1")
        .with_input(ids::VOLATILITY, "Volatility", "0.2")
        .with_radio(ids::CALL, ids::OPTION_TYPE_GROUP, "Call")
        .with_radio(ids::PUT, ids::OPTION_TYPE_GROUP, "Put")
        .with_button(ids::CALCULATE, "Calculate")
        .with_output(ids::OPTION_PRICE, "Option price")
        .with_output(ids::DELTA, "Delta")
        .with_output(ids::GAMMA, "Gamma")
        .with_output(ids::VEGA, "Vega")
        .with_output(ids::THETA, "Theta")
        .with_output(ids::RHO, "Rho")
}

/// Controller behind the `calculate` button
#[derive(Debug, Clone)]
pub struct OptionPricingController {
    policy: MissingSelectionPolicy,
    option_type: RadioGroup<CallPut>,
}

impl Default for OptionPricingController {
    fn default() -> Self {
        Self::new(MissingSelectionPolicy::default())
    }
}

impl OptionPricingController {
    /// Create a controller with the given missing-selection policy
    pub fn new(policy: MissingSelectionPolicy) -> Self {
        Self {
            policy,
            option_type: RadioGroup::new(
                vec![(ids::CALL, CallPut::Call), (ids::PUT, CallPut::Put)],
                MISSING_OPTION_TYPE,
            ),
        }
    }

    /// Selection and request steps.
    ///
    /// Returns `Ok(None)` only when nothing is selected and the policy is
    /// [`MissingSelectionPolicy::Block`].
    pub fn prepare<S: FormSurface + ?Sized>(
        &self,
        surface: &mut S,
    ) -> Result<Option<OptionPricingRequest>, FormError> {
        let call_put = self.option_type.select(surface)?;
        if call_put.is_none() && self.policy == MissingSelectionPolicy::Block {
            debug!("option type missing, request blocked");
            return Ok(None);
        }

        Ok(Some(OptionPricingRequest {
            underlying_price: read_field(surface, ids::UNDERLYING_PRICE)?,
            strike_price: read_field(surface, ids::STRIKE_PRICE)?,
            rate: read_field(surface, ids::RATE)?,
            time_to_maturity: read_field(surface, ids::TIME_TO_MATURITY)?,
            volatility: read_field(surface, ids::VOLATILITY)?,
            call_put,
        }))
    }

    /// Response step: write the six scalars into their display elements
    pub fn apply<S: FormSurface + ?Sized>(
        &self,
        surface: &mut S,
        response: &OptionPricingResponse,
    ) -> Result<(), FormError> {
        surface.set_output(ids::OPTION_PRICE, &response.option_price.to_string())?;
        surface.set_output(ids::DELTA, &response.delta.to_string())?;
        surface.set_output(ids::GAMMA, &response.gamma.to_string())?;
        surface.set_output(ids::VEGA, &response.vega.to_string())?;
        surface.set_output(ids::THETA, &response.theta.to_string())?;
        surface.set_output(ids::RHO, &response.rho.to_string())?;
        Ok(())
    }

    /// Apply a service reply. Failures leave the page as it was.
    pub fn handle_reply<S: FormSurface + ?Sized>(
        &self,
        surface: &mut S,
        reply: Result<OptionPricingResponse, ServiceError>,
    ) -> Result<Outcome, FormError> {
        match reply {
            Ok(response) => {
                self.apply(surface, &response)?;
                Ok(Outcome::Rendered)
            }
            Err(e) => {
                warn!(error = %e, "option pricing request failed");
                Ok(Outcome::Failed(e))
            }
        }
    }

    /// Run one activation end to end: prepare, await the service, apply.
    pub async fn submit<S, P>(&self, surface: &mut S, service: &P) -> Result<Outcome, FormError>
    where
        S: FormSurface + ?Sized,
        P: PricingService + ?Sized,
    {
        let Some(request) = self.prepare(surface)? else {
            return Ok(Outcome::Blocked);
        };
        debug!(?request, "pricing option");
        let reply = service.price_option(&request).await;
        self.handle_reply(surface, reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_layout() {
        let page = option_pricing_page();
        assert_eq!(page.title(), "Option Pricer");
        assert_eq!(
            page.focusable_ids(),
            vec![
                ids::UNDERLYING_PRICE,
                ids::STRIKE_PRICE,
                ids::RATE,
                ids::TIME_TO_MATURITY,
                ids::VOLATILITY,
                ids::CALL,
                ids::PUT,
                ids::CALCULATE
            ]
        );
    }

    #[test]
    fn test_prepare_uses_placeholders_for_empty_fields() {
        let mut page = option_pricing_page();
        page.check(ids::CALL).unwrap();
        page.set_value(ids::VOLATILITY, "0.35").unwrap();

        let request = OptionPricingController::default()
            .prepare(&mut page)
            .unwrap()
            .unwrap();

        assert_eq!(
            request,
            OptionPricingRequest {
                underlying_price: "100".into(),
                strike_price: "100".into(),
                rate: "0.05".into(),
                time_to_maturity: "1".into(),
                volatility: "0.35".into(),
                call_put: Some(CallPut::Call),
            }
        );
        assert!(page.pending_alerts().is_empty());
    }

    #[test]
    fn test_missing_option_type_still_submits() {
        let mut page = option_pricing_page();
        let request = OptionPricingController::new(MissingSelectionPolicy::Submit)
            .prepare(&mut page)
            .unwrap()
            .unwrap();

        assert_eq!(request.call_put, None);
        assert_eq!(page.pending_alerts(), [MISSING_OPTION_TYPE]);
    }

    #[test]
    fn test_missing_option_type_blocked() {
        let mut page = option_pricing_page();
        let request = OptionPricingController::new(MissingSelectionPolicy::Block)
            .prepare(&mut page)
            .unwrap();

        assert!(request.is_none());
        assert_eq!(page.pending_alerts(), [MISSING_OPTION_TYPE]);
    }

    #[test]
    fn test_apply_writes_all_six_outputs() {
        let mut page = option_pricing_page();
        let response: OptionPricingResponse = serde_json::from_value(json!({
            "option_price": 10.45058,
            "delta": 0.63683,
            "gamma": 0.01876,
            "vega": 0.37524,
            "theta": -0.01757,
            "rho": 0.53232
        }))
        .unwrap();

        OptionPricingController::default()
            .apply(&mut page, &response)
            .unwrap();

        assert_eq!(page.output(ids::OPTION_PRICE).unwrap(), "10.45058");
        assert_eq!(page.output(ids::DELTA).unwrap(), "0.63683");
        assert_eq!(page.output(ids::GAMMA).unwrap(), "0.01876");
        assert_eq!(page.output(ids::VEGA).unwrap(), "0.37524");
        assert_eq!(page.output(ids::THETA).unwrap(), "-0.01757");
        assert_eq!(page.output(ids::RHO).unwrap(), "0.53232");
    }

    #[test]
    fn test_failed_reply_leaves_outputs() {
        let mut page = option_pricing_page();
        page.set_output(ids::DELTA, "0.5").unwrap();

        let outcome = OptionPricingController::default()
            .handle_reply(&mut page, Err(ServiceError::transport("refused")))
            .unwrap();

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(page.output(ids::DELTA).unwrap(), "0.5");
    }

    #[test]
    fn test_missing_input_aborts() {
        let mut page = Page::new("Broken")
            .with_radio(ids::CALL, ids::OPTION_TYPE_GROUP, "Call")
            .with_radio(ids::PUT, ids::OPTION_TYPE_GROUP, "Put");
        page.check(ids::PUT).unwrap();

        let err = OptionPricingController::default()
            .prepare(&mut page)
            .unwrap_err();
        assert_eq!(err, FormError::missing(ids::UNDERLYING_PRICE));
    }
}
