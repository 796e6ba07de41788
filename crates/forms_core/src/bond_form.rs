//! Bond pricing form.

use tracing::{debug, warn};

use crate::dispatch::Outcome;
use crate::error::FormError;
use crate::page::Page;
use crate::selection::{MissingSelectionPolicy, RadioGroup};
use crate::service::{PricingService, ServiceError};
use crate::surface::{read_field, FormSurface};
use crate::wire::{BondPricingRequest, BondPricingResponse, CouponPeriodicity};

/// Element ids of the bond pricing page
pub mod ids {
    /// Par value input
    pub const PAR_VALUE: &str = "parValue";
    /// Annual discount rate input
    pub const ANNUAL_DISCOUNT_RATE: &str = "annualDiscountRate";
    /// Annual coupon rate input
    pub const ANNUAL_COUPON_RATE: &str = "annualCouponRate";
    /// Maturity input
    pub const MATURITY: &str = "maturity";
    /// Zero-coupon radio button
    pub const NO_COUPON: &str = "noCoupon";
    /// Monthly radio button
    pub const MONTHLY: &str = "monthly";
    /// Quarterly radio button
    pub const QUARTERLY: &str = "quarterly";
    /// Semi-annual radio button
    pub const SEMI_ANNUAL: &str = "semiAnnual";
    /// Annual radio button
    pub const ANNUAL: &str = "annual";
    /// Radio group of the coupon periodicity
    pub const PERIODICITY_GROUP: &str = "couponPeriodicity";
    /// Trigger button
    pub const PRICE: &str = "price";
    /// Coupon schedule table
    pub const TABLE_RESULTS: &str = "tableResults";
    /// Price display
    pub const BOND_PRICE: &str = "bondPrice";
    /// Sensitivity display
    pub const SENSITIVITY: &str = "sensitivity";
    /// Convexity display
    pub const CONVEXITY: &str = "convexity";
}

/// Warning raised when no coupon periodicity is checked
pub const MISSING_PERIODICITY: &str = "You need to select the coupon periodicity.";

/// Build the standard bond pricing page
pub fn bond_pricing_page() -> Page {
    Page::new("Bond Pricer")
        .with_input(ids::PAR_VALUE, "Par value", "1000")
        .with_input(ids::ANNUAL_DISCOUNT_RATE, "Annual discount rate", "0.05")
        .with_input(ids::ANNUAL_COUPON_RATE, "Annual coupon rate", "0.05")
        .with_input(ids::MATURITY, "Maturity (years)", "5")
        .with_radio(ids::NO_COUPON, ids::PERIODICITY_GROUP, "No coupon")
        .with_radio(ids::MONTHLY, ids::PERIODICITY_GROUP, "Monthly")
        .with_radio(ids::QUARTERLY, ids::PERIODICITY_GROUP, "Quarterly")
        .with_radio(ids::SEMI_ANNUAL, ids::PERIODICITY_GROUP, "Semi-annual")
        .with_radio(ids::ANNUAL, ids::PERIODICITY_GROUP, "Annual")
        .with_button(ids::PRICE, "Price")
        .with_table(ids::TABLE_RESULTS, ["Period", "Payment", "Present Value"])
        .with_output(ids::BOND_PRICE, "Price")
        .with_output(ids::SENSITIVITY, "Sensitivity")
        .with_output(ids::CONVEXITY, "Convexity")
}

/// Controller behind the `price` button
#[derive(Debug, Clone)]
pub struct BondPricingController {
    policy: MissingSelectionPolicy,
    periodicity: RadioGroup<CouponPeriodicity>,
}

impl Default for BondPricingController {
    fn default() -> Self {
        Self::new(MissingSelectionPolicy::default())
    }
}

impl BondPricingController {
    /// Create a controller with the given missing-selection policy
    pub fn new(policy: MissingSelectionPolicy) -> Self {
        Self {
            policy,
            periodicity: RadioGroup::new(
                vec![
                    (ids::NO_COUPON, CouponPeriodicity::NoCoupon),
                    (ids::MONTHLY, CouponPeriodicity::Monthly),
                    (ids::QUARTERLY, CouponPeriodicity::Quarterly),
                    (ids::SEMI_ANNUAL, CouponPeriodicity::SemiAnnual),
                    (ids::ANNUAL, CouponPeriodicity::Annual),
                ],
                MISSING_PERIODICITY,
            ),
        }
    }

    /// Selection and request steps; `Ok(None)` means blocked by policy
    pub fn prepare<S: FormSurface + ?Sized>(
        &self,
        surface: &mut S,
    ) -> Result<Option<BondPricingRequest>, FormError> {
        let coupon_periodicity = self.periodicity.select(surface)?;
        if coupon_periodicity.is_none() && self.policy == MissingSelectionPolicy::Block {
            debug!("coupon periodicity missing, request blocked");
            return Ok(None);
        }

        Ok(Some(BondPricingRequest {
            par_value: read_field(surface, ids::PAR_VALUE)?,
            annual_discount_rate: read_field(surface, ids::ANNUAL_DISCOUNT_RATE)?,
            annual_coupon_rate: read_field(surface, ids::ANNUAL_COUPON_RATE)?,
            maturity: read_field(surface, ids::MATURITY)?,
            coupon_periodicity,
        }))
    }

    /// Response step.
    ///
    /// Rows from an earlier response are removed first, then one row per
    /// coupon is appended in response order, then the three summary values
    /// are written.
    pub fn apply<S: FormSurface + ?Sized>(
        &self,
        surface: &mut S,
        response: &BondPricingResponse,
    ) -> Result<(), FormError> {
        surface.clear_table(ids::TABLE_RESULTS)?;
        for coupon in &response.coupons {
            surface.append_row(ids::TABLE_RESULTS, coupon.cells())?;
        }

        surface.set_output(ids::BOND_PRICE, &response.price.to_string())?;
        surface.set_output(ids::SENSITIVITY, &response.sensitivity.to_string())?;
        surface.set_output(ids::CONVEXITY, &response.convexity.to_string())?;
        Ok(())
    }

    /// Apply a service reply. Failures leave the table and summary as they were.
    pub fn handle_reply<S: FormSurface + ?Sized>(
        &self,
        surface: &mut S,
        reply: Result<BondPricingResponse, ServiceError>,
    ) -> Result<Outcome, FormError> {
        match reply {
            Ok(response) => {
                self.apply(surface, &response)?;
                Ok(Outcome::Rendered)
            }
            Err(e) => {
                warn!(error = %e, "bond pricing request failed");
                Ok(Outcome::Failed(e))
            }
        }
    }

    /// Run one activation end to end
    pub async fn submit<S, P>(&self, surface: &mut S, service: &P) -> Result<Outcome, FormError>
    where
        S: FormSurface + ?Sized,
        P: PricingService + ?Sized,
    {
        let Some(request) = self.prepare(surface)? else {
            return Ok(Outcome::Blocked);
        };
        debug!(?request, "pricing bond");
        let reply = service.price_bond(&request).await;
        self.handle_reply(surface, reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn five_year_annual() -> BondPricingResponse {
        serde_json::from_value(json!({
            "price": 1000.0,
            "sensitivity": 4.3295,
            "convexity": 2.1647,
            "coupons": [
                {"Period": 1, "Payment": 50.0, "PresentValue": 47.62},
                {"Period": 2, "Payment": 50.0, "PresentValue": 45.35},
                {"Period": 3, "Payment": 50.0, "PresentValue": 43.19},
                {"Period": 4, "Payment": 50.0, "PresentValue": 41.14},
                {"Period": 5, "Payment": 50.0, "PresentValue": 39.18}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_prepare_reads_selection_and_fields() {
        let mut page = bond_pricing_page();
        page.check(ids::SEMI_ANNUAL).unwrap();
        page.set_value(ids::MATURITY, "10").unwrap();

        let request = BondPricingController::default()
            .prepare(&mut page)
            .unwrap()
            .unwrap();

        assert_eq!(
            request,
            BondPricingRequest {
                par_value: "1000".into(),
                annual_discount_rate: "0.05".into(),
                annual_coupon_rate: "0.05".into(),
                maturity: "10".into(),
                coupon_periodicity: Some(CouponPeriodicity::SemiAnnual),
            }
        );
    }

    #[test]
    fn test_every_periodicity_option_maps() {
        let cases = [
            (ids::NO_COUPON, CouponPeriodicity::NoCoupon),
            (ids::MONTHLY, CouponPeriodicity::Monthly),
            (ids::QUARTERLY, CouponPeriodicity::Quarterly),
            (ids::SEMI_ANNUAL, CouponPeriodicity::SemiAnnual),
            (ids::ANNUAL, CouponPeriodicity::Annual),
        ];
        let controller = BondPricingController::default();
        for (id, expected) in cases {
            let mut page = bond_pricing_page();
            page.check(id).unwrap();
            let request = controller.prepare(&mut page).unwrap().unwrap();
            assert_eq!(request.coupon_periodicity, Some(expected), "radio {id}");
        }
    }

    #[test]
    fn test_missing_periodicity_alerts() {
        let mut page = bond_pricing_page();
        let request = BondPricingController::default()
            .prepare(&mut page)
            .unwrap()
            .unwrap();
        assert_eq!(request.coupon_periodicity, None);
        assert_eq!(page.pending_alerts(), [MISSING_PERIODICITY]);

        let mut page = bond_pricing_page();
        let blocked = BondPricingController::new(MissingSelectionPolicy::Block)
            .prepare(&mut page)
            .unwrap();
        assert!(blocked.is_none());
    }

    #[test]
    fn test_apply_renders_one_row_per_coupon() {
        let mut page = bond_pricing_page();
        BondPricingController::default()
            .apply(&mut page, &five_year_annual())
            .unwrap();

        let table = page.table(ids::TABLE_RESULTS).unwrap();
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[0], vec!["1", "50", "47.62"]);
        assert_eq!(table.rows[4], vec!["5", "50", "39.18"]);
        assert_eq!(page.output(ids::BOND_PRICE).unwrap(), "1000");
        assert_eq!(page.output(ids::SENSITIVITY).unwrap(), "4.3295");
        assert_eq!(page.output(ids::CONVEXITY).unwrap(), "2.1647");
    }

    #[test]
    fn test_apply_replaces_previous_rows() {
        let mut page = bond_pricing_page();
        let controller = BondPricingController::default();
        controller.apply(&mut page, &five_year_annual()).unwrap();

        let zero_coupon: BondPricingResponse = serde_json::from_value(json!({
            "price": 783.53,
            "sensitivity": 0,
            "convexity": 0,
            "coupons": []
        }))
        .unwrap();
        controller.apply(&mut page, &zero_coupon).unwrap();

        assert!(page.table(ids::TABLE_RESULTS).unwrap().rows.is_empty());
        assert_eq!(page.output(ids::BOND_PRICE).unwrap(), "783.53");
        assert_eq!(page.output(ids::SENSITIVITY).unwrap(), "0");
    }

    #[test]
    fn test_failed_reply_leaves_table() {
        let mut page = bond_pricing_page();
        let controller = BondPricingController::default();
        controller.apply(&mut page, &five_year_annual()).unwrap();

        let outcome = controller
            .handle_reply(
                &mut page,
                Err(ServiceError::Status {
                    status: 500,
                    body: String::new(),
                }),
            )
            .unwrap();

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(page.table(ids::TABLE_RESULTS).unwrap().rows.len(), 5);
        assert_eq!(page.output(ids::BOND_PRICE).unwrap(), "1000");
    }
}
