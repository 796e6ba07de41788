//! Headless runner: fill a page from the command line, activate it once and
//! print what the page would show.

use std::fmt::Write as _;

use forms_core::bond_form::{bond_pricing_page, BondPricingController};
use forms_core::dispatch::Outcome;
use forms_core::option_form::{option_pricing_page, OptionPricingController};
use forms_core::page::{Element, Page};
use forms_core::selection::MissingSelectionPolicy;
use forms_core::service::PricingService;
use tracing::{info, warn};

use crate::config::GuiConfig;
use crate::error::GuiError;

/// Which form to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Black-Scholes option pricer
    Option,
    /// Bond pricer
    Bond,
}

impl FormKind {
    /// Fresh page for this form
    pub fn page(&self) -> Page {
        match self {
            Self::Option => option_pricing_page(),
            Self::Bond => bond_pricing_page(),
        }
    }
}

/// Field values and radio selection for one headless run
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    /// `(id, value)` pairs typed into input fields
    pub values: Vec<(String, String)>,
    /// Radio buttons to check, in order
    pub checks: Vec<String>,
}

/// Parse an `id=value` pair. The value may be empty or contain `=`.
pub fn parse_key_val(s: &str) -> Result<(String, String), GuiError> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| GuiError::argument(format!("expected id=value, got '{s}'")))?;
    if id.is_empty() {
        return Err(GuiError::argument(format!("missing element id in '{s}'")));
    }
    Ok((id.to_string(), value.to_string()))
}

/// Fill a fresh page, activate its controller and wait for the reply
pub async fn run_form<P>(
    kind: FormKind,
    input: &FormInput,
    config: &GuiConfig,
    service: &P,
) -> Result<(Page, Outcome), GuiError>
where
    P: PricingService + ?Sized,
{
    let mut page = kind.page();
    page.apply_placeholders(&config.placeholders);

    for (id, value) in &input.values {
        page.set_value(id, value.as_str())?;
    }
    for id in &input.checks {
        page.check(id)?;
    }

    let outcome = submit(kind, config.missing_selection, &mut page, service).await?;
    match &outcome {
        Outcome::Failed(e) => warn!(error = %e, "pricing request failed"),
        other => info!(outcome = ?other, "form activated"),
    }
    Ok((page, outcome))
}

async fn submit<P>(
    kind: FormKind,
    policy: MissingSelectionPolicy,
    page: &mut Page,
    service: &P,
) -> Result<Outcome, GuiError>
where
    P: PricingService + ?Sized,
{
    let outcome = match kind {
        FormKind::Option => {
            OptionPricingController::new(policy)
                .submit(page, service)
                .await?
        }
        FormKind::Bond => {
            BondPricingController::new(policy)
                .submit(page, service)
                .await?
        }
    };
    Ok(outcome)
}

/// Plain text rendering of a page's alerts, outputs and tables
pub fn render_page_text(page: &Page) -> String {
    let mut out = String::new();

    for alert in page.pending_alerts() {
        let _ = writeln!(out, "warning: {alert}");
    }

    for element in page.elements() {
        match element {
            Element::Output(output) => {
                let _ = writeln!(out, "{}: {}", output.label, output.content);
            }
            Element::Table(table) if !table.rows.is_empty() => {
                let _ = writeln!(out, "{}", table.columns.join("\t"));
                for row in &table.rows {
                    let _ = writeln!(out, "{}", row.join("\t"));
                }
            }
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use forms_core::bond_form::{self, MISSING_PERIODICITY};
    use forms_core::option_form::{self, MISSING_OPTION_TYPE};
    use forms_core::service::ServiceError;
    use forms_core::wire::{
        BondPricingRequest, BondPricingResponse, CallPut, OptionPricingRequest,
        OptionPricingResponse,
    };
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubService {
        option_requests: Mutex<Vec<OptionPricingRequest>>,
        bond_requests: Mutex<Vec<BondPricingRequest>>,
    }

    #[async_trait]
    impl PricingService for StubService {
        async fn price_option(
            &self,
            request: &OptionPricingRequest,
        ) -> Result<OptionPricingResponse, ServiceError> {
            self.option_requests.lock().unwrap().push(request.clone());
            Ok(serde_json::from_value(json!({
                "option_price": 10.45058,
                "delta": 0.63683,
                "gamma": 0.01876,
                "vega": 0.37524,
                "theta": -0.01757,
                "rho": 0.53232
            }))
            .unwrap())
        }

        async fn price_bond(
            &self,
            request: &BondPricingRequest,
        ) -> Result<BondPricingResponse, ServiceError> {
            self.bond_requests.lock().unwrap().push(request.clone());
            Ok(serde_json::from_value(json!({
                "price": 1000.0,
                "sensitivity": 1.8594,
                "convexity": 0.8855,
                "coupons": [
                    {"Period": 1, "Payment": 50.0, "PresentValue": 47.62},
                    {"Period": 2, "Payment": 50.0, "PresentValue": 45.35}
                ]
            }))
            .unwrap())
        }
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("strikePrice=105").unwrap(),
            ("strikePrice".to_string(), "105".to_string())
        );
        assert_eq!(
            parse_key_val("rate=").unwrap(),
            ("rate".to_string(), String::new())
        );
        assert_eq!(parse_key_val("a=b=c").unwrap().1, "b=c");
        assert!(parse_key_val("strikePrice").is_err());
        assert!(parse_key_val("=5").is_err());
    }

    #[tokio::test]
    async fn test_option_run_sends_values_and_placeholders() {
        let service = StubService::default();
        let input = FormInput {
            values: vec![("strikePrice".to_string(), "105".to_string())],
            checks: vec![option_form::ids::CALL.to_string()],
        };

        let (page, outcome) = run_form(FormKind::Option, &input, &GuiConfig::default(), &service)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Rendered);
        let sent = service.option_requests.lock().unwrap()[0].clone();
        assert_eq!(sent.strike_price, "105");
        assert_eq!(sent.underlying_price, "100");
        assert_eq!(sent.call_put, Some(CallPut::Call));

        let text = render_page_text(&page);
        assert!(text.contains("Option price: 10.45058"));
        assert!(text.contains("Theta: -0.01757"));
        assert!(!text.contains("warning"));
    }

    #[tokio::test]
    async fn test_bond_run_renders_table() {
        let service = StubService::default();
        let input = FormInput {
            values: vec![],
            checks: vec![bond_form::ids::SEMI_ANNUAL.to_string()],
        };

        let (page, _) = run_form(FormKind::Bond, &input, &GuiConfig::default(), &service)
            .await
            .unwrap();

        let text = render_page_text(&page);
        assert!(text.contains("Period\tPayment\tPresent Value"));
        assert!(text.contains("2\t50\t45.35"));
        assert!(text.contains("Convexity: 0.8855"));
    }

    #[tokio::test]
    async fn test_missing_selection_reported_and_policy_respected() {
        let service = StubService::default();
        let (page, outcome) = run_form(
            FormKind::Option,
            &FormInput::default(),
            &GuiConfig::default(),
            &service,
        )
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::Rendered);
        assert!(render_page_text(&page).contains(&format!("warning: {MISSING_OPTION_TYPE}")));
        assert_eq!(service.option_requests.lock().unwrap()[0].call_put, None);

        let config = GuiConfig {
            missing_selection: MissingSelectionPolicy::Block,
            ..GuiConfig::default()
        };
        let (page, outcome) = run_form(FormKind::Bond, &FormInput::default(), &config, &service)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Blocked);
        assert_eq!(page.pending_alerts(), [MISSING_PERIODICITY]);
        assert!(service.bond_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_element_is_rejected() {
        let service = StubService::default();
        let input = FormInput {
            values: vec![("spot".to_string(), "100".to_string())],
            checks: vec![],
        };
        let err = run_form(FormKind::Option, &input, &GuiConfig::default(), &service)
            .await
            .unwrap_err();
        assert!(matches!(err, GuiError::Form(_)));
        assert!(service.option_requests.lock().unwrap().is_empty());
    }
}
