//! Headless runs through the real HTTP client against a stub pricing server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use forms_client::{EndpointConfig, HttpPricingClient};
use forms_core::dispatch::Outcome;
use forms_gui::prelude::*;
use serde_json::{json, Value};

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn bonds(
    State(seen): State<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let maturity: u32 = params
        .get("maturity")
        .and_then(|m| m.parse().ok())
        .unwrap_or(0);
    seen.lock().unwrap().push(params);
    let coupons: Vec<Value> = (1..=maturity)
        .map(|period| json!({"Period": period, "Payment": 50.0, "PresentValue": 40.5}))
        .collect();
    Json(json!({
        "price": 1043.76,
        "sensitivity": 4.3295,
        "convexity": 22.6,
        "coupons": coupons
    }))
}

async fn blackscholes(
    State(seen): State<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.lock().unwrap().push(params);
    Json(json!({"option_price": 5.57353, "delta": -0.36317}))
}

async fn stub() -> (GuiConfig, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/price_bonds", get(bonds))
        .route("/price_with_blackscholes", get(blackscholes))
        .with_state(Arc::clone(&seen));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let config = GuiConfig {
        endpoints: EndpointConfig::new(format!("http://{addr}")),
        ..GuiConfig::default()
    };
    (config, seen)
}

#[tokio::test]
async fn test_bond_form_over_http() {
    let (config, seen) = stub().await;
    let client = HttpPricingClient::new(config.endpoints.clone());
    let input = FormInput {
        values: vec![("maturity".to_string(), "3".to_string())],
        checks: vec!["annual".to_string()],
    };

    let (page, outcome) = run_form(FormKind::Bond, &input, &config, &client)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Rendered);

    let params = seen.lock().unwrap()[0].clone();
    assert_eq!(params["maturity"], "3");
    assert_eq!(params["par_value"], "1000");
    assert_eq!(params["coupon_periodicity"], "annual");

    let text = render_page_text(&page);
    assert_eq!(text.matches("\t50\t40.5").count(), 3);
    assert!(text.contains("Price: 1043.76"));
    assert!(text.contains("Convexity: 22.6"));
}

#[tokio::test]
async fn test_option_form_partial_response_over_http() {
    let (config, seen) = stub().await;
    let client = HttpPricingClient::new(config.endpoints.clone());
    let input = FormInput {
        values: vec![],
        checks: vec!["put".to_string()],
    };

    let (page, _) = run_form(FormKind::Option, &input, &config, &client)
        .await
        .unwrap();

    assert_eq!(seen.lock().unwrap()[0]["call_put"], "put");
    let text = render_page_text(&page);
    assert!(text.contains("Option price: 5.57353"));
    assert!(text.contains("Delta: -0.36317"));
    // Fields missing from the response render empty
    assert!(text.contains("Gamma: \n"));
}

#[tokio::test]
async fn test_unreachable_server_leaves_page_empty() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = GuiConfig {
        endpoints: EndpointConfig::new(format!("http://{addr}")),
        ..GuiConfig::default()
    };
    let client = HttpPricingClient::new(config.endpoints.clone());
    let input = FormInput {
        values: vec![],
        checks: vec!["call".to_string()],
    };

    let (page, outcome) = run_form(FormKind::Option, &input, &config, &client)
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Failed(_)));
    assert!(render_page_text(&page).contains("Option price: \n"));
}
