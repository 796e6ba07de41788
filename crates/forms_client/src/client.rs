//! reqwest implementation of the pricing service.

use async_trait::async_trait;
use forms_core::service::{PricingService, ServiceError};
use forms_core::wire::{
    BondPricingRequest, BondPricingResponse, OptionPricingRequest, OptionPricingResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::endpoints::EndpointConfig;

/// Longest error body kept in a [`ServiceError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// HTTP client for the pricing web service
#[derive(Debug, Clone)]
pub struct HttpPricingClient {
    endpoints: EndpointConfig,
    client: reqwest::Client,
}

impl HttpPricingClient {
    /// Create a new client
    pub fn new(endpoints: EndpointConfig) -> Self {
        Self {
            endpoints,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint configuration
    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    async fn get_json<Q, R>(&self, url: String, query: &Q) -> Result<R, ServiceError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&body).map_err(|e| ServiceError::decode(e.to_string()))
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[async_trait]
impl PricingService for HttpPricingClient {
    async fn price_option(
        &self,
        request: &OptionPricingRequest,
    ) -> Result<OptionPricingResponse, ServiceError> {
        self.get_json(self.endpoints.option_url(), request).await
    }

    async fn price_bond(
        &self,
        request: &BondPricingRequest,
    ) -> Result<BondPricingResponse, ServiceError> {
        self.get_json(self.endpoints.bond_url(), request).await
    }
}
