//! Remote pricing service seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::wire::{BondPricingRequest, BondPricingResponse, OptionPricingRequest, OptionPricingResponse};

/// Pricing service error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("Server returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The body was not the expected JSON
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// Remote pricing endpoints used by the forms.
///
/// Implementations are shared across concurrently running requests.
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Price an option and its Greeks
    async fn price_option(
        &self,
        request: &OptionPricingRequest,
    ) -> Result<OptionPricingResponse, ServiceError>;

    /// Price a bond and build its coupon schedule
    async fn price_bond(
        &self,
        request: &BondPricingRequest,
    ) -> Result<BondPricingResponse, ServiceError>;
}

#[async_trait]
impl<P: PricingService + ?Sized> PricingService for std::sync::Arc<P> {
    async fn price_option(
        &self,
        request: &OptionPricingRequest,
    ) -> Result<OptionPricingResponse, ServiceError> {
        (**self).price_option(request).await
    }

    async fn price_bond(
        &self,
        request: &BondPricingRequest,
    ) -> Result<BondPricingResponse, ServiceError> {
        (**self).price_bond(request).await
    }
}
