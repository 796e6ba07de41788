//! HTTP client for the pricing endpoints.
//!
//! Implements [`forms_core::PricingService`] with reqwest. Both endpoints are
//! plain GET requests with the form parameters in the query string and a
//! JSON body in the reply.

pub mod client;
pub mod endpoints;

pub use client::HttpPricingClient;
pub use endpoints::{EndpointConfig, EndpointError};
