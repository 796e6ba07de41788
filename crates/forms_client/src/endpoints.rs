//! Endpoint locations.

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Default base URL of the pricing web service
pub const DEFAULT_SCRIPT_ROOT: &str = "http://localhost:5000";
/// Default path of the option pricing endpoint
pub const DEFAULT_OPTION_ENDPOINT: &str = "/price_with_blackscholes";
/// Default path of the bond pricing endpoint
pub const DEFAULT_BOND_ENDPOINT: &str = "/price_bonds";

/// Endpoint configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The base URL does not parse; carries the URL and the parse error
    #[error("Invalid script root '{0}': {1}")]
    InvalidScriptRoot(String, String),

    /// An endpoint path is not absolute
    #[error("Invalid endpoint path '{0}'. Must start with '/'")]
    InvalidPath(String),
}

/// Where the two pricing endpoints live
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL the endpoint paths are appended to
    pub script_root: String,
    /// Path of the option pricing endpoint
    pub option_endpoint: String,
    /// Path of the bond pricing endpoint
    pub bond_endpoint: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            script_root: DEFAULT_SCRIPT_ROOT.to_string(),
            option_endpoint: DEFAULT_OPTION_ENDPOINT.to_string(),
            bond_endpoint: DEFAULT_BOND_ENDPOINT.to_string(),
        }
    }
}

impl EndpointConfig {
    /// Endpoints under `script_root` with the default paths
    pub fn new(script_root: impl Into<String>) -> Self {
        Self {
            script_root: script_root.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EndpointError> {
        Url::parse(&self.script_root).map_err(|e| {
            EndpointError::InvalidScriptRoot(self.script_root.clone(), e.to_string())
        })?;

        for path in [&self.option_endpoint, &self.bond_endpoint] {
            if !path.starts_with('/') {
                return Err(EndpointError::InvalidPath(path.clone()));
            }
        }

        Ok(())
    }

    /// Full URL of an endpoint path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.script_root.trim_end_matches('/'), path)
    }

    /// Full URL of the option pricing endpoint
    pub fn option_url(&self) -> String {
        self.url_for(&self.option_endpoint)
    }

    /// Full URL of the bond pricing endpoint
    pub fn bond_url(&self) -> String {
        self.url_for(&self.bond_endpoint)
    }
}
