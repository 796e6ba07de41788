//! Error types for the pricing forms front end.

use thiserror::Error;

/// Front end error type
#[derive(Debug, Error)]
pub enum GuiError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Page access error
    #[error("Form error: {0}")]
    Form(#[from] forms_core::FormError),

    /// Bad command line input
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GuiError {
    /// Create an argument error
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Create a logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
