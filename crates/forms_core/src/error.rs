//! Error types for page access.

use thiserror::Error;

/// Page access error
///
/// Raised when a controller addresses an element the page does not have.
/// The activation that hit it is abandoned; whatever the controller wrote
/// before the failure stays on the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// No element with this id exists on the page
    #[error("No element with id '{0}' on the page")]
    MissingElement(String),

    /// The element exists but is not of the expected kind
    #[error("Element '{id}' is of kind '{actual}', expected '{expected}'")]
    WrongElementKind {
        /// Element id
        id: String,
        /// Kind the caller asked for
        expected: &'static str,
        /// Kind found on the page
        actual: &'static str,
    },
}

impl FormError {
    /// Create a missing element error
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement(id.into())
    }

    /// Create a wrong element kind error
    pub fn wrong_kind(id: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::WrongElementKind {
            id: id.into(),
            expected,
            actual,
        }
    }
}
