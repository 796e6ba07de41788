//! Radio group selection.

use serde::Deserialize;
use std::str::FromStr;

use crate::error::FormError;
use crate::surface::FormSurface;

/// What a controller does after warning about a missing radio selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSelectionPolicy {
    /// Warn, then submit with an empty selection
    #[default]
    Submit,
    /// Warn and stop; no request is issued
    Block,
}

impl FromStr for MissingSelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submit" => Ok(Self::Submit),
            "block" => Ok(Self::Block),
            _ => Err(format!(
                "Invalid missing selection policy: {s}. Must be one of: submit, block"
            )),
        }
    }
}

impl std::fmt::Display for MissingSelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit => write!(f, "submit"),
            Self::Block => write!(f, "block"),
        }
    }
}

/// Mutually exclusive radio options, each mapped to a value.
///
/// Options are tested in declaration order; the first checked one wins.
#[derive(Debug, Clone)]
pub struct RadioGroup<T> {
    options: Vec<(&'static str, T)>,
    missing_message: &'static str,
}

impl<T: Copy> RadioGroup<T> {
    /// Create a group from `(radio id, value)` pairs
    pub fn new(options: Vec<(&'static str, T)>, missing_message: &'static str) -> Self {
        Self {
            options,
            missing_message,
        }
    }

    /// Read the selected value.
    ///
    /// When no option is checked, the missing-selection warning is raised on
    /// the surface and `None` is returned; the caller decides whether to go on.
    pub fn select<S: FormSurface + ?Sized>(&self, surface: &mut S) -> Result<Option<T>, FormError> {
        for (id, value) in &self.options {
            if surface.is_checked(id)? {
                return Ok(Some(*value));
            }
        }
        surface.alert(self.missing_message);
        Ok(None)
    }
}
