//! The page surface controllers read from and write to.
//!
//! Controllers never touch a concrete page type. They go through
//! [`FormSurface`], which [`Page`](crate::page::Page) implements and which a
//! test double or another front end can implement just as well.

use crate::error::FormError;
use crate::page::InputField;

/// Element access needed by the pricing form controllers.
///
/// Every lookup is by element id. Asking for an id the surface does not
/// have, or for an element of the wrong kind, is an error.
pub trait FormSurface {
    /// Snapshot of a labeled input control
    fn input(&self, id: &str) -> Result<InputField, FormError>;

    /// Whether the radio button `id` is checked
    fn is_checked(&self, id: &str) -> Result<bool, FormError>;

    /// Replace the content of output element `id`
    fn set_output(&mut self, id: &str, content: &str) -> Result<(), FormError>;

    /// Remove every row from results table `id`
    fn clear_table(&mut self, id: &str) -> Result<(), FormError>;

    /// Append one row to results table `id`
    fn append_row(&mut self, id: &str, cells: Vec<String>) -> Result<(), FormError>;

    /// Raise a blocking, user-visible warning
    fn alert(&mut self, message: &str);
}

/// Effective value of an input: its value when non-empty, else its placeholder.
///
/// No trimming and no validation; a blank-but-not-empty value such as `" "`
/// is returned as is. An empty value with an empty placeholder yields `""`.
pub fn value_or_placeholder(input: &InputField) -> &str {
    if input.value.is_empty() {
        &input.placeholder
    } else {
        &input.value
    }
}

/// Read input `id` from a surface with placeholder fallback.
pub fn read_field<S: FormSurface + ?Sized>(surface: &S, id: &str) -> Result<String, FormError> {
    let input = surface.input(id)?;
    Ok(value_or_placeholder(&input).to_string())
}
