//! In-memory page model.
//!
//! A [`Page`] is an ordered list of elements addressed by stable ids plus a
//! queue of alerts raised by controllers and not yet dismissed. Declaration
//! order is the render order and the focus order of a front end.

use std::collections::BTreeMap;

use crate::error::FormError;
use crate::surface::FormSurface;

/// Labeled text input with placeholder text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputField {
    /// Element id
    pub id: String,
    /// Label shown next to the field
    pub label: String,
    /// Current value typed by the user
    pub value: String,
    /// Placeholder text shown while the value is empty
    pub placeholder: String,
}

/// Radio button belonging to a mutually exclusive group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioButton {
    /// Element id
    pub id: String,
    /// Group name; at most one button per group is checked
    pub group: String,
    /// Label shown next to the button
    pub label: String,
    /// Checked state
    pub checked: bool,
}

/// Action button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Element id
    pub id: String,
    /// Caption
    pub label: String,
}

/// Labeled display element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputField {
    /// Element id
    pub id: String,
    /// Label shown next to the content
    pub label: String,
    /// Rendered content
    pub content: String,
}

/// Table of result rows under a fixed header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    /// Element id
    pub id: String,
    /// Column headers
    pub columns: Vec<String>,
    /// Body rows, in insertion order
    pub rows: Vec<Vec<String>>,
}

/// Page element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Text input
    Input(InputField),
    /// Radio button
    Radio(RadioButton),
    /// Action button
    Button(Button),
    /// Display element
    Output(OutputField),
    /// Results table
    Table(ResultTable),
}

impl Element {
    /// Element id
    pub fn id(&self) -> &str {
        match self {
            Self::Input(e) => &e.id,
            Self::Radio(e) => &e.id,
            Self::Button(e) => &e.id,
            Self::Output(e) => &e.id,
            Self::Table(e) => &e.id,
        }
    }

    /// Human readable element kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input field",
            Self::Radio(_) => "radio button",
            Self::Button(_) => "button",
            Self::Output(_) => "output field",
            Self::Table(_) => "results table",
        }
    }

    /// Whether a front end can move keyboard focus onto the element
    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Radio(_) | Self::Button(_))
    }
}

/// A form page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    title: String,
    elements: Vec<Element>,
    alerts: Vec<String>,
}

impl Page {
    /// Create an empty page
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Add an input field
    pub fn with_input(
        self,
        id: impl Into<String>,
        label: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        self.with_element(Element::Input(InputField {
            id: id.into(),
            label: label.into(),
            value: String::new(),
            placeholder: placeholder.into(),
        }))
    }

    /// Add an unchecked radio button to `group`
    pub fn with_radio(
        self,
        id: impl Into<String>,
        group: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.with_element(Element::Radio(RadioButton {
            id: id.into(),
            group: group.into(),
            label: label.into(),
            checked: false,
        }))
    }

    /// Add a button
    pub fn with_button(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.with_element(Element::Button(Button {
            id: id.into(),
            label: label.into(),
        }))
    }

    /// Add an empty output field
    pub fn with_output(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.with_element(Element::Output(OutputField {
            id: id.into(),
            label: label.into(),
            content: String::new(),
        }))
    }

    /// Add an empty results table
    pub fn with_table<I, C>(self, id: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.with_element(Element::Table(ResultTable {
            id: id.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }))
    }

    /// Add an element. An element whose id is already on the page replaces
    /// the earlier one in place.
    pub fn with_element(mut self, element: Element) -> Self {
        match self.position(element.id()) {
            Some(idx) => self.elements[idx] = element,
            None => self.elements.push(element),
        }
        self
    }

    /// Page title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Elements in declaration order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Look up an element by id
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Ids of focusable elements in declaration order
    pub fn focusable_ids(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|e| e.is_focusable())
            .map(Element::id)
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut Element, FormError> {
        self.elements
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| FormError::missing(id))
    }

    /// Borrow input field `id`
    pub fn input_field(&self, id: &str) -> Result<&InputField, FormError> {
        match self.element(id) {
            Some(Element::Input(input)) => Ok(input),
            Some(other) => Err(FormError::wrong_kind(id, "input field", other.kind())),
            None => Err(FormError::missing(id)),
        }
    }

    fn input_field_mut(&mut self, id: &str) -> Result<&mut InputField, FormError> {
        match self.element_mut(id)? {
            Element::Input(input) => Ok(input),
            other => Err(FormError::wrong_kind(id, "input field", other.kind())),
        }
    }

    /// Set the value of input field `id`
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.input_field_mut(id)?.value = value.into();
        Ok(())
    }

    /// Apply placeholder overrides keyed by input id.
    ///
    /// Ids that do not name an input on this page are skipped, so one
    /// override table can serve several pages. Returns how many were applied.
    pub fn apply_placeholders(&mut self, overrides: &BTreeMap<String, String>) -> usize {
        let mut applied = 0;
        for element in &mut self.elements {
            if let Element::Input(input) = element {
                if let Some(placeholder) = overrides.get(&input.id) {
                    input.placeholder = placeholder.clone();
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Check radio button `id`, unchecking the rest of its group
    pub fn check(&mut self, id: &str) -> Result<(), FormError> {
        let group = match self.element(id) {
            Some(Element::Radio(radio)) => radio.group.clone(),
            Some(other) => return Err(FormError::wrong_kind(id, "radio button", other.kind())),
            None => return Err(FormError::missing(id)),
        };
        for element in &mut self.elements {
            if let Element::Radio(radio) = element {
                if radio.group == group {
                    radio.checked = radio.id == id;
                }
            }
        }
        Ok(())
    }

    /// Content of output field `id`
    pub fn output(&self, id: &str) -> Result<&str, FormError> {
        match self.element(id) {
            Some(Element::Output(output)) => Ok(&output.content),
            Some(other) => Err(FormError::wrong_kind(id, "output field", other.kind())),
            None => Err(FormError::missing(id)),
        }
    }

    /// Borrow results table `id`
    pub fn table(&self, id: &str) -> Result<&ResultTable, FormError> {
        match self.element(id) {
            Some(Element::Table(table)) => Ok(table),
            Some(other) => Err(FormError::wrong_kind(id, "results table", other.kind())),
            None => Err(FormError::missing(id)),
        }
    }

    fn table_mut(&mut self, id: &str) -> Result<&mut ResultTable, FormError> {
        match self.element_mut(id)? {
            Element::Table(table) => Ok(table),
            other => Err(FormError::wrong_kind(id, "results table", other.kind())),
        }
    }

    /// Alerts raised and not yet dismissed, oldest first
    pub fn pending_alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Dismiss the oldest pending alert
    pub fn dismiss_alert(&mut self) -> Option<String> {
        if self.alerts.is_empty() {
            None
        } else {
            Some(self.alerts.remove(0))
        }
    }
}

impl FormSurface for Page {
    fn input(&self, id: &str) -> Result<InputField, FormError> {
        self.input_field(id).cloned()
    }

    fn is_checked(&self, id: &str) -> Result<bool, FormError> {
        match self.element(id) {
            Some(Element::Radio(radio)) => Ok(radio.checked),
            Some(other) => Err(FormError::wrong_kind(id, "radio button", other.kind())),
            None => Err(FormError::missing(id)),
        }
    }

    fn set_output(&mut self, id: &str, content: &str) -> Result<(), FormError> {
        match self.element_mut(id)? {
            Element::Output(output) => {
                output.content = content.to_string();
                Ok(())
            }
            other => Err(FormError::wrong_kind(id, "output field", other.kind())),
        }
    }

    fn clear_table(&mut self, id: &str) -> Result<(), FormError> {
        self.table_mut(id)?.rows.clear();
        Ok(())
    }

    fn append_row(&mut self, id: &str, cells: Vec<String>) -> Result<(), FormError> {
        self.table_mut(id)?.rows.push(cells);
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Page {
        Page::new("Sample")
            .with_input("rate", "Rate", "0.05")
            .with_radio("call", "callPut", "Call")
            .with_radio("put", "callPut", "Put")
            .with_radio("annual", "periodicity", "Annual")
            .with_button("calculate", "Calculate")
            .with_output("delta", "Delta")
            .with_table("tableResults", ["Period", "Payment"])
    }

    #[test]
    fn test_builder_keeps_declaration_order() {
        let page = sample_page();
        let ids: Vec<&str> = page.elements().iter().map(Element::id).collect();
        assert_eq!(
            ids,
            vec!["rate", "call", "put", "annual", "calculate", "delta", "tableResults"]
        );
        assert_eq!(page.title(), "Sample");
    }

    #[test]
    fn test_duplicate_id_replaces_in_place() {
        let page = sample_page().with_input("rate", "Risk-free rate", "0.01");
        assert_eq!(page.elements().len(), 7);
        assert_eq!(page.input_field("rate").unwrap().placeholder, "0.01");
        assert_eq!(page.elements()[0].id(), "rate");
    }

    #[test]
    fn test_focusable_ids() {
        let page = sample_page();
        assert_eq!(
            page.focusable_ids(),
            vec!["rate", "call", "put", "annual", "calculate"]
        );
    }

    #[test]
    fn test_check_is_exclusive_within_group() {
        let mut page = sample_page();
        page.check("annual").unwrap();
        page.check("call").unwrap();
        page.check("put").unwrap();

        assert!(!page.is_checked("call").unwrap());
        assert!(page.is_checked("put").unwrap());
        // Other groups are untouched
        assert!(page.is_checked("annual").unwrap());
    }

    #[test]
    fn test_wrong_kind_and_missing() {
        let mut page = sample_page();
        assert_eq!(
            page.check("rate"),
            Err(FormError::wrong_kind("rate", "radio button", "input field"))
        );
        assert_eq!(page.set_value("nope", "1"), Err(FormError::missing("nope")));
        assert!(page.set_output("rate", "1").is_err());
        assert!(page.table("delta").is_err());
        assert!(page.input("call").is_err());
    }

    #[test]
    fn test_table_rows() {
        let mut page = sample_page();
        page.append_row("tableResults", vec!["1".into(), "50".into()])
            .unwrap();
        page.append_row("tableResults", vec!["2".into(), "50".into()])
            .unwrap();
        assert_eq!(page.table("tableResults").unwrap().rows.len(), 2);

        page.clear_table("tableResults").unwrap();
        assert!(page.table("tableResults").unwrap().rows.is_empty());
    }

    #[test]
    fn test_apply_placeholders_skips_foreign_ids() {
        let mut page = sample_page();
        let overrides = BTreeMap::from([
            ("rate".to_string(), "0.02".to_string()),
            ("parValue".to_string(), "500".to_string()),
            ("delta".to_string(), "x".to_string()),
        ]);
        assert_eq!(page.apply_placeholders(&overrides), 1);
        assert_eq!(page.input_field("rate").unwrap().placeholder, "0.02");
    }

    #[test]
    fn test_alert_queue() {
        let mut page = sample_page();
        page.alert("first");
        page.alert("second");
        assert_eq!(page.pending_alerts(), ["first", "second"]);
        assert_eq!(page.dismiss_alert().as_deref(), Some("first"));
        assert_eq!(page.dismiss_alert().as_deref(), Some("second"));
        assert_eq!(page.dismiss_alert(), None);
    }
}
