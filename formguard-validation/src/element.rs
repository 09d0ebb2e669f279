// Snapshot of the form's inputs

use crate::FieldLookup;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A file chosen in a file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Lowercased text after the last `.`, or the whole name without one.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// Current value of an input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Checked(bool),
    Files(Vec<SelectedFile>),
}

impl FieldValue {
    /// Text content; empty for checkboxes and file inputs.
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(text) => text,
            _ => "",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, FieldValue::Checked(true))
    }

    /// Whether the input holds anything: non-blank text, a checked box, or
    /// at least one selected file.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.trim().is_empty(),
            FieldValue::Checked(checked) => *checked,
            FieldValue::Files(files) => !files.is_empty(),
        }
    }

    /// Selected files; empty for non-file inputs.
    pub fn files(&self) -> &[SelectedFile] {
        match self {
            FieldValue::Files(files) => files,
            _ => &[],
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// An input element with its `data-*` attributes.
///
/// Dataset keys are stored without the `data-` prefix, the way the DOM
/// exposes them (`data-rules` is read as `rules`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputElement {
    id: String,
    #[serde(default)]
    dataset: HashMap<String, String>,
    #[serde(default)]
    value: FieldValue,
}

impl InputElement {
    /// A text-like input (`text`, `email`, `password`, ...).
    pub fn text(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_value(id, FieldValue::Text(value.into()))
    }

    pub fn checkbox(id: impl Into<String>, checked: bool) -> Self {
        Self::with_value(id, FieldValue::Checked(checked))
    }

    pub fn file(id: impl Into<String>, files: Vec<SelectedFile>) -> Self {
        Self::with_value(id, FieldValue::Files(files))
    }

    pub fn with_value(id: impl Into<String>, value: FieldValue) -> Self {
        Self {
            id: id.into(),
            dataset: HashMap::new(),
            value,
        }
    }

    /// Set a dataset attribute.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dataset.insert(key.into(), value.into());
        self
    }

    /// Shorthand for the `rules` attribute.
    pub fn with_rules(self, rules: impl Into<String>) -> Self {
        self.with_data(crate::RULES_KEY, rules)
    }

    /// Shorthand for the `messages` attribute.
    pub fn with_messages(self, messages: impl Into<String>) -> Self {
        self.with_data(crate::MESSAGES_KEY, messages)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn set_value(&mut self, value: FieldValue) {
        self.value = value;
    }
}

/// The inputs of one form, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormModel {
    id: String,
    #[serde(default)]
    elements: Vec<InputElement>,
    /// Whether a CAPTCHA widget is rendered inside the form
    #[serde(default)]
    captcha: bool,
}

impl FormModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: Vec::new(),
            captcha: false,
        }
    }

    /// Parse a snapshot serialized by the page.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_element(mut self, element: InputElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_captcha(mut self, captcha: bool) -> Self {
        self.captcha = captcha;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn elements(&self) -> &[InputElement] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&InputElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut InputElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn has_captcha(&self) -> bool {
        self.captcha
    }
}

impl FieldLookup for FormModel {
    fn field(&self, id: &str) -> Option<&InputElement> {
        self.element(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(SelectedFile::new("Report.PDF", 1).extension(), "pdf");
        assert_eq!(SelectedFile::new("archive.tar.gz", 1).extension(), "gz");
        assert_eq!(SelectedFile::new("README", 1).extension(), "readme");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(FieldValue::Text("abc".into()).as_text(), "abc");
        assert_eq!(FieldValue::Checked(true).as_text(), "");
        assert!(FieldValue::Checked(true).is_checked());
        assert!(!FieldValue::Text("on".into()).is_checked());
        assert!(FieldValue::Text("x".into()).files().is_empty());
    }

    #[test]
    fn test_value_presence() {
        assert!(FieldValue::Text(" a ".into()).is_present());
        assert!(!FieldValue::Text(" \t ".into()).is_present());
        assert!(FieldValue::Checked(true).is_present());
        assert!(!FieldValue::Checked(false).is_present());
        assert!(FieldValue::Files(vec![SelectedFile::new("a.pdf", 1)]).is_present());
        assert!(!FieldValue::Files(Vec::new()).is_present());
    }

    #[test]
    fn test_form_lookup() {
        let mut form = FormModel::new("signup")
            .with_element(InputElement::text("name", "Ann").with_rules("required"))
            .with_element(InputElement::checkbox("terms", false));

        assert_eq!(form.field("name").unwrap().data("rules"), Some("required"));
        assert!(form.field("missing").is_none());

        form.element_mut("terms").unwrap().set_value(FieldValue::Checked(true));
        assert!(form.element("terms").unwrap().value().is_checked());
    }

    #[test]
    fn test_form_from_json() {
        let json = r#"{
            "id": "upload",
            "captcha": true,
            "elements": [
                { "id": "name", "dataset": { "rules": "required" },
                  "value": { "kind": "text", "value": "Ann" } },
                { "id": "file-upload",
                  "value": { "kind": "files", "value": [ { "name": "a.pdf", "size": 10 } ] } }
            ]
        }"#;

        let form = FormModel::from_json(json).unwrap();
        assert!(form.has_captcha());
        assert_eq!(form.elements().len(), 2);
        assert_eq!(form.element("file-upload").unwrap().value().files()[0].size, 10);
    }
}
