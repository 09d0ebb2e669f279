// Validation errors

use serde::Serialize;
use thiserror::Error;

/// A rule in a field's chain rejected the field's current value.
///
/// This is the only failure a validation pass reports to the user. It is
/// handed to the presentation adapter, never returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: rule '{rule}' failed at position {position}")]
pub struct FieldRuleFailure {
    /// Id of the field that failed
    pub field: String,

    /// Name of the first failing rule
    pub rule: String,

    /// Position of that rule in the field's chain
    pub position: usize,

    /// Resolved message, `None` when no template or custom message applies
    pub message: Option<String>,
}

/// Collection of rule failures from one validation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldRuleFailures {
    pub errors: Vec<FieldRuleFailure>,
}

impl FieldRuleFailures {
    pub fn new(errors: Vec<FieldRuleFailure>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The failure recorded for a field, if any.
    pub fn for_field(&self, field: &str) -> Option<&FieldRuleFailure> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRuleFailure> {
        self.errors.iter()
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "rule": e.rule,
                    "position": e.position,
                    "message": e.message,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl From<Vec<FieldRuleFailure>> for FieldRuleFailures {
    fn from(errors: Vec<FieldRuleFailure>) -> Self {
        Self::new(errors)
    }
}

/// A rule or template the form declares but the validator cannot supply.
///
/// Gaps are defects in the page or registry setup. A pass that hits one
/// logs it, records it in the report, and treats the rule as failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigurationGap {
    #[error("rule '{rule}' declared on field '{field}' is not registered")]
    UnknownRule { field: String, rule: String },

    #[error("no '{rule}' message template for locale '{locale}'")]
    MissingTemplate { rule: String, locale: String },

    #[error("field '{field}' lacks the '{key}' attribute needed by rule '{rule}'")]
    MissingConfiguration {
        field: String,
        rule: String,
        key: String,
    },

    #[error("rule '{rule}' on field '{field}' reads missing field '{missing}'")]
    MissingField {
        field: String,
        rule: String,
        missing: String,
    },
}

/// The submission transport could not deliver the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors returned by validator construction and submission.
#[derive(Debug, Error)]
pub enum FormError {
    /// The configured locale has no dictionary entry
    #[error("no message dictionary for locale '{0}'")]
    UnknownLocale(String),

    #[error("submission failed: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    I18n(#[from] formguard_i18n::I18nError),
}

pub type Result<T> = std::result::Result<T, FormError>;
