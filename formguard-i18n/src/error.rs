//! Error types for locale dictionary operations

use thiserror::Error;

/// Errors that can occur while building or loading a locale dictionary.
#[derive(Debug, Error)]
pub enum I18nError {
    /// No bundle registered for the locale code
    #[error("No message bundle for locale: {0}")]
    BundleNotFound(String),

    /// Template missing from an existing bundle
    #[error("Message not found: {key} for locale {locale}")]
    MessageNotFound { key: String, locale: String },

    /// Dictionary source has the wrong shape
    #[error("Failed to parse message file: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}
