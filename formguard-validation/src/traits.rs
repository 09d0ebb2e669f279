// Seams between the engine and the page

use crate::{FormModel, InputElement, TransportError};
use async_trait::async_trait;

/// Form-scoped access to other inputs by id.
///
/// Rules that compare against a sibling (password confirmation) or read
/// another input's configuration (the file input) go through this instead
/// of touching the page directly.
pub trait FieldLookup {
    fn field(&self, id: &str) -> Option<&InputElement>;
}

/// Renders and clears per-field error state.
pub trait PresentationAdapter: Send + Sync {
    /// Mark the field as failed and show `message` next to it.
    ///
    /// `message` is `None` when neither a custom message nor a template
    /// could be resolved.
    fn on_field_invalid(&self, field: &str, message: Option<&str>);

    /// Remove the failure marker and message element.
    ///
    /// Must be a no-op for a field that is not marked.
    fn on_field_cleared(&self, field: &str);

    /// Called once when submission begins and the trigger is taken over.
    fn on_submission_locked(&self, _form: &FormModel) {}
}

/// Delivers a validated form.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// Plain form submission
    async fn submit(&self, form: &FormModel) -> Result<(), TransportError>;

    /// Start the CAPTCHA challenge for forms carrying a CAPTCHA widget
    async fn challenge(&self, form: &FormModel) -> Result<(), TransportError>;
}
