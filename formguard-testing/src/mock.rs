// Mock collaborators for testing

use async_trait::async_trait;
use formguard_validation::{FormModel, PresentationAdapter, SubmissionTransport, TransportError};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, Default)]
struct PresenterState {
    marked: BTreeSet<String>,
    message_elements: BTreeMap<String, Vec<String>>,
    removals: BTreeMap<String, usize>,
    lock_layers: usize,
    calls: Vec<String>,
}

/// Presentation adapter that keeps the error markup in memory.
///
/// Messages are appended, so rendering a field twice without clearing it
/// shows up as two message elements.
#[derive(Debug, Clone, Default)]
pub struct MockPresenter {
    state: Arc<Mutex<PresenterState>>,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the field carries the failure marker.
    pub fn is_marked(&self, field: &str) -> bool {
        self.state.lock().marked.contains(field)
    }

    /// Ids of marked fields, sorted.
    pub fn marked_fields(&self) -> Vec<String> {
        self.state.lock().marked.iter().cloned().collect()
    }

    /// Message elements currently shown next to a field.
    pub fn messages(&self, field: &str) -> Vec<String> {
        self.state
            .lock()
            .message_elements
            .get(field)
            .cloned()
            .unwrap_or_default()
    }

    /// Total message elements on the page.
    pub fn message_element_count(&self) -> usize {
        self.state.lock().message_elements.values().map(Vec::len).sum()
    }

    /// How many times a field's marker was actually removed.
    pub fn removal_count(&self, field: &str) -> usize {
        self.state.lock().removals.get(field).copied().unwrap_or(0)
    }

    /// How many times the form was locked for submission.
    pub fn lock_layer_count(&self) -> usize {
        self.state.lock().lock_layers
    }

    /// Every adapter call, as `invalid:<id>`, `cleared:<id>` or `locked:<form>`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl PresentationAdapter for MockPresenter {
    fn on_field_invalid(&self, field: &str, message: Option<&str>) {
        let mut state = self.state.lock();
        state.calls.push(format!("invalid:{}", field));
        state.marked.insert(field.to_string());
        state
            .message_elements
            .entry(field.to_string())
            .or_default()
            .push(message.unwrap_or_default().to_string());
    }

    fn on_field_cleared(&self, field: &str) {
        let mut state = self.state.lock();
        state.calls.push(format!("cleared:{}", field));
        if state.marked.remove(field) {
            state.message_elements.remove(field);
            *state.removals.entry(field.to_string()).or_default() += 1;
        }
    }

    fn on_submission_locked(&self, form: &FormModel) {
        let mut state = self.state.lock();
        state.calls.push(format!("locked:{}", form.id()));
        state.lock_layers += 1;
    }
}

#[derive(Debug, Default)]
struct TransportLog {
    submitted: Vec<String>,
    challenged: Vec<String>,
}

/// Submission transport that records calls instead of sending anything.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    log: Arc<Mutex<TransportLog>>,
    failure: Option<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn submit_count(&self) -> usize {
        self.log.lock().submitted.len()
    }

    pub fn challenge_count(&self) -> usize {
        self.log.lock().challenged.len()
    }

    /// Submissions and challenges combined.
    pub fn call_count(&self) -> usize {
        self.submit_count() + self.challenge_count()
    }

    /// Ids of the forms passed to `submit`.
    pub fn submitted_forms(&self) -> Vec<String> {
        self.log.lock().submitted.clone()
    }

    fn outcome(&self) -> Result<(), TransportError> {
        match &self.failure {
            Some(message) => Err(TransportError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SubmissionTransport for MockTransport {
    async fn submit(&self, form: &FormModel) -> Result<(), TransportError> {
        self.log.lock().submitted.push(form.id().to_string());
        self.outcome()
    }

    async fn challenge(&self, form: &FormModel) -> Result<(), TransportError> {
        self.log.lock().challenged.push(form.id().to_string());
        self.outcome()
    }
}
