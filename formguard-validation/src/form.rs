// Form orchestration: validation pass, error presentation, submission gating

use crate::{
    Evaluator, FormError, FormModel, PresentationAdapter, Result, RuleRegistry,
    SubmissionTransport, ValidationReport, ValidatorConfig,
};
use formguard_log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Waiting for a submission
    Idle,
    /// Running the rule chains
    Validating,
    /// At least one field failed; errors are being shown
    Blocked,
    /// Waiting for, or running, the submission transport
    Submitting,
}

/// How a validated form was handed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMethod {
    Submit,
    Challenge,
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Some field failed; the transport was not called
    Blocked(ValidationReport),
    /// Every field passed and the transport ran
    Submitted(SubmitMethod),
    /// A submission was already in progress or the trigger is locked
    Ignored,
}

/// Validates a form on submission and gates the submission transport.
///
/// ```rust
/// use formguard_validation::*;
/// use std::sync::Arc;
///
/// struct NoopPresenter;
///
/// impl PresentationAdapter for NoopPresenter {
///     fn on_field_invalid(&self, _field: &str, _message: Option<&str>) {}
///     fn on_field_cleared(&self, _field: &str) {}
/// }
///
/// struct NoopTransport;
///
/// #[async_trait::async_trait]
/// impl SubmissionTransport for NoopTransport {
///     async fn submit(&self, _form: &FormModel) -> std::result::Result<(), TransportError> {
///         Ok(())
///     }
///     async fn challenge(&self, _form: &FormModel) -> std::result::Result<(), TransportError> {
///         Ok(())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let validator = FormValidator::new(
///     Arc::new(RuleRegistry::builtin()),
///     ValidatorConfig::default(),
///     NoopPresenter,
///     NoopTransport,
/// )
/// .unwrap();
///
/// let form = FormModel::new("contact")
///     .with_element(InputElement::text("email", "ann@example.com").with_rules("required|email"));
///
/// let outcome = validator.handle_submit(&form).await.unwrap();
/// assert_eq!(outcome, SubmitOutcome::Submitted(SubmitMethod::Submit));
/// # });
/// ```
pub struct FormValidator<P, T> {
    registry: Arc<RuleRegistry>,
    config: ValidatorConfig,
    presenter: P,
    transport: T,
    state: Mutex<FormState>,
    locked: AtomicBool,
}

impl<P, T> FormValidator<P, T>
where
    P: PresentationAdapter,
    T: SubmissionTransport,
{
    /// Create a validator for the configured locale.
    ///
    /// Fails when the registry has no dictionary for that locale.
    pub fn new(
        registry: Arc<RuleRegistry>,
        config: ValidatorConfig,
        presenter: P,
        transport: T,
    ) -> Result<Self> {
        if !registry.has_locale(&config.locale) {
            return Err(FormError::UnknownLocale(config.locale.clone()));
        }

        Ok(Self {
            registry,
            config,
            presenter,
            transport,
            state: Mutex::new(FormState::Idle),
            locked: AtomicBool::new(false),
        })
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.registry, &self.config)
    }

    /// Validate without touching the presentation.
    pub fn validate(&self, form: &FormModel) -> ValidationReport {
        self.evaluator().validate_form(form)
    }

    /// Clear every field's errors, validate, and show the current failures.
    pub fn validate_and_present(&self, form: &FormModel) -> ValidationReport {
        for element in form.elements() {
            self.presenter.on_field_cleared(element.id());
        }

        let report = self.validate(form);
        for outcome in report.outcomes.iter().filter(|o| !o.valid) {
            self.presenter
                .on_field_invalid(&outcome.field, outcome.message.as_deref());
        }

        report
    }

    /// Handle a submission of `form`.
    ///
    /// On success the trigger stays locked and the transport runs once,
    /// after the configured delay. Attempts made while a submission is
    /// pending, or after it completed, are ignored until [`unlock`].
    ///
    /// [`unlock`]: FormValidator::unlock
    pub async fn handle_submit(&self, form: &FormModel) -> Result<SubmitOutcome> {
        if self.locked.load(Ordering::SeqCst) {
            warn!("submit of form '{}' ignored, trigger is locked", form.id());
            return Ok(SubmitOutcome::Ignored);
        }
        {
            let mut state = self.state.lock();
            if *state != FormState::Idle {
                warn!("submit of form '{}' ignored while {:?}", form.id(), *state);
                return Ok(SubmitOutcome::Ignored);
            }
            *state = FormState::Validating;
        }

        debug!("validating form '{}'", form.id());
        let report = self.validate_and_present(form);

        if !report.is_valid() {
            self.set_state(FormState::Blocked);
            debug!(
                "form '{}' blocked by {} failing field(s)",
                form.id(),
                report.outcomes.iter().filter(|o| !o.valid).count()
            );
            self.set_state(FormState::Idle);
            return Ok(SubmitOutcome::Blocked(report));
        }

        self.locked.store(true, Ordering::SeqCst);
        self.set_state(FormState::Submitting);
        self.presenter.on_submission_locked(form);

        // let the page render the lock before handing off
        tokio::time::sleep(self.config.submit_delay()).await;

        let method = if form.has_captcha() {
            SubmitMethod::Challenge
        } else {
            SubmitMethod::Submit
        };
        info!("handing off form '{}' via {:?}", form.id(), method);

        let result = match method {
            SubmitMethod::Submit => self.transport.submit(form).await,
            SubmitMethod::Challenge => self.transport.challenge(form).await,
        };
        self.set_state(FormState::Idle);

        match result {
            Ok(()) => Ok(SubmitOutcome::Submitted(method)),
            Err(err) => {
                error!("submission of form '{}' failed: {}", form.id(), err);
                self.locked.store(false, Ordering::SeqCst);
                Err(err.into())
            }
        }
    }

    /// Clear the errors of a field that received focus.
    pub fn on_field_focus(&self, field: &str) {
        self.presenter.on_field_cleared(field);
    }

    pub fn state(&self) -> FormState {
        *self.state.lock()
    }

    /// Whether submission has taken over the trigger.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// Release the trigger so the form can be submitted again.
    pub fn unlock(&self) {
        self.locked.store(false, Ordering::SeqCst);
        self.set_state(FormState::Idle);
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn set_state(&self, state: FormState) {
        *self.state.lock() = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputElement, TransportError};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct CountingPresenter {
        invalid: AtomicUsize,
        cleared: AtomicUsize,
        locked: AtomicUsize,
    }

    impl PresentationAdapter for CountingPresenter {
        fn on_field_invalid(&self, _field: &str, _message: Option<&str>) {
            self.invalid.fetch_add(1, Ordering::SeqCst);
        }

        fn on_field_cleared(&self, _field: &str) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }

        fn on_submission_locked(&self, _form: &FormModel) {
            self.locked.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct CountingTransport {
        submits: AtomicUsize,
        challenges: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SubmissionTransport for CountingTransport {
        async fn submit(&self, _form: &FormModel) -> std::result::Result<(), TransportError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TransportError::new("network down"));
            }
            Ok(())
        }

        async fn challenge(&self, _form: &FormModel) -> std::result::Result<(), TransportError> {
            self.challenges.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn validator(transport: CountingTransport) -> FormValidator<CountingPresenter, CountingTransport> {
        FormValidator::new(
            Arc::new(RuleRegistry::builtin()),
            ValidatorConfig::default(),
            CountingPresenter::default(),
            transport,
        )
        .unwrap()
    }

    fn form(name: &str) -> FormModel {
        FormModel::new("contact")
            .with_element(InputElement::text("name", name).with_rules("required"))
            .with_element(InputElement::text("note", ""))
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        let result = FormValidator::new(
            Arc::new(RuleRegistry::builtin()),
            ValidatorConfig::default().with_locale("xx"),
            CountingPresenter::default(),
            CountingTransport::default(),
        );
        assert!(matches!(result, Err(FormError::UnknownLocale(locale)) if locale == "xx"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_is_blocked() {
        let validator = validator(CountingTransport::default());

        let outcome = validator.handle_submit(&form("  ")).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Blocked(ref report) if !report.is_valid()));
        assert_eq!(validator.state(), FormState::Idle);
        assert!(!validator.is_locked());
        assert_eq!(validator.presenter().cleared.load(Ordering::SeqCst), 2);
        assert_eq!(validator.presenter().invalid.load(Ordering::SeqCst), 1);
        assert_eq!(validator.transport().submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_form_is_submitted_once() {
        let validator = validator(CountingTransport::default());

        let outcome = validator.handle_submit(&form("Ann")).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted(SubmitMethod::Submit));
        assert!(validator.is_locked());
        assert_eq!(validator.presenter().locked.load(Ordering::SeqCst), 1);

        let again = validator.handle_submit(&form("Ann")).await.unwrap();
        assert_eq!(again, SubmitOutcome::Ignored);
        assert_eq!(validator.transport().submits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_waits_for_delay() {
        let validator = validator(CountingTransport::default());
        let form = form("Ann");

        let submit = validator.handle_submit(&form);
        tokio::pin!(submit);

        assert!(tokio::time::timeout(Duration::from_millis(299), &mut submit).await.is_err());
        assert_eq!(validator.state(), FormState::Submitting);
        assert_eq!(validator.transport().submits.load(Ordering::SeqCst), 0);

        let outcome = submit.await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted(SubmitMethod::Submit));
        assert_eq!(validator.transport().submits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_captcha_form_uses_challenge() {
        let validator = validator(CountingTransport::default());

        let outcome = validator
            .handle_submit(&form("Ann").with_captcha(true))
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Submitted(SubmitMethod::Challenge));
        assert_eq!(validator.transport().challenges.load(Ordering::SeqCst), 1);
        assert_eq!(validator.transport().submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_releases_lock() {
        let validator = validator(CountingTransport {
            fail: true,
            ..Default::default()
        });

        let result = validator.handle_submit(&form("Ann")).await;

        assert!(matches!(result, Err(FormError::Transport(_))));
        assert!(!validator.is_locked());
        assert_eq!(validator.state(), FormState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlock_allows_resubmission() {
        let validator = validator(CountingTransport::default());

        validator.handle_submit(&form("Ann")).await.unwrap();
        validator.unlock();
        let outcome = validator.handle_submit(&form("Ann")).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Submitted(SubmitMethod::Submit));
        assert_eq!(validator.transport().submits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_focus_clears_field() {
        let validator = validator(CountingTransport::default());
        validator.on_field_focus("name");
        assert_eq!(validator.presenter().cleared.load(Ordering::SeqCst), 1);
    }
}
