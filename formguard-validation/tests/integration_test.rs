//! Integration tests for formguard-validation

use formguard_testing::fixtures::{self, set_text, set_value};
use formguard_testing::{MockPresenter, MockTransport};
use formguard_validation::*;
use std::sync::Arc;
use std::time::Duration;

fn validator(transport: MockTransport) -> FormValidator<MockPresenter, MockTransport> {
    FormValidator::new(
        Arc::new(RuleRegistry::builtin()),
        ValidatorConfig::default(),
        MockPresenter::new(),
        transport,
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_empty_signup_is_blocked() {
    let validator = validator(MockTransport::new());
    let form = fixtures::signup_form();

    let outcome = validator.handle_submit(&form).await.unwrap();

    let SubmitOutcome::Blocked(report) = outcome else {
        panic!("expected a blocked submission, got {:?}", outcome);
    };
    assert!(report.ensure_configured().is_ok());
    assert_eq!(
        validator.presenter().marked_fields(),
        vec!["age", "email", "name", "password", "terms"]
    );
    assert_eq!(
        validator.presenter().messages("terms"),
        vec!["This checkbox must be checked!"]
    );
    assert_eq!(validator.transport().call_count(), 0);
    assert_eq!(validator.state(), FormState::Idle);
    assert!(!validator.is_locked());
}

#[tokio::test(start_paused = true)]
async fn test_filled_signup_is_submitted() {
    let validator = validator(MockTransport::new());
    let form = fixtures::filled_signup_form();

    let outcome = validator.handle_submit(&form).await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Submitted(SubmitMethod::Submit));
    assert_eq!(validator.transport().submitted_forms(), vec!["signup"]);
    assert_eq!(validator.presenter().lock_layer_count(), 1);
    assert_eq!(validator.presenter().message_element_count(), 0);
    assert!(validator.is_locked());
}

#[tokio::test(start_paused = true)]
async fn test_repeated_blocked_submits_do_not_duplicate_messages() {
    let validator = validator(MockTransport::new());
    let form = fixtures::signup_form();

    validator.handle_submit(&form).await.unwrap();
    let first = validator.presenter().message_element_count();
    validator.handle_submit(&form).await.unwrap();

    assert_eq!(first, 5);
    assert_eq!(validator.presenter().message_element_count(), first);
    assert_eq!(validator.presenter().messages("email").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_only_current_failures_are_rendered() {
    let validator = validator(MockTransport::new());
    let mut form = fixtures::filled_signup_form();
    set_text(&mut form, "email", "not-an-email");
    set_text(&mut form, "age", "abc");

    validator.handle_submit(&form).await.unwrap();
    assert_eq!(validator.presenter().marked_fields(), vec!["age", "email"]);

    set_text(&mut form, "age", "7");
    let outcome = validator.handle_submit(&form).await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
    assert_eq!(validator.presenter().marked_fields(), vec!["email"]);
    assert_eq!(
        validator.presenter().messages("email"),
        vec!["Invalid email address!"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_submits_call_transport_once() {
    let validator = validator(MockTransport::new());
    let form = fixtures::filled_signup_form();

    let (first, second) = tokio::join!(
        validator.handle_submit(&form),
        validator.handle_submit(&form)
    );

    assert_eq!(first.unwrap(), SubmitOutcome::Submitted(SubmitMethod::Submit));
    assert_eq!(second.unwrap(), SubmitOutcome::Ignored);
    assert_eq!(validator.transport().call_count(), 1);

    let third = validator.handle_submit(&form).await.unwrap();
    assert_eq!(third, SubmitOutcome::Ignored);
    assert_eq!(validator.transport().call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transport_is_not_called_before_delay() {
    let validator = validator(MockTransport::new());
    let form = fixtures::filled_signup_form();

    let pending = validator.handle_submit(&form);
    tokio::pin!(pending);

    let early = tokio::time::timeout(Duration::from_millis(250), &mut pending).await;
    assert!(early.is_err());
    assert!(validator.is_locked());
    assert_eq!(validator.state(), FormState::Submitting);
    assert_eq!(validator.transport().call_count(), 0);

    pending.await.unwrap();
    assert_eq!(validator.transport().call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_captcha_form_is_challenged() {
    let validator = validator(MockTransport::new());
    let form = fixtures::captcha_contact_form("ann@example.com");

    let outcome = validator.handle_submit(&form).await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Submitted(SubmitMethod::Challenge));
    assert_eq!(validator.transport().challenge_count(), 1);
    assert_eq!(validator.transport().submit_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_captcha_form_is_not_challenged() {
    let validator = validator(MockTransport::new());
    let form = fixtures::captcha_contact_form("nope");

    let outcome = validator.handle_submit(&form).await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
    assert_eq!(validator.transport().call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_transport_can_be_retried() {
    let validator = validator(MockTransport::failing("network down"));
    let form = fixtures::filled_signup_form();

    let result = validator.handle_submit(&form).await;
    assert!(matches!(result, Err(FormError::Transport(_))));
    assert!(!validator.is_locked());
    assert_eq!(validator.state(), FormState::Idle);

    let _ = validator.handle_submit(&form).await;
    assert_eq!(validator.transport().submit_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_focus_clears_marked_field_once() {
    let validator = validator(MockTransport::new());
    let form = fixtures::signup_form();
    validator.handle_submit(&form).await.unwrap();

    validator.on_field_focus("email");
    validator.on_field_focus("email");

    assert!(!validator.presenter().is_marked("email"));
    assert_eq!(validator.presenter().removal_count("email"), 1);
    assert!(validator.presenter().is_marked("name"));
}

#[test]
fn test_focus_on_clean_field_is_noop() {
    let validator = validator(MockTransport::new());

    validator.on_field_focus("name");

    assert_eq!(validator.presenter().removal_count("name"), 0);
    assert_eq!(validator.presenter().message_element_count(), 0);
}

#[test]
fn test_custom_messages_by_position() {
    let validator = validator(MockTransport::new());
    let form = FormModel::new("f")
        .with_element(
            InputElement::text("email", "")
                .with_rules("required|email")
                .with_messages("Please enter your email|That is not an email"),
        )
        .with_element(
            InputElement::text("backup", "x")
                .with_rules("required|email")
                .with_messages("Please enter a backup email"),
        );

    let report = validator.validate_and_present(&form);

    assert!(!report.is_valid());
    assert_eq!(
        validator.presenter().messages("email"),
        vec!["Please enter your email"]
    );
    // second rule has no custom message, so the template is used
    assert_eq!(
        validator.presenter().messages("backup"),
        vec!["Invalid email address!"]
    );
}

#[test]
fn test_minlength_message_per_field() {
    let validator = validator(MockTransport::new());
    let form = FormModel::new("f")
        .with_element(
            InputElement::text("short", "ab")
                .with_rules("minlength")
                .with_data(LENGTH_KEY, "3"),
        )
        .with_element(
            InputElement::text("long", "ab")
                .with_rules("minlength")
                .with_data(LENGTH_KEY, "10"),
        );

    validator.validate_and_present(&form);

    assert_eq!(
        validator.presenter().messages("short"),
        vec!["This field must be at least 3 characters long!"]
    );
    assert_eq!(
        validator.presenter().messages("long"),
        vec!["This field must be at least 10 characters long!"]
    );
    assert_eq!(
        validator.registry().dictionary().template("default", "minlength"),
        Some("This field must be at least {min} characters long!")
    );
}

#[test]
fn test_password_mismatch_marks_confirmation() {
    let validator = validator(MockTransport::new());
    let mut form = fixtures::filled_signup_form();
    set_text(&mut form, "password-again", "secret2");

    let report = validator.validate_and_present(&form);

    let failure = report.failures();
    assert_eq!(failure.len(), 1);
    assert_eq!(failure.for_field("password-again").unwrap().rule, "password");
}

#[test]
fn test_rejected_upload_marks_file_field() {
    let validator = validator(MockTransport::new());
    let mut form = fixtures::filled_signup_form();
    set_value(
        &mut form,
        "file-upload",
        FieldValue::Files(vec![SelectedFile::new("cv.exe", 100)]),
    );

    let report = validator.validate_and_present(&form);

    assert_eq!(validator.presenter().marked_fields(), vec!["file-upload"]);
    assert_eq!(report.failures().len(), 1);
}

#[test]
fn test_required_upload_with_selected_file() {
    let validator = validator(MockTransport::new());
    let upload = |files: Vec<SelectedFile>| {
        FormModel::new("apply").with_element(
            InputElement::file("file-upload", files)
                .with_rules("required|file")
                .with_data(EXTENSION_KEY, "pdf")
                .with_data(SIZE_KEY, "2000"),
        )
    };

    let report = validator.validate(&upload(vec![SelectedFile::new("cv.pdf", 1000)]));
    assert!(report.is_valid());

    let report = validator.validate(&upload(Vec::new()));
    let outcome = report.outcome("file-upload").unwrap();
    assert_eq!(outcome.failed_rule.as_deref(), Some("required"));
    assert_eq!(outcome.message.as_deref(), Some("This field is required!"));
}

#[test]
fn test_hungarian_locale() {
    let validator = FormValidator::new(
        Arc::new(RuleRegistry::builtin()),
        ValidatorConfig::default().with_locale("hu"),
        MockPresenter::new(),
        MockTransport::new(),
    )
    .unwrap();
    let form = fixtures::signup_form();

    validator.validate_and_present(&form);

    assert_eq!(
        validator.presenter().messages("name"),
        vec!["A mező kitöltése kötelező!"]
    );
}

#[test]
fn test_custom_rule_registration() {
    let mut dictionary = formguard_i18n::LocaleDictionary::new();
    dictionary.insert("default", "uppercase", "Use capital letters only!");
    let registry = RuleRegistry::builtin()
        .register(FnRule::new("uppercase", |ctx: &RuleContext<'_>| {
            ctx.value.chars().all(|c| !c.is_lowercase())
        }))
        .extend_dictionary(dictionary);

    let validator = FormValidator::new(
        Arc::new(registry),
        ValidatorConfig::default(),
        MockPresenter::new(),
        MockTransport::new(),
    )
    .unwrap();
    let form = FormModel::new("f")
        .with_element(InputElement::text("code", "abc").with_rules("required|uppercase"));

    validator.validate_and_present(&form);

    assert_eq!(
        validator.presenter().messages("code"),
        vec!["Use capital letters only!"]
    );
}

#[test]
fn test_unknown_rule_is_reported() {
    let validator = validator(MockTransport::new());
    let form = FormModel::new("f")
        .with_element(InputElement::text("name", "Ann").with_rules("required|nonexistent"));

    let report = validator.validate(&form);

    assert!(!report.is_valid());
    assert!(matches!(
        report.ensure_configured(),
        Err(ConfigurationGap::UnknownRule { .. })
    ));
}

#[test]
fn test_form_from_json() {
    let json = r#"{
        "id": "newsletter",
        "elements": [
            {
                "id": "email",
                "dataset": { "rules": "required|email" },
                "value": { "kind": "text", "value": " ann@example.com " }
            }
        ]
    }"#;
    let form = FormModel::from_json(json).unwrap();
    let validator = validator(MockTransport::new());

    assert!(validator.validate(&form).is_valid());
}
