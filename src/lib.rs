// formguard - declarative validation for HTML forms
//
// Fields declare their rule chains in data attributes; the validator runs
// them on submit, shows localized messages, and gates the submission.

// Re-export the validation engine
pub use formguard_validation::*;

// Re-export supporting crates
pub use formguard_i18n;
pub use formguard_log;

#[cfg(feature = "testing")]
pub use formguard_testing;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        BuiltinRule,
        FieldDescriptor,
        FieldValue,
        FnRule,
        FormError,
        FormModel,
        FormState,
        FormValidator,
        InputElement,
        PresentationAdapter,
        Rule,
        RuleContext,
        RuleRegistry,
        SelectedFile,
        SubmissionTransport,
        SubmitMethod,
        SubmitOutcome,
        TransportError,
        ValidationReport,
        ValidatorConfig,
    };
    pub use formguard_i18n::{LocaleDictionary, MessageBundle};
}
