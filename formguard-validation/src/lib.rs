//! Form validation engine for formguard
//!
//! Validates a form's inputs against the rule chains declared on them,
//! reports the first failing rule per field with a localized message, and
//! lets the submission through only when every field passes.
//!
//! # Examples
//!
//! ## Declaring rules
//!
//! Rules are read from each input's dataset, the way a page declares them
//! with `data-rules="required|email"`:
//!
//! ```
//! use formguard_validation::{Evaluator, FormModel, InputElement, RuleRegistry, ValidatorConfig};
//!
//! let form = FormModel::new("signup")
//!     .with_element(InputElement::text("email", "ann@example").with_rules("required|email"))
//!     .with_element(
//!         InputElement::text("password", "abc")
//!             .with_rules("required|minlength")
//!             .with_data("length", "5"),
//!     );
//!
//! let registry = RuleRegistry::builtin();
//! let config = ValidatorConfig::default();
//! let report = Evaluator::new(&registry, &config).validate_form(&form);
//!
//! assert!(!report.is_valid());
//! assert_eq!(
//!     report.outcome("password").unwrap().message.as_deref(),
//!     Some("This field must be at least 5 characters long!")
//! );
//! ```
//!
//! ## Custom rules
//!
//! ```
//! use formguard_validation::{FnRule, RuleRegistry};
//!
//! let registry = RuleRegistry::builtin().register_with_templates(
//!     FnRule::new("postcode", |ctx| ctx.value.len() == 4),
//!     [("default", "Invalid postcode!")],
//! );
//!
//! assert!(registry.has_rule("postcode"));
//! ```

mod config;
mod descriptor;
mod element;
mod errors;
mod evaluator;
mod form;
mod rules;
mod traits;
mod validators;

pub use config::*;
pub use descriptor::*;
pub use element::*;
pub use errors::*;
pub use evaluator::*;
pub use form::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;
