//! Testing utilities for formguard.
//!
//! - [`MockPresenter`] behaves like the page's error markup: a failed field
//!   gets a marker and a message element, clearing removes both.
//! - [`MockTransport`] records every submission and challenge.
//! - [`fixtures`] builds the forms used across the test suites.
//!
//! ```
//! use formguard_testing::{MockPresenter, fixtures};
//! use formguard_validation::PresentationAdapter;
//!
//! let presenter = MockPresenter::new();
//! presenter.on_field_invalid("email", Some("Invalid email address!"));
//! assert_eq!(presenter.messages("email"), vec!["Invalid email address!"]);
//!
//! presenter.on_field_cleared("email");
//! assert!(!presenter.is_marked("email"));
//!
//! let form = fixtures::signup_form();
//! assert!(form.element("password-again").is_some());
//! ```

pub mod fixtures;
mod mock;

pub use mock::{MockPresenter, MockTransport};
