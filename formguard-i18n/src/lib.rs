//! Locale dictionaries for formguard
//!
//! Maps a locale code to the message templates of each validation rule.
//! A validator instance works with exactly one active locale, chosen at
//! construction time.
//!
//! ```rust
//! use formguard_i18n::{builtin_dictionary, render, DEFAULT_LOCALE};
//!
//! let dictionary = builtin_dictionary();
//! let template = dictionary.template(DEFAULT_LOCALE, "minlength").unwrap();
//!
//! assert_eq!(
//!     render(template, &[("min", "8")]),
//!     "This field must be at least 8 characters long!"
//! );
//! ```

mod builtin;
mod error;
mod messages;

pub use builtin::{DEFAULT_LOCALE, builtin_dictionary};
pub use error::I18nError;
pub use messages::{LocaleDictionary, MessageBundle, render};

/// Result type for dictionary operations
pub type Result<T> = std::result::Result<T, I18nError>;
