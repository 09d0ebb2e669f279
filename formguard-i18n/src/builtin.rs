//! Built-in templates for the canonical rules

use crate::{LocaleDictionary, MessageBundle};
use once_cell::sync::Lazy;

/// Locale code that every dictionary is expected to carry.
pub const DEFAULT_LOCALE: &str = "default";

static BUILTIN: Lazy<LocaleDictionary> = Lazy::new(|| {
    let mut dictionary = LocaleDictionary::new();

    dictionary.add_bundle(
        DEFAULT_LOCALE,
        MessageBundle::new()
            .with("required", "This field is required!")
            .with("email", "Invalid email address!")
            .with("number", "This field may only contain numbers!")
            .with("required_cb", "This checkbox must be checked!")
            .with(
                "file",
                "The selected file is not acceptable! Please check the file size and type!",
            )
            .with("password", "The two password fields do not match!")
            .with("minlength", "This field must be at least {min} characters long!"),
    );

    dictionary.add_bundle(
        "hu",
        MessageBundle::new()
            .with("required", "A mező kitöltése kötelező!")
            .with("email", "Érvénytelen email cím!")
            .with("number", "A mező csak számot tartalmazhat!")
            .with("required_cb", "A jelölőnégyzet bepipálás kötelező!")
            .with(
                "file",
                "A kiválasztott fájl nem megfelelő! Kérem ellenőrizze a fájl méretét és típusát!",
            )
            .with("password", "A két jelszó mező különbözik!")
            .with("minlength", "A mező hossza minimum {min} karakter!"),
    );

    dictionary
});

/// A copy of the built-in `default` (English) and `hu` dictionaries.
pub fn builtin_dictionary() -> LocaleDictionary {
    BUILTIN.clone()
}
