//! Form fixtures.
//!
//! [`signup_form`] mirrors a typical registration page: every canonical
//! rule appears once, with the default ids the `password` and `file`
//! rules look up.

use formguard_validation::{
    EXTENSION_KEY, FieldValue, FormModel, InputElement, LENGTH_KEY, SIZE_KEY, SelectedFile,
};

/// Registration form with every field left empty.
pub fn signup_form() -> FormModel {
    FormModel::new("signup")
        .with_element(InputElement::text("name", "").with_rules("required"))
        .with_element(InputElement::text("email", "").with_rules("required|email"))
        .with_element(InputElement::text("age", "").with_rules("number"))
        .with_element(
            InputElement::text("password", "")
                .with_rules("required|minlength")
                .with_data(LENGTH_KEY, "5"),
        )
        .with_element(InputElement::text("password-again", "").with_rules("password"))
        .with_element(InputElement::checkbox("terms", false).with_rules("required_cb"))
        .with_element(
            InputElement::file("file-upload", Vec::new())
                .with_rules("file")
                .with_data(EXTENSION_KEY, "pdf|png")
                .with_data(SIZE_KEY, "2000"),
        )
}

/// Registration form that passes every rule.
pub fn filled_signup_form() -> FormModel {
    let mut form = signup_form();
    set_text(&mut form, "name", "Ann Example");
    set_text(&mut form, "email", "ann@example.com");
    set_text(&mut form, "age", "42");
    set_text(&mut form, "password", "secret1");
    set_text(&mut form, "password-again", " secret1 ");
    set_value(&mut form, "terms", FieldValue::Checked(true));
    set_value(
        &mut form,
        "file-upload",
        FieldValue::Files(vec![SelectedFile::new("cv.pdf", 1000)]),
    );
    form
}

/// Contact form guarded by a CAPTCHA widget.
pub fn captcha_contact_form(email: &str) -> FormModel {
    FormModel::new("contact")
        .with_captcha(true)
        .with_element(InputElement::text("email", email).with_rules("required|email"))
        .with_element(InputElement::text("message", "Hello"))
}

/// Replace a text field's value. Unknown ids are ignored.
pub fn set_text(form: &mut FormModel, id: &str, value: &str) {
    set_value(form, id, FieldValue::Text(value.to_string()));
}

/// Replace a field's value. Unknown ids are ignored.
pub fn set_value(form: &mut FormModel, id: &str, value: FieldValue) {
    if let Some(element) = form.element_mut(id) {
        element.set_value(value);
    }
}
