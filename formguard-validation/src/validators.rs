// Built-in rules

use crate::descriptor::{EXTENSION_KEY, LENGTH_KEY};
use crate::{ConfigurationGap, FieldDescriptor, Rule, RuleContext, normalize};
use once_cell::sync::Lazy;
use regex::Regex;

// Local part: dot-separated atoms or a quoted string. Domain: dotted
// labels ending in a 2+ letter TLD, or a bracketed IPv4 literal.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is valid")
});

/// Whether `value` looks like an email address.
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Parse a number the way a browser coerces a string to a number.
///
/// Accepts decimals, exponents, a sign, `Infinity`, and `0x`/`0o`/`0b`
/// integer literals. The empty string is not a number.
pub fn parse_number(value: &str) -> Option<f64> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return Some(digits.chars().fold(0.0, |acc, c| {
            acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
        }));
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned == "Infinity" {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    // rejects Rust-only spellings such as "inf" and "NaN"
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    s.parse::<f64>().ok()
}

/// Non-empty and numeric.
pub fn is_number(value: &str) -> bool {
    parse_number(value).is_some()
}

/// The canonical rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinRule {
    /// Text is non-blank, a checkbox is checked, or a file is selected
    Required,
    /// Normalized value is an email address
    Email,
    /// Normalized value is a non-empty number
    Number,
    /// Checkbox is checked
    RequiredCheckbox,
    /// Every selected file has an allowed extension and size
    File,
    /// Password and confirmation match after normalization
    Password,
    /// Normalized value has at least the configured number of characters
    MinLength,
}

impl BuiltinRule {
    pub const ALL: [BuiltinRule; 7] = [
        BuiltinRule::Required,
        BuiltinRule::Email,
        BuiltinRule::Number,
        BuiltinRule::RequiredCheckbox,
        BuiltinRule::File,
        BuiltinRule::Password,
        BuiltinRule::MinLength,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinRule::Required => "required",
            BuiltinRule::Email => "email",
            BuiltinRule::Number => "number",
            BuiltinRule::RequiredCheckbox => "required_cb",
            BuiltinRule::File => "file",
            BuiltinRule::Password => "password",
            BuiltinRule::MinLength => "minlength",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.as_str() == name)
    }

    fn check_file(&self, ctx: &RuleContext<'_>) -> Result<bool, ConfigurationGap> {
        // the configured file input, or this field when the form has none
        let sibling = ctx
            .lookup
            .field(&ctx.config.file_input_field)
            .filter(|element| element.id() != ctx.field.id)
            .map(FieldDescriptor::extract);
        let source = sibling.as_ref().unwrap_or(ctx.field);

        let allowed = source.config.allowed_extensions.as_ref().ok_or_else(|| {
            ConfigurationGap::MissingConfiguration {
                field: source.id.clone(),
                rule: self.as_str().to_string(),
                key: EXTENSION_KEY.to_string(),
            }
        })?;

        Ok(source.value.files().iter().all(|file| {
            allowed.contains(&file.extension())
                && source.config.max_size.is_none_or(|max| file.size <= max)
        }))
    }

    fn check_password(&self, ctx: &RuleContext<'_>) -> Result<bool, ConfigurationGap> {
        let read = |id: &str| {
            ctx.lookup
                .field(id)
                .map(|element| normalize(element.value().as_text()))
                .ok_or_else(|| ConfigurationGap::MissingField {
                    field: ctx.field.id.clone(),
                    rule: self.as_str().to_string(),
                    missing: id.to_string(),
                })
        };

        let password = read(&ctx.config.password_field)?;
        let confirmation = read(&ctx.config.password_confirm_field)?;
        Ok(password == confirmation)
    }

    fn min_length(&self, ctx: &RuleContext<'_>) -> Result<usize, ConfigurationGap> {
        ctx.field
            .config
            .min_length
            .ok_or_else(|| ConfigurationGap::MissingConfiguration {
                field: ctx.field.id.clone(),
                rule: self.as_str().to_string(),
                key: LENGTH_KEY.to_string(),
            })
    }
}

impl Rule for BuiltinRule {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<bool, ConfigurationGap> {
        match self {
            BuiltinRule::Required => Ok(ctx.field.value.is_present()),
            BuiltinRule::Email => Ok(is_email(ctx.value)),
            BuiltinRule::Number => Ok(is_number(ctx.value)),
            BuiltinRule::RequiredCheckbox => Ok(ctx.field.value.is_checked()),
            BuiltinRule::File => self.check_file(ctx),
            BuiltinRule::Password => self.check_password(ctx),
            BuiltinRule::MinLength => {
                let min = self.min_length(ctx)?;
                Ok(ctx.value.chars().count() >= min)
            }
        }
    }

    fn message_args(&self, ctx: &RuleContext<'_>) -> Vec<(&'static str, String)> {
        match (self, ctx.field.config.min_length) {
            (BuiltinRule::MinLength, Some(min)) => vec![("min", min.to_string())],
            _ => Vec::new(),
        }
    }
}
