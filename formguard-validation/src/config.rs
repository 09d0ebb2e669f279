use formguard_i18n::DEFAULT_LOCALE;
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Active locale code for message templates
    pub locale: String,

    /// Delay before the transport runs, in milliseconds
    pub submit_delay_ms: u64,

    /// Id of the primary password input read by the `password` rule
    pub password_field: String,

    /// Id of the confirmation input read by the `password` rule
    pub password_confirm_field: String,

    /// Id of the file input whose files and limits the `file` rule checks
    pub file_input_field: String,

    /// Panic on configuration gaps in debug builds
    pub strict_configuration: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            submit_delay_ms: 300,
            password_field: "password".to_string(),
            password_confirm_field: "password-again".to_string(),
            file_input_field: "file-upload".to_string(),
            strict_configuration: false,
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `FORMGUARD_LOCALE`, `FORMGUARD_SUBMIT_DELAY_MS`
    /// and `FORMGUARD_STRICT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(locale) = env::var("FORMGUARD_LOCALE") {
            if !locale.trim().is_empty() {
                config.locale = locale.trim().to_string();
            }
        }

        if let Some(delay) = env::var("FORMGUARD_SUBMIT_DELAY_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            config.submit_delay_ms = delay;
        }

        if let Ok(strict) = env::var("FORMGUARD_STRICT") {
            config.strict_configuration = matches!(
                strict.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config
    }

    /// Set the active locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the submission delay
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the ids of the two password inputs
    pub fn with_password_fields(
        mut self,
        password: impl Into<String>,
        confirmation: impl Into<String>,
    ) -> Self {
        self.password_field = password.into();
        self.password_confirm_field = confirmation.into();
        self
    }

    /// Set the id of the file input
    pub fn with_file_input(mut self, id: impl Into<String>) -> Self {
        self.file_input_field = id.into();
        self
    }

    /// Assert, in debug builds, that a validation pass hit no configuration gaps
    pub fn with_strict_configuration(mut self, strict: bool) -> Self {
        self.strict_configuration = strict;
        self
    }

    /// Submission delay, never shorter than one millisecond.
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms.max(1))
    }
}
