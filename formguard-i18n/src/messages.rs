//! Message bundles and the locale dictionary
//!
//! A [`LocaleDictionary`] maps a locale code to a [`MessageBundle`], and a
//! bundle maps a rule name to its message template. Templates are never
//! modified once stored; [`render`] always produces a fresh string.

use crate::{I18nError, Result};
use formguard_log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Message templates for a single locale, keyed by rule name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
}

impl MessageBundle {
    /// Create a new empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a flat `{"rule": "template"}` JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut bundle = Self::new();

        for (key, value) in data {
            match value {
                serde_json::Value::String(template) => bundle.add(key, template),
                other => {
                    return Err(I18nError::ParseError(format!(
                        "template for '{}' must be a string, got {}",
                        key, other
                    )));
                }
            }
        }

        Ok(bundle)
    }

    /// Add or replace a template.
    pub fn add(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(key.into(), template.into());
    }

    /// Builder form of [`MessageBundle::add`].
    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.add(key, template);
        self
    }

    /// Get a template.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Check if bundle has a template.
    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// All template keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.messages.keys()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn merge(&mut self, other: MessageBundle) {
        self.messages.extend(other.messages);
    }
}

/// Message bundles for every known locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleDictionary {
    bundles: HashMap<String, MessageBundle>,
}

impl LocaleDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle for a locale, merging into any existing bundle.
    ///
    /// Templates already present for the locale are replaced key by key.
    pub fn add_bundle(&mut self, locale: impl Into<String>, bundle: MessageBundle) {
        self.bundles.entry(locale.into()).or_default().merge(bundle);
    }

    /// Add a single template.
    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.bundles
            .entry(locale.into())
            .or_default()
            .add(key, template);
    }

    /// Get the bundle for a locale code.
    pub fn bundle(&self, locale: &str) -> Option<&MessageBundle> {
        self.bundles.get(locale)
    }

    /// Look up a template, `None` when either the locale or the key is unknown.
    pub fn template(&self, locale: &str, key: &str) -> Option<&str> {
        self.bundle(locale).and_then(|bundle| bundle.get(key))
    }

    /// Like [`LocaleDictionary::template`], with the reason for a miss.
    pub fn require(&self, locale: &str, key: &str) -> Result<&str> {
        let bundle = self
            .bundle(locale)
            .ok_or_else(|| I18nError::BundleNotFound(locale.to_string()))?;
        bundle.get(key).ok_or_else(|| I18nError::MessageNotFound {
            key: key.to_string(),
            locale: locale.to_string(),
        })
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.bundles.contains_key(locale)
    }

    /// Registered locale codes, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Merge another dictionary into this one.
    pub fn extend(&mut self, other: LocaleDictionary) {
        for (locale, bundle) in other.bundles {
            self.add_bundle(locale, bundle);
        }
    }

    /// Load a nested `{"<locale>": {"<rule>": "<template>"}}` JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut dictionary = Self::new();

        for (locale, value) in data {
            let bundle = MessageBundle::from_json(&value.to_string())?;
            dictionary.add_bundle(locale, bundle);
        }

        Ok(dictionary)
    }

    /// Load every `<locale>.json` file in a directory.
    ///
    /// Each file holds a flat bundle; the file stem is the locale code.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();

        if !dir.is_dir() {
            return Err(I18nError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Directory not found: {:?}", dir),
            )));
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                let locale = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| I18nError::ParseError(format!("Invalid filename: {:?}", path)))?
                    .to_string();

                let bundle = MessageBundle::from_json(&fs::read_to_string(&path)?)?;
                debug!("loaded {} templates for locale '{}'", bundle.len(), locale);
                self.add_bundle(locale, bundle);
            }
        }

        Ok(())
    }
}

/// Substitute `{name}` placeholders in a template.
///
/// The template is borrowed and left untouched.
pub fn render(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (name, value) in args {
        let placeholder = format!("{{{}}}", name);
        result = result.replace(&placeholder, value);
    }

    result
}
