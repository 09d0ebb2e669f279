// Rule registry

use crate::{BuiltinRule, ConfigurationGap, FieldDescriptor, FieldLookup, ValidatorConfig};
use formguard_i18n::{LocaleDictionary, builtin_dictionary};
use formguard_log::warn;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a rule sees while it runs.
pub struct RuleContext<'a> {
    pub field: &'a FieldDescriptor,
    /// The field's normalized text value
    pub value: &'a str,
    /// Access to sibling inputs of the same form
    pub lookup: &'a dyn FieldLookup,
    pub config: &'a ValidatorConfig,
}

/// A named predicate over a field.
pub trait Rule: Send + Sync {
    /// Identifier used in rule chains and dictionaries
    fn name(&self) -> &str;

    /// `Ok(true)` when the field passes.
    ///
    /// `Err` reports missing configuration; the caller treats it as a failure.
    fn check(&self, ctx: &RuleContext<'_>) -> Result<bool, ConfigurationGap>;

    /// Values for the placeholders of this rule's template.
    fn message_args(&self, _ctx: &RuleContext<'_>) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

type PredicateFn = Arc<dyn Fn(&RuleContext<'_>) -> bool + Send + Sync>;

/// A rule backed by a closure.
#[derive(Clone)]
pub struct FnRule {
    name: String,
    predicate: PredicateFn,
}

impl FnRule {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("name", &self.name).finish()
    }
}

impl Rule for FnRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<bool, ConfigurationGap> {
        Ok((self.predicate)(ctx))
    }
}

/// A registered rule together with its template for one locale.
pub struct RuleEntry<'a> {
    pub rule: &'a dyn Rule,
    /// `None` when the locale has no template for this rule
    pub template: Option<&'a str>,
}

/// Maps rule names to predicates and locale templates.
///
/// Templates are read-only once registered; placeholder substitution
/// always renders into a new string.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
    dictionary: LocaleDictionary,
}

impl RuleRegistry {
    /// Registry without any rules.
    pub fn new(dictionary: LocaleDictionary) -> Self {
        Self {
            rules: HashMap::new(),
            dictionary,
        }
    }

    /// The seven canonical rules with the built-in dictionaries.
    pub fn builtin() -> Self {
        Self::with_dictionary(builtin_dictionary())
    }

    /// The canonical rules with a caller-provided dictionary.
    pub fn with_dictionary(dictionary: LocaleDictionary) -> Self {
        BuiltinRule::ALL
            .into_iter()
            .fold(Self::new(dictionary), |registry, rule| registry.register(rule))
    }

    /// Add a rule. A rule with the same name is replaced.
    pub fn register<R: Rule + 'static>(mut self, rule: R) -> Self {
        let name = rule.name().to_string();
        if self.rules.insert(name.clone(), Arc::new(rule)).is_some() {
            warn!("rule '{}' registered twice, keeping the latest", name);
        }
        self
    }

    /// Add a rule with its templates, given as `(locale, template)` pairs.
    pub fn register_with_templates<'t, R, I>(self, rule: R, templates: I) -> Self
    where
        R: Rule + 'static,
        I: IntoIterator<Item = (&'t str, &'t str)>,
    {
        let name = rule.name().to_string();
        let mut registry = self.register(rule);
        for (locale, template) in templates {
            registry.dictionary.insert(locale, name.as_str(), template);
        }
        registry
    }

    /// Merge additional templates into the dictionary.
    pub fn extend_dictionary(mut self, dictionary: LocaleDictionary) -> Self {
        self.dictionary.extend(dictionary);
        self
    }

    /// Resolve a rule name for a locale.
    ///
    /// `None` when no rule of that name is registered.
    pub fn lookup(&self, name: &str, locale: &str) -> Option<RuleEntry<'_>> {
        let rule = self.rules.get(name)?;
        Some(RuleEntry {
            rule: rule.as_ref(),
            template: self.dictionary.template(locale, name),
        })
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.dictionary.has_locale(locale)
    }

    /// Registered rule names, sorted.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn dictionary(&self) -> &LocaleDictionary {
        &self.dictionary
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_names())
            .field("locales", &self.dictionary.locales())
            .finish()
    }
}
