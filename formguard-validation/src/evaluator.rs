// Rule evaluation

use crate::{
    ConfigurationGap, FieldDescriptor, FieldLookup, FieldRuleFailure, FieldRuleFailures,
    FormModel, RuleContext, RuleRegistry, ValidatorConfig,
};
use formguard_i18n::render;
use formguard_log::{debug, error};
use serde::Serialize;

/// Result of running a field's rule chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub field: String,
    pub valid: bool,
    /// Position of the first failing rule
    pub failed_rule_index: Option<usize>,
    /// Name of the first failing rule
    pub failed_rule: Option<String>,
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn passed(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            valid: true,
            failed_rule_index: None,
            failed_rule: None,
            message: None,
        }
    }

    pub fn failed(
        field: impl Into<String>,
        rule: impl Into<String>,
        position: usize,
        message: Option<String>,
    ) -> Self {
        Self {
            field: field.into(),
            valid: false,
            failed_rule_index: Some(position),
            failed_rule: Some(rule.into()),
            message,
        }
    }

    /// The failure as an error value, `None` for a valid field.
    pub fn failure(&self) -> Option<FieldRuleFailure> {
        if self.valid {
            return None;
        }
        Some(FieldRuleFailure {
            field: self.field.clone(),
            rule: self.failed_rule.clone().unwrap_or_default(),
            position: self.failed_rule_index.unwrap_or_default(),
            message: self.message.clone(),
        })
    }
}

/// An outcome plus the configuration gaps hit while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEvaluation {
    pub outcome: ValidationOutcome,
    pub gaps: Vec<ConfigurationGap>,
}

/// Outcomes of one full validation pass, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub outcomes: Vec<ValidationOutcome>,
    pub gaps: Vec<ConfigurationGap>,
}

impl ValidationReport {
    /// True iff every field passed.
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.valid)
    }

    pub fn outcome(&self, field: &str) -> Option<&ValidationOutcome> {
        self.outcomes.iter().find(|o| o.field == field)
    }

    pub fn failures(&self) -> FieldRuleFailures {
        self.outcomes
            .iter()
            .filter_map(ValidationOutcome::failure)
            .collect::<Vec<_>>()
            .into()
    }

    /// `Err` with the first configuration gap of the pass.
    pub fn ensure_configured(&self) -> Result<(), ConfigurationGap> {
        match self.gaps.first() {
            Some(gap) => Err(gap.clone()),
            None => Ok(()),
        }
    }
}

/// Runs rules against fields for one locale.
///
/// Evaluation has no side effects; presenting outcomes is up to the caller.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    registry: &'a RuleRegistry,
    config: &'a ValidatorConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a RuleRegistry, config: &'a ValidatorConfig) -> Self {
        Self { registry, config }
    }

    pub fn locale(&self) -> &str {
        &self.config.locale
    }

    /// Run the rule at `position` of the field's chain.
    pub fn evaluate(
        &self,
        field: &FieldDescriptor,
        rule_name: &str,
        position: usize,
        lookup: &dyn FieldLookup,
    ) -> FieldEvaluation {
        let value = field.normalized_value();
        let ctx = RuleContext {
            field,
            value: &value,
            lookup,
            config: self.config,
        };
        let mut gaps = Vec::new();

        let Some(entry) = self.registry.lookup(rule_name, self.locale()) else {
            gaps.push(ConfigurationGap::UnknownRule {
                field: field.id.clone(),
                rule: rule_name.to_string(),
            });
            let message = field.custom_message(position).map(str::to_string);
            return FieldEvaluation {
                outcome: ValidationOutcome::failed(&field.id, rule_name, position, message),
                gaps,
            };
        };

        let passed = entry.rule.check(&ctx).unwrap_or_else(|gap| {
            gaps.push(gap);
            false
        });
        if passed {
            return FieldEvaluation {
                outcome: ValidationOutcome::passed(&field.id),
                gaps,
            };
        }

        let message = match field.custom_message(position) {
            Some(custom) => Some(custom.to_string()),
            None => {
                if field.messages.is_some() {
                    debug!(
                        "field '{}' has no custom message at position {}, using the template",
                        field.id, position
                    );
                }
                match entry.template {
                    Some(template) => {
                        let args = entry.rule.message_args(&ctx);
                        let args: Vec<(&str, &str)> =
                            args.iter().map(|(k, v)| (*k, v.as_str())).collect();
                        Some(render(template, &args))
                    }
                    None => {
                        gaps.push(ConfigurationGap::MissingTemplate {
                            rule: rule_name.to_string(),
                            locale: self.locale().to_string(),
                        });
                        None
                    }
                }
            }
        };

        FieldEvaluation {
            outcome: ValidationOutcome::failed(&field.id, rule_name, position, message),
            gaps,
        }
    }

    /// Run a field's chain in order, stopping at the first failure.
    pub fn evaluate_field(&self, field: &FieldDescriptor, lookup: &dyn FieldLookup) -> FieldEvaluation {
        let mut gaps = Vec::new();

        for (position, rule) in field.rules.iter().enumerate() {
            let evaluation = self.evaluate(field, rule, position, lookup);
            gaps.extend(evaluation.gaps);

            if !evaluation.outcome.valid {
                return FieldEvaluation {
                    outcome: evaluation.outcome,
                    gaps,
                };
            }
        }

        FieldEvaluation {
            outcome: ValidationOutcome::passed(&field.id),
            gaps,
        }
    }

    /// Validate every element of the form.
    ///
    /// Descriptors are read fresh from the elements, and every field is
    /// evaluated even after an earlier one fails.
    ///
    /// With `strict_configuration` set, a pass that hits a configuration gap
    /// panics in debug builds. Otherwise gaps are logged and reported, see
    /// [`ValidationReport::ensure_configured`].
    pub fn validate_form(&self, form: &FormModel) -> ValidationReport {
        let mut report = ValidationReport::default();

        for element in form.elements() {
            let field = FieldDescriptor::extract(element);
            let evaluation = self.evaluate_field(&field, form);

            if let Some(rule) = &evaluation.outcome.failed_rule {
                debug!("field '{}' failed rule '{}'", field.id, rule);
            }
            for gap in &evaluation.gaps {
                error!("configuration gap in form '{}': {}", form.id(), gap);
            }

            report.outcomes.push(evaluation.outcome);
            report.gaps.extend(evaluation.gaps);
        }

        debug!(
            "form '{}' validated: {} field(s), valid={}",
            form.id(),
            report.outcomes.len(),
            report.is_valid()
        );
        debug_assert!(
            !self.config.strict_configuration || report.gaps.is_empty(),
            "form '{}' has configuration gaps: {:?}",
            form.id(),
            report.gaps
        );
        report
    }
}
