pub mod accumulator;
pub mod coerce;
pub mod defaults;
pub mod evaluate;
pub mod filter;
pub mod format;
pub mod rules;

use serde_json::Value;
use tracing::debug;

use crate::domain::error::ValidateError;
use crate::domain::options::ValidationOptions;
use crate::domain::report::Verdict;
use crate::domain::schema::Schema;

use self::evaluate::Evaluation;
use self::filter::{Filter, FilterRegistry};
use self::rules::{Rule, RuleRegistry};

/// Reusable validation entry point holding filters, rules and default options.
///
/// Registries are only read during a call, so a built validator can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    filters: FilterRegistry,
    rules: RuleRegistry,
    defaults: ValidationOptions,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    pub fn register_filter(&mut self, name: impl Into<String>, filter: impl Filter + 'static) {
        self.filters.register(name, filter);
    }

    pub fn register_rule(&mut self, rule: impl Rule + 'static) {
        self.rules.register(rule);
    }

    pub fn set_default_options(&mut self, options: ValidationOptions) {
        self.defaults = options;
    }

    pub fn default_options(&self) -> &ValidationOptions {
        &self.defaults
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Validates `document` with the default options.
    pub fn validate(
        &self,
        document: &mut Value,
        schema: &Schema,
    ) -> Result<Verdict, ValidateError> {
        self.validate_with(document, schema, &ValidationOptions::new())
    }

    /// Validates `document`; unset fields of `options` fall back to the
    /// validator defaults. The document may be rewritten by filters, casts
    /// and injected defaults.
    pub fn validate_with(
        &self,
        document: &mut Value,
        schema: &Schema,
        options: &ValidationOptions,
    ) -> Result<Verdict, ValidateError> {
        self.filters.ensure_known(schema)?;
        let settings = options.or(&self.defaults).resolve();
        let schema_name = schema.name.as_deref().unwrap_or("-");
        debug!(?settings, schema = schema_name, "validating document");
        let verdict =
            Evaluation::new(&self.filters, &self.rules, settings).run(document, schema)?;
        debug!(valid = verdict.valid, errors = verdict.errors.len(), "validation finished");
        Ok(verdict)
    }
}

/// Builder for a [`Validator`] with extra filters, rules or defaults.
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    validator: Validator,
}

impl ValidatorBuilder {
    pub fn filter(mut self, name: impl Into<String>, filter: impl Filter + 'static) -> Self {
        self.validator.register_filter(name, filter);
        self
    }

    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.validator.register_rule(rule);
        self
    }

    pub fn default_options(mut self, options: ValidationOptions) -> Self {
        self.validator.set_default_options(options);
        self
    }

    pub fn build(self) -> Validator {
        self.validator
    }
}

/// Validates with the builtin filters and rules.
pub fn validate(
    document: &mut Value,
    schema: &Schema,
    options: &ValidationOptions,
) -> Result<Verdict, ValidateError> {
    Validator::new().validate_with(document, schema, options)
}
