use serde_json::{Value, json};
use tracing::{trace, warn};

use super::accumulator::ErrorAccumulator;
use super::coerce::{coerce, coerce_items_in_place};
use super::defaults::{apply_default, default_to_validate};
use super::filter::{FilterRegistry, apply_filters};
use super::rules::{Failure, RuleContext, RuleRegistry, default_message};
use crate::domain::error::ValidateError;
use crate::domain::options::Settings;
use crate::domain::report::{Verdict, Violation, render_message};
use crate::domain::schema::{AdditionalProperties, Dependencies, FilterSpec, Schema};
use crate::domain::types::json_type_name;
use crate::domain::value_path::ValuePath;

/// One walk of a document against a schema.
///
/// Per node the order is: filters, cast, type, constraint rules, then
/// array items or object properties. A scalar node that records violations
/// keeps its pre-filter value; filtered arrays and objects keep the filter
/// output so changes made below them survive. A cast without `castSource`
/// never reaches the document.
pub(crate) struct Evaluation<'v> {
    filters: &'v FilterRegistry,
    rules: &'v RuleRegistry,
    settings: Settings,
    errors: ErrorAccumulator,
    /// Set while a dependency schema is folded into its owner's object.
    in_dependency: bool,
}

impl<'v> Evaluation<'v> {
    pub(crate) fn new(
        filters: &'v FilterRegistry,
        rules: &'v RuleRegistry,
        settings: Settings,
    ) -> Self {
        Self {
            filters,
            rules,
            settings,
            errors: ErrorAccumulator::new(settings.fail_on_first_error),
            in_dependency: false,
        }
    }

    pub(crate) fn run(
        mut self,
        document: &mut Value,
        schema: &Schema,
    ) -> Result<Verdict, ValidateError> {
        self.evaluate_node(document, schema, &ValuePath::root(), None)?;
        Ok(self.errors.into_verdict())
    }

    fn evaluate_node(
        &mut self,
        value: &mut Value,
        schema: &Schema,
        path: &ValuePath,
        parent: Option<&Value>,
    ) -> Result<(), ValidateError> {
        let mark = self.errors.mark();
        let unfiltered = if schema.filters.is_empty() {
            None
        } else {
            let snapshot = (!value.is_array() && !value.is_object()).then(|| value.clone());
            if let Some(failure) = apply_filters(self.filters, &schema.filters, value)? {
                let failure_message = failure.message();
                warn!(property = %path, reason = %failure_message, "filter chain stopped");
                return self.report(
                    "filter",
                    schema,
                    path,
                    Failure::new(chain_names(&schema.filters), json!(failure.actual())),
                    &failure_message,
                );
            }
            snapshot
        };

        let uncast = self.cast(value, schema);
        let outcome = self.check_node(value, schema, path, parent);
        if let Some(original) = uncast {
            *value = original;
        }
        if let Some(original) = unfiltered.filter(|_| self.errors.recorded_since(mark)) {
            *value = original;
        }
        outcome
    }

    /// Converts `value` toward the declared types. Returns the value to put
    /// back once the node is checked, when the source must stay untouched.
    fn cast(&self, value: &mut Value, schema: &Schema) -> Option<Value> {
        if !self.settings.cast {
            return None;
        }
        let mut original = None;
        if let Some(converted) = schema.types.as_ref().and_then(|types| coerce(value, types)) {
            let previous = std::mem::replace(value, converted);
            if !self.settings.cast_source {
                original = Some(previous);
            }
        }
        if self.settings.cast_source {
            let item_types = schema.items.as_deref().and_then(|items| items.types.as_ref());
            if let (Value::Array(items), Some(item_types)) = (&mut *value, item_types) {
                let converted = coerce_items_in_place(items, item_types);
                trace!(converted, "cast array items");
            }
        }
        original
    }

    fn check_node(
        &mut self,
        value: &mut Value,
        schema: &Schema,
        path: &ValuePath,
        parent: Option<&Value>,
    ) -> Result<(), ValidateError> {
        // Taken before the node's own rules: with `exitOnFirstError` a failed
        // `minItems` or `type` also skips the items and properties below.
        let mark = self.errors.mark();
        if let Some(types) = schema.types.as_ref().filter(|types| !types.matches(value)) {
            return self.report(
                "type",
                schema,
                path,
                Failure::new(types.expected(), json!(json_type_name(value))),
                default_message("type"),
            );
        }

        let rules = self.rules;
        let settings = self.settings;
        let ctx = RuleContext {
            parent,
            path,
            settings: &settings,
        };
        for rule in rules.iter() {
            if let Some(failure) = rule.check(value, schema, &ctx) {
                self.report(rule.name(), schema, path, failure, rule.message())?;
            }
        }

        if let (Value::Array(items), Some(item_schema)) = (&mut *value, schema.items.as_deref()) {
            return self.evaluate_items(items, item_schema, path, parent, mark);
        }
        if value.is_object() && schema.has_object_rules() {
            self.evaluate_object(value, schema, path, mark)?;
        }
        Ok(())
    }

    fn evaluate_items(
        &mut self,
        items: &mut [Value],
        schema: &Schema,
        path: &ValuePath,
        parent: Option<&Value>,
        mark: usize,
    ) -> Result<(), ValidateError> {
        for (index, item) in items.iter_mut().enumerate() {
            if self.should_exit(mark) {
                break;
            }
            self.evaluate_node(item, schema, &path.index(index), parent)?;
        }
        Ok(())
    }

    fn evaluate_object(
        &mut self,
        object: &mut Value,
        schema: &Schema,
        path: &ValuePath,
        mark: usize,
    ) -> Result<(), ValidateError> {
        if let Some(properties) = &schema.properties {
            for (name, property) in properties {
                if self.should_exit(mark) {
                    return Ok(());
                }
                self.evaluate_property(object, name, property, path)?;
            }
        }

        let undeclared: Vec<String> = object
            .as_object()
            .map(|map| {
                map.keys()
                    .filter(|key| schema.property(key).is_none())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        for name in undeclared {
            let mut matched = false;
            for entry in &schema.pattern_properties {
                if !entry.pattern.is_match(&name) {
                    continue;
                }
                matched = true;
                if self.should_exit(mark) {
                    return Ok(());
                }
                self.evaluate_property(object, &name, &entry.schema, path)?;
            }
            if matched {
                continue;
            }
            if self.should_exit(mark) {
                return Ok(());
            }
            match &schema.additional_properties {
                Some(AdditionalProperties::Schema(extra)) => {
                    self.evaluate_property(object, &name, extra, path)?;
                }
                Some(AdditionalProperties::Allowed(false)) => {
                    self.reject_additional(schema, &name, path)?;
                }
                None if !self.settings.additional_properties && !self.in_dependency => {
                    self.reject_additional(schema, &name, path)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn evaluate_property(
        &mut self,
        object: &mut Value,
        name: &str,
        schema: &Schema,
        object_path: &ValuePath,
    ) -> Result<(), ValidateError> {
        let path = object_path.key(name);
        trace!(property = %path, "evaluating property");

        let Some(map) = object.as_object_mut() else {
            return Ok(());
        };
        if apply_default(schema, map, name, &self.settings) {
            trace!(property = %path, "injected default");
        }
        if !map.contains_key(name) {
            return self.evaluate_absent(object, schema, &path);
        }

        self.check_dependencies(object, schema, &path, object_path)?;

        // The child is moved out while it is evaluated; readers of the parent
        // get a copy taken before the move.
        let enclosing = self.reads_parent(schema).then(|| object.clone());
        let mut child = object.get_mut(name).map(std::mem::take).unwrap_or_default();
        let parent = enclosing.as_ref().unwrap_or(&*object);
        let outcome = self.evaluate_node(&mut child, schema, &path, Some(parent));
        if let Some(slot) = object.get_mut(name) {
            *slot = child;
        }
        outcome
    }

    /// Whether anything run for `schema` looks at the enclosing object. Array
    /// items share their array's parent, so nested `items` count too.
    fn reads_parent(&self, schema: &Schema) -> bool {
        self.rules.has_custom()
            || std::iter::successors(Some(schema), |node| node.items.as_deref())
                .any(|node| node.conform.is_some())
    }

    fn evaluate_absent(
        &mut self,
        object: &Value,
        schema: &Schema,
        path: &ValuePath,
    ) -> Result<(), ValidateError> {
        let waived = schema
            .optional_when
            .as_ref()
            .is_some_and(|condition| condition(object));
        if schema.required && !waived {
            return self.report(
                "required",
                schema,
                path,
                Failure::new(json!(true), Value::Null),
                default_message("required"),
            );
        }
        if let Some(mut default) = default_to_validate(schema, &self.settings) {
            return self.evaluate_node(&mut default, schema, path, Some(object));
        }
        Ok(())
    }

    fn check_dependencies(
        &mut self,
        object: &mut Value,
        schema: &Schema,
        path: &ValuePath,
        object_path: &ValuePath,
    ) -> Result<(), ValidateError> {
        match &schema.dependencies {
            None => Ok(()),
            Some(Dependencies::Names(names)) => {
                let missing: Vec<&String> = names
                    .iter()
                    .filter(|name| object.get(name.as_str()).is_none())
                    .collect();
                if missing.is_empty() {
                    return Ok(());
                }
                self.report(
                    "dependencies",
                    schema,
                    path,
                    Failure::new(json!(names), json!(missing)),
                    default_message("dependencies"),
                )
            }
            Some(Dependencies::Schema(dependency)) => {
                let nested = std::mem::replace(&mut self.in_dependency, true);
                let outcome = self.evaluate_node(object, dependency, object_path, None);
                self.in_dependency = nested;
                outcome
            }
        }
    }

    fn reject_additional(
        &mut self,
        schema: &Schema,
        name: &str,
        object_path: &ValuePath,
    ) -> Result<(), ValidateError> {
        self.report(
            "additionalProperties",
            schema,
            &object_path.key(name),
            Failure::new(json!(false), json!(name)),
            default_message("additionalProperties"),
        )
    }

    fn should_exit(&self, mark: usize) -> bool {
        self.settings.exit_on_first_error && self.errors.recorded_since(mark)
    }

    fn report(
        &mut self,
        attribute: &str,
        schema: &Schema,
        path: &ValuePath,
        failure: Failure,
        template: &str,
    ) -> Result<(), ValidateError> {
        let template = schema.custom_message(attribute).unwrap_or(template);
        let message = render_message(template, &failure.expected, &failure.actual);
        trace!(attribute, property = %path, "violation");
        self.errors.push(Violation {
            attribute: attribute.to_string(),
            property: path.to_property(),
            expected: failure.expected,
            actual: failure.actual,
            message,
        })
    }
}

fn chain_names(chain: &[FilterSpec]) -> Value {
    chain
        .iter()
        .map(|spec| match spec {
            FilterSpec::Named(name) => name.clone(),
            FilterSpec::Inline(_) => "inline".to_string(),
        })
        .collect()
}
