use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Number, Value, json};

use crate::domain::options::Settings;
use crate::domain::schema::Schema;
use crate::domain::types::json_type_name;
use crate::domain::value_path::ValuePath;

/// Operands of a failed check; the engine adds attribute, path and message.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub expected: Value,
    pub actual: Value,
}

impl Failure {
    pub fn new(expected: Value, actual: Value) -> Self {
        Self { expected, actual }
    }
}

/// What a rule may look at besides the value and its schema node.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Enclosing object as it stands before the property is evaluated; array
    /// items see the object holding the array. `None` at the root.
    pub parent: Option<&'a Value>,
    pub path: &'a ValuePath,
    pub settings: &'a Settings,
}

/// Constraint keyword checker.
pub trait Rule: Send + Sync {
    /// Attribute reported in violations and looked up in `messages`.
    fn name(&self) -> &str;

    /// Message template used when the schema declares none.
    fn message(&self) -> &str;

    fn check(&self, value: &Value, schema: &Schema, ctx: &RuleContext<'_>) -> Option<Failure>;
}

type CheckFn = fn(&Value, &Schema, &RuleContext<'_>) -> Option<Failure>;

struct Builtin {
    name: &'static str,
    check: CheckFn,
}

impl Rule for Builtin {
    fn name(&self) -> &str {
        self.name
    }

    fn message(&self) -> &str {
        default_message(self.name)
    }

    fn check(&self, value: &Value, schema: &Schema, ctx: &RuleContext<'_>) -> Option<Failure> {
        (self.check)(value, schema, ctx)
    }
}

/// Ordered rule set run at every node after the type check.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    custom: bool,
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            custom: false,
        }
    }

    pub fn with_builtins() -> Self {
        let builtins: [(&'static str, CheckFn); 15] = [
            ("enum", check_enum),
            ("allowEmpty", check_allow_empty),
            ("minLength", check_min_length),
            ("maxLength", check_max_length),
            ("pattern", check_pattern),
            ("format", check_format),
            ("minimum", check_minimum),
            ("maximum", check_maximum),
            ("exclusiveMinimum", check_exclusive_minimum),
            ("exclusiveMaximum", check_exclusive_maximum),
            ("divisibleBy", check_divisible_by),
            ("minItems", check_min_items),
            ("maxItems", check_max_items),
            ("uniqueItems", check_unique_items),
            ("conform", check_conform),
        ];
        Self {
            rules: builtins
                .into_iter()
                .map(|(name, check)| Arc::new(Builtin { name, check }) as Arc<dyn Rule>)
                .collect(),
            custom: false,
        }
    }

    /// Adds `rule`, replacing a rule of the same name in place.
    pub fn register(&mut self, rule: impl Rule + 'static) {
        let rule: Arc<dyn Rule> = Arc::new(rule);
        self.custom = true;
        match self
            .rules
            .iter_mut()
            .find(|existing| existing.name() == rule.name())
        {
            Some(slot) => *slot = rule,
            None => self.rules.push(rule),
        }
    }

    /// Whether any rule was registered beyond the built-ins.
    pub fn has_custom(&self) -> bool {
        self.custom
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Built-in message template for an attribute.
pub fn default_message(attribute: &str) -> &'static str {
    match attribute {
        "type" => "must be of %{expected} type",
        "required" => "is required",
        "dependencies" => "missing dependencies: %{actual}",
        "additionalProperties" => "must not exist",
        "enum" => "must be present in given enumerator",
        "allowEmpty" => "must not be empty",
        "minLength" => "is too short (minimum is %{expected} characters)",
        "maxLength" => "is too long (maximum is %{expected} characters)",
        "pattern" => "invalid input",
        "format" => "is not a valid %{expected}",
        "minimum" => "must be greater than or equal to %{expected}",
        "maximum" => "must be less than or equal to %{expected}",
        "exclusiveMinimum" => "must be greater than %{expected}",
        "exclusiveMaximum" => "must be less than %{expected}",
        "divisibleBy" => "must be divisible by %{expected}",
        "minItems" => "must contain at least %{expected} items",
        "maxItems" => "must contain at most %{expected} items",
        "uniqueItems" => "must hold a unique set of values",
        "conform" => "must conform to given constraint",
        _ => "is invalid",
    }
}

fn check_enum(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    let members = schema.enumeration.as_ref()?;
    if members.iter().any(|member| values_equal(member, value)) {
        return None;
    }
    Some(Failure::new(Value::Array(members.clone()), value.clone()))
}

fn check_allow_empty(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    if schema.allow_empty != Some(false) {
        return None;
    }
    match value.as_str() {
        Some("") => Some(Failure::new(json!("non-empty"), value.clone())),
        _ => None,
    }
}

fn check_min_length(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    let min = schema.min_length?;
    let length = value.as_str()?.chars().count();
    (length < min).then(|| Failure::new(json!(min), json!(length)))
}

fn check_max_length(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    let max = schema.max_length?;
    let length = value.as_str()?.chars().count();
    (length > max).then(|| Failure::new(json!(max), json!(length)))
}

fn check_pattern(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    let pattern = schema.pattern.as_ref()?;
    let expected = Value::String(pattern.as_str().to_string());
    match value.as_str() {
        Some(text) if pattern.is_match(text) => None,
        Some(_) => Some(Failure::new(expected, value.clone())),
        None => Some(Failure::new(expected, json!(json_type_name(value)))),
    }
}

fn check_format(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    let format = schema.format?;
    (!format.check(value)).then(|| Failure::new(json!(format.as_str()), value.clone()))
}

fn check_minimum(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    bound_failure(value, schema.minimum.as_ref()?, |ordering| {
        ordering == Ordering::Less
    })
}

fn check_maximum(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    bound_failure(value, schema.maximum.as_ref()?, |ordering| {
        ordering == Ordering::Greater
    })
}

fn check_exclusive_minimum(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    bound_failure(value, schema.exclusive_minimum.as_ref()?, |ordering| {
        ordering != Ordering::Greater
    })
}

fn check_exclusive_maximum(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    bound_failure(value, schema.exclusive_maximum.as_ref()?, |ordering| {
        ordering != Ordering::Less
    })
}

fn bound_failure(
    value: &Value,
    bound: &Number,
    violates: impl Fn(Ordering) -> bool,
) -> Option<Failure> {
    let number = value.as_number()?;
    violates(compare_numbers(number, bound))
        .then(|| Failure::new(Value::Number(bound.clone()), value.clone()))
}

fn check_divisible_by(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    let divisor = schema.divisible_by.as_ref()?;
    let number = value.as_number()?;
    (!is_divisible(number, divisor))
        .then(|| Failure::new(Value::Number(divisor.clone()), value.clone()))
}

fn check_min_items(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    let min = schema.min_items?;
    let length = value.as_array()?.len();
    (length < min).then(|| Failure::new(json!(min), json!(length)))
}

fn check_max_items(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    let max = schema.max_items?;
    let length = value.as_array()?.len();
    (length > max).then(|| Failure::new(json!(max), json!(length)))
}

fn check_unique_items(value: &Value, schema: &Schema, _: &RuleContext<'_>) -> Option<Failure> {
    if !schema.unique_items {
        return None;
    }
    let items = value.as_array()?;
    for (index, item) in items.iter().enumerate() {
        if items[index + 1..].iter().any(|other| values_equal(item, other)) {
            return Some(Failure::new(json!("unique items"), item.clone()));
        }
    }
    None
}

fn check_conform(value: &Value, schema: &Schema, ctx: &RuleContext<'_>) -> Option<Failure> {
    let predicate = schema.conform.as_ref()?;
    let enclosing = ctx.parent.unwrap_or(value);
    (!predicate(value, enclosing)).then(|| Failure::new(json!("conforming value"), value.clone()))
}

/// Deep equality where numbers compare by value (`1 == 1.0`).
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            compare_numbers(left, right) == Ordering::Equal
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(left, right)| values_equal(left, right))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left.iter().all(|(key, left)| {
                    right
                        .get(key)
                        .is_some_and(|right| values_equal(left, right))
                })
        }
        _ => left == right,
    }
}

/// Total order over JSON numbers, exact for the integer ranges.
pub fn compare_numbers(left: &Number, right: &Number) -> Ordering {
    if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
        return left.cmp(&right);
    }

    if let (Some(left), Some(right)) = (left.as_u64(), right.as_u64()) {
        return left.cmp(&right);
    }

    if let (Some(left), Some(right)) = (left.as_i64(), right.as_u64()) {
        return if left.is_negative() {
            Ordering::Less
        } else {
            left.unsigned_abs().cmp(&right)
        };
    }

    if let (Some(left), Some(right)) = (left.as_u64(), right.as_i64()) {
        return if right.is_negative() {
            Ordering::Greater
        } else {
            left.cmp(&right.unsigned_abs())
        };
    }

    left.as_f64()
        .zip(right.as_f64())
        .and_then(|(left, right)| left.partial_cmp(&right))
        .unwrap_or(Ordering::Equal)
}

// Works on the shortest decimal rendering so `0.2 % 0.01` is exactly zero.
fn is_divisible(value: &Number, divisor: &Number) -> bool {
    if let (Some(value), Some(divisor)) = (to_decimal(value), to_decimal(divisor)) {
        return match value.checked_rem(divisor) {
            Some(remainder) => remainder.is_zero(),
            None => true,
        };
    }
    match (value.as_f64(), divisor.as_f64()) {
        (Some(value), Some(divisor)) if divisor != 0.0 => (value / divisor).fract() == 0.0,
        _ => true,
    }
}

fn to_decimal(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
