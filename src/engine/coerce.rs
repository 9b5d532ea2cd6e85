use serde_json::{Number, Value};

use crate::domain::types::{TypeSet, TypeTag};

const MAX_NUMERIC_STRING_LEN: usize = 512;
// Largest float magnitude that still converts losslessly into i64.
const I64_FLOAT_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Converts `value` towards the first tag of `tags` it can be cast to.
///
/// Returns `None` when the value already matches one of the tags or when no
/// conversion applies; the caller then checks the original value.
pub fn coerce(value: &Value, tags: &TypeSet) -> Option<Value> {
    if tags.matches(value) {
        return None;
    }
    tags.tags().iter().find_map(|tag| coerce_to(value, *tag))
}

/// Casts every element of `items` in place, best-effort. Returns how many
/// elements changed.
pub fn coerce_items_in_place(items: &mut [Value], tags: &TypeSet) -> usize {
    let mut converted = 0;
    for item in items.iter_mut() {
        if let Some(cast) = coerce(item, tags) {
            *item = cast;
            converted += 1;
        }
    }
    converted
}

fn coerce_to(value: &Value, tag: TypeTag) -> Option<Value> {
    match (tag, value) {
        (TypeTag::Number, Value::String(text)) => parse_number(text).map(Value::Number),
        (TypeTag::Integer, Value::String(text)) => {
            parse_number(text).and_then(|number| whole_number(&number)).map(Value::Number)
        }
        (TypeTag::Boolean, Value::String(text)) => match text.as_str() {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        (TypeTag::Boolean, Value::Number(number)) => match number.as_f64() {
            Some(flag) if flag == 1.0 => Some(Value::Bool(true)),
            Some(flag) if flag == 0.0 => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn parse_number(input: &str) -> Option<Number> {
    if let Ok(parsed) = input.parse::<i64>() {
        return Some(Number::from(parsed));
    }
    if let Ok(parsed) = input.parse::<u64>() {
        return Some(Number::from(parsed));
    }
    if !is_decimal_literal(input) {
        return None;
    }
    let parsed = input.parse::<f64>().ok()?;
    Number::from_f64(parsed)
}

fn whole_number(number: &Number) -> Option<Number> {
    if number.is_i64() || number.is_u64() {
        return Some(number.clone());
    }
    let float = number.as_f64()?;
    if float.fract() != 0.0 {
        return None;
    }
    if float.abs() < I64_FLOAT_LIMIT {
        return Some(Number::from(float as i64));
    }
    Number::from_f64(float)
}

// Accepts `-?digits(.digits)?([eE][+-]?digits)?` with at least one mantissa
// digit; rejects whitespace, `inf`, `nan` and anything `f64::from_str` would
// otherwise tolerate.
fn is_decimal_literal(input: &str) -> bool {
    if input.is_empty() || input.len() > MAX_NUMERIC_STRING_LEN {
        return false;
    }

    let bytes = input.as_bytes();
    let mut index = 0usize;
    if bytes.get(index) == Some(&b'-') {
        index += 1;
    }

    let mut has_digit = false;
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        has_digit = true;
        index += 1;
    }

    if bytes.get(index) == Some(&b'.') {
        index += 1;
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            has_digit = true;
            index += 1;
        }
    }

    if !has_digit {
        return false;
    }

    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exponent_start = index;
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
        }
        if exponent_start == index {
            return false;
        }
    }

    index == bytes.len()
}
