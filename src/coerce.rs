//! # Permissive Coercion
//!
//! Request data arrives as strings (query, form, path) or loosely typed JSON.
//! Bound arguments are coerced to their declared [`ScalarType`] with loose,
//! total semantics: coercion never fails, malformed input collapses to a
//! zero-like value instead.
//!
//! | input            | integer | float | boolean | string      |
//! |------------------|---------|-------|---------|-------------|
//! | `"42"`           | 42      | 42.0  | true    | `"42"`      |
//! | `"12abc"`        | 12      | 12.0  | true    | `"12abc"`   |
//! | `"abc"`          | 0       | 0.0   | true    | `"abc"`     |
//! | `""` / `"0"`     | 0       | 0.0   | false   | unchanged   |
//! | `"false"`        | 0       | 0.0   | true    | `"false"`   |
//! | `true`           | 1       | 1.0   | true    | `"1"`       |
//! | `null`           | 0       | 0.0   | false   | `""`        |
//! | `{}` / `[]`      | 0       | 0.0   | false   | JSON text   |
//! | non-empty object | 1       | 1.0   | true    | JSON text   |
//!
//! Whether malformed numbers should instead reject the request is a product
//! decision; this module keeps the permissive behavior.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::meta::ScalarType;

/// A coerced argument value, ready to hand to a handler
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    /// Array-typed parameters keep the nested JSON structure
    Array(Value),
}

impl ArgValue {
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Value> {
        match self {
            ArgValue::Array(v) => Some(v),
            _ => None,
        }
    }

    /// The target type this value was coerced to
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ArgValue::Int(_) => ScalarType::Integer,
            ArgValue::Float(_) => ScalarType::Float,
            ArgValue::Bool(_) => ScalarType::Boolean,
            ArgValue::Str(_) => ScalarType::String,
            ArgValue::Array(_) => ScalarType::Array,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Int(v) => write!(f, "{v}"),
            ArgValue::Float(v) => write!(f, "{v}"),
            ArgValue::Bool(v) => write!(f, "{v}"),
            ArgValue::Str(v) => f.write_str(v),
            ArgValue::Array(v) => write!(f, "{v}"),
        }
    }
}

impl From<ArgValue> for Value {
    fn from(arg: ArgValue) -> Self {
        match arg {
            ArgValue::Int(v) => Value::from(v),
            ArgValue::Float(v) => Value::from(v),
            ArgValue::Bool(v) => Value::Bool(v),
            ArgValue::Str(v) => Value::String(v),
            ArgValue::Array(v) => v,
        }
    }
}

/// Coerce a resolved source value to the declared target type.
#[must_use]
pub fn coerce(value: &Value, ty: ScalarType) -> ArgValue {
    match ty {
        ScalarType::Integer => ArgValue::Int(to_int(value)),
        ScalarType::Float => ArgValue::Float(to_float(value)),
        ScalarType::Boolean => ArgValue::Bool(to_bool(value)),
        ScalarType::String => ArgValue::Str(to_string(value)),
        ScalarType::Array => ArgValue::Array(to_array(value)),
    }
}

fn container_truthiness(value: &Value) -> bool {
    match value {
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => false,
    }
}

/// Float to integer truncation. Finite values saturate at the i64 bounds,
/// NaN and infinities become 0.
fn float_to_int(f: f64) -> i64 {
    if !f.is_finite() {
        return 0;
    }
    f.trunc() as i64
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .unwrap_or_else(|| float_to_int(n.as_f64().unwrap_or(0.0))),
        Value::String(s) => string_to_int(s),
        Value::Array(_) | Value::Object(_) => i64::from(container_truthiness(value)),
    }
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => numeric_prefix(s).map_or(0.0, |p| p.as_float()),
        Value::Array(_) | Value::Object(_) => f64::from(u8::from(container_truthiness(value))),
    }
}

fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(_) | Value::Object(_) => container_truthiness(value),
    }
}

fn to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => match n.as_f64() {
            // integral floats print without a fraction (`1.0` → `"1"`)
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn to_array(value: &Value) -> Value {
    match value {
        Value::Null => Value::Array(Vec::new()),
        Value::Array(_) | Value::Object(_) => value.clone(),
        scalar => Value::Array(vec![scalar.clone()]),
    }
}

/// Leading numeric portion of a string
#[derive(Debug, Clone, Copy, PartialEq)]
enum NumericPrefix {
    Int(i64),
    Float(f64),
}

impl NumericPrefix {
    fn as_float(self) -> f64 {
        match self {
            NumericPrefix::Int(i) => i as f64,
            NumericPrefix::Float(f) => f,
        }
    }
}

fn string_to_int(s: &str) -> i64 {
    match numeric_prefix(s) {
        Some(NumericPrefix::Int(i)) => i,
        Some(NumericPrefix::Float(f)) => float_to_int(f),
        None => 0,
    }
}

/// Parse the longest numeric prefix of `s` after leading whitespace.
///
/// Accepts an optional sign, digits, an optional fraction and an optional
/// exponent (only when followed by digits). Returns `None` when no digit is
/// found. Integer prefixes that overflow `i64` fall back to a float.
fn numeric_prefix(s: &str) -> Option<NumericPrefix> {
    let s = s.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    let mut is_float = false;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
            is_float = true;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
            is_float = true;
        }
    }

    let text = &s[..end];
    if !is_float {
        if let Ok(i) = text.parse::<i64>() {
            return Some(NumericPrefix::Int(i));
        }
    }
    text.parse::<f64>().ok().map(NumericPrefix::Float)
}
