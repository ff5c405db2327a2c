use std::{cmp::Ordering, collections::HashMap};

use rust_decimal::{Decimal, prelude::FromPrimitive};

/// A record value that filters are matched against.
///
/// This type represents all JSON types with a distinction between
/// integers and floats (unlike standard JSON which only has "number").
/// Comparisons made by the matcher are numeric across the two, so
/// `Integer(1)` and `Float(1.0)` compare equal there even though the
/// derived `PartialEq` keeps them apart.
///
/// # Examples
///
/// ```
/// use spleen::Value;
/// use std::collections::HashMap;
///
/// let mut obj = HashMap::new();
/// obj.insert("key".to_string(), Value::String("value".to_string()));
/// let object = Value::Object(obj);
///
/// assert!(Value::Integer(1).loose_eq(&Value::Float(1.0)));
/// assert_ne!(object, Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null, written `nil` in filter text
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Array of values (homogeneous or heterogeneous)
    Array(Vec<Value>),

    /// Object with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    /// Human-readable type name, used in error messages and docs output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Deep equality where integers and floats compare by numeric value.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_number() && b.is_number() => {
                a.compare(b) == Some(Ordering::Equal)
            }
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.loose_eq(w)))
            }
            (a, b) => a == b,
        }
    }

    /// Ordering between two values of a comparable kind.
    ///
    /// Numbers order numerically (mixed integer/float pairs go through
    /// `Decimal` so large integers keep their precision), strings order
    /// lexicographically. Every other pairing is unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => compare_mixed(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_mixed(*b, *a).map(Ordering::reverse),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

fn compare_mixed(int: i64, float: f64) -> Option<Ordering> {
    if let Some(a) = Decimal::from_i64(int)
        && let Some(b) = Decimal::from_f64(float)
    {
        return Some(a.cmp(&b));
    }
    (int as f64).partial_cmp(&float)
}

/// Parse the text of a numeric literal.
///
/// Accepts decimal integers and floats (optional sign, fraction, exponent),
/// `0x`/`0o`/`0b` radix integers and `Infinity`. Returns `None` when the text
/// is not entirely a number.
///
/// ```
/// use spleen::value::{parse_number, Value};
///
/// assert_eq!(parse_number("42"), Some(Value::Integer(42)));
/// assert_eq!(parse_number("0x1F"), Some(Value::Integer(31)));
/// assert_eq!(parse_number("2.5"), Some(Value::Float(2.5)));
/// assert_eq!(parse_number("42abc"), None);
/// ```
pub fn parse_number(text: &str) -> Option<Value> {
    if let Some(radix) = radix_prefix(text) {
        let body = &text[2..];
        if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return i64::from_str_radix(body, radix).ok().map(Value::Integer);
    }

    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    if unsigned == "Infinity" {
        let inf = if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(Value::Float(inf));
    }

    if !unsigned.bytes().any(|b| b.is_ascii_digit())
        || !unsigned
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }

    if unsigned.bytes().all(|b| b.is_ascii_digit())
        && let Ok(n) = text.parse::<i64>()
    {
        return Some(Value::Integer(n));
    }

    text.parse::<f64>().ok().filter(|n| n.is_finite()).map(Value::Float)
}

fn radix_prefix(text: &str) -> Option<u32> {
    let prefix = text.get(..2)?;
    match prefix.to_ascii_lowercase().as_str() {
        "0x" => Some(16),
        "0o" => Some(8),
        "0b" => Some(2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_variants() {
        assert_eq!(parse_number("-17"), Some(Value::Integer(-17)));
        assert_eq!(parse_number("0b101"), Some(Value::Integer(5)));
        assert_eq!(parse_number("0o17"), Some(Value::Integer(15)));
        assert_eq!(parse_number("1e3"), Some(Value::Float(1000.0)));
        assert_eq!(parse_number(".5"), Some(Value::Float(0.5)));
        assert_eq!(parse_number("-Infinity"), Some(Value::Float(f64::NEG_INFINITY)));
    }

    #[test]
    fn test_not_numbers() {
        for text in ["", "-", "0x", "0xZZ", "nan", "inf", "1e", "abc", "1.2.3", "e5"] {
            assert_eq!(parse_number(text), None, "Failed for input: {}", text);
        }
    }

    #[test]
    fn test_mixed_comparison() {
        assert_eq!(
            Value::Integer(2).compare(&Value::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Float(3.0).compare(&Value::Integer(3)),
            Some(Ordering::Equal)
        );
        assert_eq!(Value::String("a".into()).compare(&Value::Integer(1)), None);
    }
}
