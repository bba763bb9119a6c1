//! Closed value model for query result rows.
//!
//! Query responses arrive as arbitrary JSON. They are converted exactly once,
//! at the boundary, into [`Value`] and [`Row`]; everything downstream matches
//! on the closed enum instead of probing JSON shapes.
//!
//! A key that is absent from a row is not the same as a key holding
//! [`Value::Null`]. Lookups return `Option<&Value>` and callers treat `None`
//! as "missing".

use std::{cmp::Ordering, fmt};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Insertion-ordered mapping from field name to value.
pub type Row = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<Value>),
    Record(Row),
}

impl Value {
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Text(_)
        )
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Non-empty array whose first element is a record.
    pub fn is_record_array(&self) -> bool {
        matches!(self, Value::Array(items) if items.first().is_some_and(Value::is_record))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            Value::Array(_) | Value::Record(_) => true,
        }
    }

    /// Plain text rendering with no semantic formatting applied.
    pub fn as_display(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_text(*n),
            Value::Text(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    other => other.as_display(),
                })
                .join(","),
            Value::Record(_) => "[object Object]".to_string(),
        }
    }

    /// Comma-joined summary used when an array of scalars is folded into a
    /// single cell.
    pub fn summary_text(items: &[Value]) -> String {
        items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => other.as_display(),
            })
            .join(", ")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9.0e15 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::Text(s) => serializer.serialize_str(s),
            Value::Array(items) => items.serialize(serializer),
            Value::Record(row) => {
                let mut map = serializer.serialize_map(Some(row.len()))?;
                for (key, value) in row {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

/// Converts a JSON object into a row; any other JSON shape yields `None`.
pub fn row_from_json(value: serde_json::Value) -> Option<Row> {
    match Value::from(value) {
        Value::Record(row) => Some(row),
        _ => None,
    }
}

/// Renders a number the way a browser would print it: integral values carry
/// no fraction and negative zero prints as `0`.
pub fn number_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Hashable identity of a cell, used for distinct-value counting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistinctKey<'a> {
    Missing,
    Null,
    Bool(bool),
    Number(u64),
    Text(&'a str),
    Composite(String),
}

impl<'a> DistinctKey<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None => DistinctKey::Missing,
            Some(Value::Null) => DistinctKey::Null,
            Some(Value::Bool(b)) => DistinctKey::Bool(*b),
            Some(Value::Number(n)) => {
                let canonical = if *n == 0.0 {
                    0.0f64
                } else if n.is_nan() {
                    f64::NAN
                } else {
                    *n
                };
                DistinctKey::Number(canonical.to_bits())
            }
            Some(Value::Text(s)) => DistinctKey::Text(s),
            Some(other) => {
                DistinctKey::Composite(serde_json::to_string(other).unwrap_or_default())
            }
        }
    }
}

/// Text rendering of a possibly-missing cell for ordering purposes.
pub fn ordering_text(value: Option<&Value>) -> String {
    value
        .map(Value::as_display)
        .unwrap_or_else(|| "undefined".to_string())
}

/// Letters of `text` with accents stripped and case folded.
fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Locale-style text ordering: base letters first (accents and case
/// ignored), then unaccented before accented, then lowercase before
/// uppercase, then length.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    base_letters(left)
        .cmp(base_letters(right))
        .then_with(|| {
            left.chars()
                .flat_map(char::to_lowercase)
                .cmp(right.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| {
            left.chars()
                .zip(right.chars())
                .find(|(l, r)| l != r)
                .map(|(l, r)| match (l.is_lowercase(), r.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => l.cmp(&r),
                })
                .unwrap_or_else(|| left.len().cmp(&right.len()))
        })
}

/// Natural ordering of two cells: numeric when both are numbers, otherwise
/// locale-aware comparison of their text.
pub fn compare_natural(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        _ => locale_compare(&ordering_text(left), &ordering_text(right)),
    }
}
