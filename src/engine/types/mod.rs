use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Separator used when joining dimension values into a group key.
/// Text values containing it are rejected during normalization.
pub const KEY_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Number,
    Text,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Number => "Number",
            FieldKind::Text => "Text",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload value that survived normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Coerces a raw JSON value into the expected kind, or `None` when it does not fit.
    pub fn coerce(value: &JsonValue, kind: FieldKind) -> Option<Self> {
        match (kind, value) {
            (FieldKind::Number, JsonValue::Number(n)) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(FieldValue::Number),
            (FieldKind::Text, JsonValue::String(s)) if !s.contains(KEY_SEPARATOR) => {
                Some(FieldValue::Text(s.clone()))
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Number(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}
