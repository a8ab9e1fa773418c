use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// A single column value in a partial update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PatchValue {
    /// Any signed integer width.
    Signed(i64),
    /// Any unsigned integer width.
    Unsigned(u64),
    /// Any floating point width.
    Float(f64),
    /// UTF-8 string value.
    Text(String),
    /// Boolean value.
    Boolean(bool),
    /// UTC timestamp, serialized as RFC 3339.
    Timestamp(DateTime<Utc>),
}

impl PatchValue {
    /// Returns a stable label for the value kind, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Signed(_) => "signed",
            Self::Unsigned(_) => "unsigned",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

/// Column name to value pairs for a partial record update.
///
/// Keys are storage column names. Ordering carries no meaning; the map is
/// sorted only to keep output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UpdateMap(BTreeMap<String, PatchValue>);

impl UpdateMap {
    /// Creates an empty update map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for a column, replacing any earlier value.
    pub fn insert(&mut self, column: impl Into<String>, value: PatchValue) {
        self.0.insert(column.into(), value);
    }

    /// Returns the value staged for a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&PatchValue> {
        self.0.get(column)
    }

    /// Returns whether a column is staged for update.
    #[must_use]
    pub fn contains_key(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Returns the number of staged columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the staged column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Renders the map as a JSON object for JSON-backed record stores.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let object = self
            .0
            .iter()
            .map(|(column, value)| (column.clone(), patch_value_to_json(value)))
            .collect();

        Value::Object(object)
    }
}

fn patch_value_to_json(value: &PatchValue) -> Value {
    match value {
        PatchValue::Signed(number) => Value::from(*number),
        PatchValue::Unsigned(number) => Value::from(*number),
        // Non-finite floats have no JSON form and become null.
        PatchValue::Float(number) => Value::from(*number),
        PatchValue::Text(text) => Value::String(text.clone()),
        PatchValue::Boolean(flag) => Value::Bool(*flag),
        PatchValue::Timestamp(timestamp) => {
            Value::String(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
    }
}
