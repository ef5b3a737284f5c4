//! Rows and dotted-path column resolution.
//!
//! A [`Row`] is one record of tabular data: a mapping from column name to a
//! JSON value. Columns may reach into nested objects with a dot-separated
//! path such as `position.latitude`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Result, TableError};

/// One record of tabular data.
///
/// Rows are immutable once handed to the engine; views only ever borrow them.
///
/// # Example
///
/// ```
/// use cassiopeia_table::Row;
/// use serde_json::json;
///
/// let row = Row::from_value(json!({"position": {"latitude": 51.6}})).unwrap();
/// assert_eq!(row.resolve("position.latitude"), Some(&json!(51.6)));
/// assert_eq!(row.resolve("position.altitude"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, JsonValue>);

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Row::default()
    }

    /// Converts a JSON value into a row.
    ///
    /// Only JSON objects are rows; anything else is rejected.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Row(map)),
            other => Err(TableError::InvalidRow {
                found: json_kind(&other),
            }),
        }
    }

    /// Returns the top-level value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Resolves a possibly dotted column path against this row.
    ///
    /// Walks one segment at a time and stops at the first absent segment.
    /// An intermediate value that is not an object counts as absent.
    pub fn resolve(&self, path: &str) -> Option<&JsonValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Returns the top-level column names in stored order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying JSON map.
    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.0
    }
}

impl From<Map<String, JsonValue>> for Row {
    fn from(map: Map<String, JsonValue>) -> Self {
        Row(map)
    }
}

impl TryFrom<JsonValue> for Row {
    type Error = TableError;

    fn try_from(value: JsonValue) -> Result<Self> {
        Row::from_value(value)
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        Row(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Parses a JSON array of objects into rows.
pub fn rows_from_json(text: &str) -> Result<Vec<Row>> {
    let value: JsonValue = serde_json::from_str(text)?;
    rows_from_value(value)
}

/// Converts a JSON array of objects into rows.
///
/// A bare object is accepted as a single-row table.
pub fn rows_from_value(value: JsonValue) -> Result<Vec<Row>> {
    match value {
        JsonValue::Array(items) => items.into_iter().map(Row::from_value).collect(),
        JsonValue::Object(map) => Ok(vec![Row(map)]),
        other => Err(TableError::InvalidRow {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
