//! Runtime cell values.
//!
//! The [`CellValue`] enum is the resolved value of one column against one row,
//! borrowed from the row. It knows how to present itself as text, as a number
//! and as a date, which is all the filter, search and sort stages need.

use std::borrow::Cow;

use serde_json::{Number as JsonNumber, Value as JsonValue};

use crate::date::parse_date;

/// Value of a cell, borrowed from the source row.
///
/// # Example
///
/// ```
/// use cassiopeia_table::CellValue;
/// use serde_json::json;
///
/// let raw = json!(" 10 ");
/// let cell = CellValue::from_json(Some(&raw));
/// assert_eq!(cell.to_text(), " 10 ");
/// assert_eq!(cell.as_number(), Some(10.0));
/// assert!(CellValue::from_json(None).is_missing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    /// Some segment of the column path is absent from the row.
    Missing,
    /// Explicit JSON `null`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(&'a JsonNumber),
    /// String value (borrowed).
    String(&'a str),
    /// Array or object.
    Nested(&'a JsonValue),
}

impl<'a> CellValue<'a> {
    /// Wraps the result of a path lookup.
    pub fn from_json(value: Option<&'a JsonValue>) -> Self {
        match value {
            None => CellValue::Missing,
            Some(JsonValue::Null) => CellValue::Null,
            Some(JsonValue::Bool(b)) => CellValue::Bool(*b),
            Some(JsonValue::Number(n)) => CellValue::Number(n),
            Some(JsonValue::String(s)) => CellValue::String(s),
            Some(nested) => CellValue::Nested(nested),
        }
    }

    /// Returns `true` if the column path did not resolve.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Returns `true` for missing and `null` cells.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Missing | CellValue::Null)
    }

    /// Stringified form used for substring matching, string ordering and export.
    ///
    /// Missing and `null` cells are the empty string; arrays and objects
    /// render as compact JSON.
    pub fn to_text(&self) -> Cow<'a, str> {
        match self {
            CellValue::Missing | CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(true) => Cow::Borrowed("true"),
            CellValue::Bool(false) => Cow::Borrowed("false"),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::String(s) => Cow::Borrowed(s),
            CellValue::Nested(v) => Cow::Owned(v.to_string()),
        }
    }

    /// Reads the cell as a finite number.
    ///
    /// Strings must hold a complete number, so `"10"` is 10 but `"10 km"`
    /// and `"2024-01-15"` are not numbers. Booleans, `null`, missing and
    /// nested cells are never numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => n.as_f64().filter(|f| f.is_finite()),
            CellValue::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Reads the cell as a date.
    ///
    /// Strings go through [`parse_date`]; numbers are epoch milliseconds.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            CellValue::String(s) => parse_date(s),
            CellValue::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| Timestamp(f.trunc() as i64)),
            _ => None,
        }
    }
}

/// Reads `text` as a finite decimal number.
///
/// Surrounding whitespace is ignored; the rest must be a complete number
/// (`"42"`, `"-3.5"`, `"1e3"`). Infinities and NaN are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// # Example
///
/// ```
/// use cassiopeia_table::Timestamp;
///
/// assert!(Timestamp(1000) < Timestamp(2000));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}
