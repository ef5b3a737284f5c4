//! Per-column filters.
//!
//! A [`FilterSet`] holds at most one [`ColumnFilter`] per column. A row passes
//! the set when it passes every filter in it.

use tracing::warn;

use crate::date::parse_date;
use crate::row::Row;
use crate::value::{CellValue, Timestamp};

/// A single column constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Case-insensitive substring match on the stringified cell.
    Substring(SubstringFilter),
    /// Inclusive date range on the cell read as a date.
    DateRange(DateRange),
}

impl ColumnFilter {
    /// Creates a substring filter.
    pub fn substring(value: impl Into<String>) -> Self {
        ColumnFilter::Substring(SubstringFilter::new(value))
    }

    /// Creates a date-range filter. Empty bounds are unbounded.
    pub fn date_range(start: Option<&str>, end: Option<&str>) -> Self {
        ColumnFilter::DateRange(DateRange::new(start, end))
    }

    /// Evaluates this filter against a cell.
    pub fn matches(&self, cell: &CellValue<'_>) -> bool {
        match self {
            ColumnFilter::Substring(filter) => filter.matches(cell),
            ColumnFilter::DateRange(range) => range.matches(cell),
        }
    }

    /// Returns `true` if this is a date-range filter.
    pub fn is_date(&self) -> bool {
        matches!(self, ColumnFilter::DateRange(_))
    }
}

/// Substring filter. The needle is lower-cased once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringFilter {
    value: String,
    needle: String,
}

impl SubstringFilter {
    /// Creates a filter matching cells that contain `value`, ignoring case.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let needle = value.to_lowercase();
        SubstringFilter { value, needle }
    }

    /// The filter value as given.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Evaluates the filter. Missing cells stringify to `""`.
    pub fn matches(&self, cell: &CellValue<'_>) -> bool {
        cell.to_text().to_lowercase().contains(&self.needle)
    }
}

/// One side of a date range after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// No constraint on this side.
    Unbounded,
    /// Inclusive bound.
    At(Timestamp),
    /// The bound text did not parse as a date.
    Invalid,
}

impl RangeBound {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => RangeBound::Unbounded,
            Some(text) => parse_date(text).map_or(RangeBound::Invalid, RangeBound::At),
        }
    }
}

/// Inclusive date range with optional bounds.
///
/// A bound that fails to parse makes the range exclude every row. Cells that
/// do not read as dates are excluded too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start_raw: Option<String>,
    end_raw: Option<String>,
    start: RangeBound,
    end: RangeBound,
}

impl DateRange {
    /// Creates a range from raw bound text.
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        let range = DateRange {
            start_raw: start.map(str::to_string),
            end_raw: end.map(str::to_string),
            start: RangeBound::parse(start),
            end: RangeBound::parse(end),
        };
        if !range.is_valid() {
            warn!(
                start = ?range.start_raw,
                end = ?range.end_raw,
                "date filter bound is not a date; filter excludes every row"
            );
        }
        range
    }

    /// Start bound as given.
    pub fn start_raw(&self) -> Option<&str> {
        self.start_raw.as_deref()
    }

    /// End bound as given.
    pub fn end_raw(&self) -> Option<&str> {
        self.end_raw.as_deref()
    }

    /// Parsed start bound.
    pub fn start(&self) -> RangeBound {
        self.start
    }

    /// Parsed end bound.
    pub fn end(&self) -> RangeBound {
        self.end
    }

    /// Returns `false` if either bound failed to parse.
    pub fn is_valid(&self) -> bool {
        self.start != RangeBound::Invalid && self.end != RangeBound::Invalid
    }

    /// Evaluates the range against a cell.
    pub fn matches(&self, cell: &CellValue<'_>) -> bool {
        if !self.is_valid() {
            return false;
        }
        let Some(ts) = cell.as_timestamp() else {
            return false;
        };
        if let RangeBound::At(start) = self.start {
            if ts < start {
                return false;
            }
        }
        if let RangeBound::At(end) = self.end {
            if ts > end {
                return false;
            }
        }
        true
    }
}

/// Active per-column filters, kept in insertion order.
///
/// Replacing the filter on a column keeps that column's original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<(String, ColumnFilter)>,
}

impl FilterSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        FilterSet::default()
    }

    /// Sets the filter for `column`, replacing any previous one.
    pub fn set(&mut self, column: impl Into<String>, filter: ColumnFilter) {
        let column = column.into();
        match self.filters.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = filter,
            None => self.filters.push((column, filter)),
        }
    }

    /// Removes the filter for `column`, returning it if present.
    pub fn remove(&mut self, column: &str) -> Option<ColumnFilter> {
        let pos = self.filters.iter().position(|(c, _)| c == column)?;
        Some(self.filters.remove(pos).1)
    }

    /// Returns the filter for `column`.
    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.filters
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, f)| f)
    }

    /// Iterates `(column, filter)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnFilter)> {
        self.filters.iter().map(|(c, f)| (c.as_str(), f))
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Removes every filter.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Tests a row against every filter.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|(column, filter)| filter.matches(&CellValue::from_json(row.resolve(column))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        Row::from_value(value).unwrap()
    }

    #[test]
    fn substring_ignores_case() {
        let f = ColumnFilter::substring("MOON");
        assert!(f.matches(&CellValue::String("Full moon rise")));
        assert!(!f.matches(&CellValue::String("Sunset")));
    }

    #[test]
    fn substring_on_numbers_uses_text() {
        let f = ColumnFilter::substring("55");
        let n = json!(25544);
        assert!(f.matches(&CellValue::from_json(Some(&n))));
    }

    #[test]
    fn substring_on_missing_matches_only_empty_needle() {
        assert!(!ColumnFilter::substring("x").matches(&CellValue::Missing));
        assert!(ColumnFilter::substring("").matches(&CellValue::Missing));
    }

    #[test]
    fn date_range_inclusive_bounds() {
        let f = ColumnFilter::date_range(Some("2024-01-10"), Some("2024-01-20"));
        assert!(f.matches(&CellValue::String("2024-01-10")));
        assert!(f.matches(&CellValue::String("2024-01-15T12:00:00Z")));
        assert!(f.matches(&CellValue::String("2024-01-20")));
        assert!(!f.matches(&CellValue::String("2024-01-20T00:00:01Z")));
        assert!(!f.matches(&CellValue::String("2024-01-09")));
    }

    #[test]
    fn date_range_open_sides() {
        let from = ColumnFilter::date_range(Some("2024-01-10"), None);
        assert!(from.matches(&CellValue::String("2030-01-01")));
        assert!(!from.matches(&CellValue::String("2000-01-01")));

        let until = ColumnFilter::date_range(None, Some("2024-01-10"));
        assert!(until.matches(&CellValue::String("2000-01-01")));
        assert!(!until.matches(&CellValue::String("2030-01-01")));

        let any = ColumnFilter::date_range(Some(""), None);
        assert!(any.matches(&CellValue::String("1999-12-31")));
    }

    #[test]
    fn date_range_excludes_unparseable_cells() {
        let f = ColumnFilter::date_range(None, None);
        assert!(!f.matches(&CellValue::String("tomorrow")));
        assert!(!f.matches(&CellValue::Missing));
        assert!(f.matches(&CellValue::String("2024-01-01")));
    }

    #[test]
    fn invalid_bound_fails_closed() {
        let range = DateRange::new(Some("not a date"), None);
        assert!(!range.is_valid());
        assert_eq!(range.start(), RangeBound::Invalid);
        assert_eq!(range.start_raw(), Some("not a date"));
        assert!(!range.matches(&CellValue::String("2024-01-01")));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut set = FilterSet::new();
        set.set("a", ColumnFilter::substring("1"));
        set.set("b", ColumnFilter::substring("2"));
        set.set("a", ColumnFilter::substring("3"));

        let columns: Vec<&str> = set.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["a", "b"]);
        assert_eq!(set.get("a"), Some(&ColumnFilter::substring("3")));
    }

    #[test]
    fn remove_and_clear() {
        let mut set = FilterSet::new();
        set.set("a", ColumnFilter::substring("1"));
        set.set("b", ColumnFilter::date_range(None, None));
        assert!(set.remove("a").is_some());
        assert!(set.remove("a").is_none());
        assert_eq!(set.len(), 1);
        assert!(set.get("b").is_some_and(ColumnFilter::is_date));
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn set_matches_all_filters() {
        let mut set = FilterSet::new();
        set.set("body", ColumnFilter::substring("moon"));
        set.set("position.alt", ColumnFilter::substring("4"));

        assert!(set.matches(&row(json!({"body": "Moon", "position": {"alt": 408}}))));
        assert!(!set.matches(&row(json!({"body": "Moon", "position": {"alt": 10}}))));
        assert!(!set.matches(&row(json!({"body": "Sun", "position": {"alt": 408}}))));
        assert!(FilterSet::new().matches(&row(json!({}))));
    }
}
