//! Cassiopeia table - in-memory filtering, search, sorting and CSV export
//! over JSON rows.
//!
//! A [`TableEngine`] holds a snapshot of rows (JSON objects) and a set of
//! view controls. It supports:
//!
//! - Case-insensitive substring filters and inclusive date-range filters per column
//! - Free-text search across the configured columns
//! - A header-click sort toggle that picks numeric, date or string comparison
//! - Dotted column paths (`position.latitude`) resolved into nested objects
//! - CSV export of any row sequence
//!
//! # Quick Start
//!
//! ```rust
//! use cassiopeia_table::{rows_from_json, TableEngine};
//!
//! let rows = rows_from_json(r#"[
//!     {"id": 7, "body": "Jupiter", "when_utc": "2024-02-01T21:00:00Z"},
//!     {"id": 10, "body": "Moon", "when_utc": "2024-01-15T06:30:00Z"},
//!     {"id": 2, "body": "Mars", "when_utc": "2024-01-20T00:00:00Z"}
//! ]"#).unwrap();
//!
//! let mut engine = TableEngine::new(["id", "body", "when_utc"], |view| {
//!     println!("{} rows", view.len());
//! });
//! engine.set_data(rows).unwrap();
//!
//! // "10" sorts after "2": both cells read as numbers.
//! engine.sort("id").unwrap();
//! assert_eq!(engine.view()[0].get("body").unwrap(), "Mars");
//!
//! engine.add_date_filter("when_utc", "2024-01-16", None).unwrap();
//! let csv = engine.export_current().unwrap();
//! assert_eq!(
//!     csv,
//!     "id,body,when_utc\n2,Mars,2024-01-20T00:00:00Z\n7,Jupiter,2024-02-01T21:00:00Z"
//! );
//! ```
//!
//! # Pipeline
//!
//! Each mutating operation recomputes the view from the full snapshot:
//!
//! ```text
//! view = sort(search(filters(data)))
//! ```
//!
//! - **filters**: every active column filter must match
//! - **search**: some configured column contains the query (skipped when empty)
//! - **sort**: stable; skipped when no sort column is active
//!
//! The render callback then receives the new view. Operations never fail on
//! data; they only return errors raised by the callback.
//!
//! # Comparison
//!
//! | Both cells read as | Comparison |
//! |--------------------|------------|
//! | finite numbers | numeric |
//! | dates | chronological |
//! | anything else | by stringified value |
//!
//! [`ComparatorMode::PerColumn`] instead chooses one comparison for the whole
//! column.

mod date;
mod engine;
mod error;
mod export;
mod filter;
mod highlight;
mod options;
mod ordering;
mod row;
mod value;

// Re-export public API
pub use date::parse_date;
pub use engine::{RenderFn, TableEngine, TableStats};
pub use error::{Result, TableError};
pub use export::{export_rows, ExportOptions, QuoteMode};
pub use filter::{ColumnFilter, DateRange, FilterSet, RangeBound, SubstringFilter};
pub use highlight::Highlighter;
pub use options::EngineOptions;
pub use ordering::{
    compare_cells, sort_indices, stable_sort_by, ColumnKind, ComparatorMode, Dir, SortState,
};
pub use row::{rows_from_json, rows_from_value, Row};
pub use value::{parse_number, CellValue, Timestamp};
