//! The table engine.
//!
//! [`TableEngine`] holds a row snapshot and derives a view from it by running
//! a fixed pipeline: column filters, then free-text search, then sort. Every
//! state change recomputes the view from the full snapshot and hands it to the
//! render callback before returning.

use std::convert::Infallible;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::Result;
use crate::export::export_rows;
use crate::filter::{ColumnFilter, FilterSet};
use crate::options::EngineOptions;
use crate::ordering::{sort_indices, Dir, SortState};
use crate::row::Row;
use crate::value::CellValue;

/// Render callback stored by the engine.
pub type RenderFn<'s, E> = Box<dyn FnMut(&[&Row]) -> std::result::Result<(), E> + 's>;

/// Row counts before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Rows in the snapshot.
    pub total: usize,
    /// Rows in the current view.
    pub filtered: usize,
    /// Rows excluded from the view.
    pub hidden: usize,
}

/// Filter, search and sort engine over an in-memory row snapshot.
///
/// The engine is single-threaded and synchronous. Each mutating operation
/// runs the whole pipeline and invokes the render callback inline; if the
/// callback fails, the error is returned from that operation. The view has
/// already been updated when the callback runs.
///
/// `E` is the render callback's error type. Engines built with
/// [`TableEngine::new`] use [`Infallible`].
///
/// # Example
///
/// ```
/// use cassiopeia_table::{rows_from_json, TableEngine};
///
/// let rows = rows_from_json(r#"[
///     {"id": 1, "body": "Moon", "event": "rise"},
///     {"id": 2, "body": "Mars", "event": "opposition"},
///     {"id": 3, "body": "Moon", "event": "set"}
/// ]"#).unwrap();
///
/// let mut engine = TableEngine::new(["id", "body", "event"], |_view| {});
/// engine.set_data(rows).unwrap();
/// engine.add_filter("body", "moon").unwrap();
/// engine.sort("id").unwrap();
/// engine.sort("id").unwrap();
///
/// let ids: Vec<String> = engine
///     .view()
///     .iter()
///     .map(|row| row.get("id").unwrap().to_string())
///     .collect();
/// assert_eq!(ids, vec!["3", "1"]);
///
/// let stats = engine.get_stats();
/// assert_eq!((stats.total, stats.filtered, stats.hidden), (3, 2, 1));
/// ```
pub struct TableEngine<'s, E = Infallible> {
    options: EngineOptions,
    data: Vec<Row>,
    view: Vec<usize>,
    filters: FilterSet,
    search: String,
    sort: SortState,
    render: RenderFn<'s, E>,
}

impl<'s> TableEngine<'s, Infallible> {
    /// Creates an engine over `columns` with an infallible render callback.
    pub fn new<I, S, F>(columns: I, render: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&[&Row]) + 's,
    {
        TableEngine::with_options(EngineOptions::new(columns), render)
    }

    /// Creates an engine from options with an infallible render callback.
    pub fn with_options<F>(options: EngineOptions, mut render: F) -> Self
    where
        F: FnMut(&[&Row]) + 's,
    {
        TableEngine::try_with_options(options, move |rows| {
            render(rows);
            Ok(())
        })
    }
}

impl<'s, E> TableEngine<'s, E> {
    /// Creates an engine over `columns` with a fallible render callback.
    pub fn try_new<I, S, F>(columns: I, render: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&[&Row]) -> std::result::Result<(), E> + 's,
    {
        TableEngine::try_with_options(EngineOptions::new(columns), render)
    }

    /// Creates an engine from options with a fallible render callback.
    ///
    /// The engine starts empty; nothing is rendered until the first
    /// operation.
    pub fn try_with_options<F>(options: EngineOptions, render: F) -> Self
    where
        F: FnMut(&[&Row]) -> std::result::Result<(), E> + 's,
    {
        TableEngine {
            options,
            data: Vec::new(),
            view: Vec::new(),
            filters: FilterSet::new(),
            search: String::new(),
            sort: SortState::new(),
            render: Box::new(render),
        }
    }

    // ========================================================================
    // Mutating operations
    // ========================================================================

    /// Replaces the row snapshot.
    ///
    /// Filters, search and sort stay in place and are applied to the new rows.
    pub fn set_data<I>(&mut self, rows: I) -> std::result::Result<(), E>
    where
        I: IntoIterator<Item = Row>,
    {
        self.data = rows.into_iter().collect();
        trace!(rows = self.data.len(), "snapshot replaced");
        self.refresh()
    }

    /// Sets a case-insensitive substring filter on `column`.
    ///
    /// An empty or absent value removes the column's filter instead.
    pub fn add_filter<'v>(
        &mut self,
        column: &str,
        value: impl Into<Option<&'v str>>,
    ) -> std::result::Result<(), E> {
        match value.into().filter(|v| !v.is_empty()) {
            Some(value) => {
                trace!(column, value, "substring filter set");
                self.filters.set(column, ColumnFilter::substring(value));
            }
            None => {
                trace!(column, "filter removed");
                self.filters.remove(column);
            }
        }
        self.refresh()
    }

    /// Sets an inclusive date-range filter on `column`.
    ///
    /// Either bound may be absent or empty for an open side. A bound that is
    /// not a date makes the filter exclude every row.
    pub fn add_date_filter<'v>(
        &mut self,
        column: &str,
        start: impl Into<Option<&'v str>>,
        end: impl Into<Option<&'v str>>,
    ) -> std::result::Result<(), E> {
        let (start, end) = (start.into(), end.into());
        trace!(column, ?start, ?end, "date filter set");
        self.filters.set(column, ColumnFilter::date_range(start, end));
        self.refresh()
    }

    /// Sets the free-text search. An empty query clears it.
    pub fn search(&mut self, query: &str) -> std::result::Result<(), E> {
        self.search = query.to_lowercase();
        trace!(query = %self.search, "search set");
        self.refresh()
    }

    /// Header-click sort toggle.
    ///
    /// Sorting by the active column flips the direction; any other column
    /// becomes active in ascending order. Filters and search are untouched.
    pub fn sort(&mut self, column: &str) -> std::result::Result<(), E> {
        self.sort.toggle(column);
        trace!(column, dir = %self.sort.dir(), "sort toggled");
        self.refresh()
    }

    /// Sets the sort direction explicitly.
    ///
    /// Does nothing, and does not render, while no sort column is active.
    pub fn set_sort_direction(&mut self, dir: Dir) -> std::result::Result<(), E> {
        if !self.sort.is_active() {
            return Ok(());
        }
        self.sort.set_dir(dir);
        self.refresh()
    }

    /// Removes every column filter and the search query.
    pub fn clear_filters(&mut self) -> std::result::Result<(), E> {
        self.filters.clear();
        self.search.clear();
        self.refresh()
    }

    /// Deactivates sorting.
    pub fn clear_sort(&mut self) -> std::result::Result<(), E> {
        self.sort.clear();
        self.refresh()
    }

    /// Clears filters, search and sort with a single render.
    pub fn reset(&mut self) -> std::result::Result<(), E> {
        self.filters.clear();
        self.search.clear();
        self.sort.clear();
        self.refresh()
    }

    // ========================================================================
    // Pure queries
    // ========================================================================

    /// Resolves a possibly dotted column path against a row.
    pub fn get_cell_value<'r>(row: &'r Row, column: &str) -> CellValue<'r> {
        CellValue::from_json(row.resolve(column))
    }

    /// Snapshot size, view size and their difference.
    pub fn get_stats(&self) -> TableStats {
        let total = self.data.len();
        let filtered = self.view.len();
        TableStats {
            total,
            filtered,
            hidden: total - filtered,
        }
    }

    /// Serializes `rows` as CSV over `columns` using the engine's export
    /// settings.
    pub fn export_to_view<'r, I, C>(&self, rows: I, columns: &[C]) -> Result<String>
    where
        I: IntoIterator<Item = &'r Row>,
        C: AsRef<str>,
    {
        export_rows(rows, columns, &self.options.export)
    }

    /// Serializes the current view over the configured columns.
    pub fn export_current(&self) -> Result<String> {
        export_rows(self.view_iter(), &self.options.columns, &self.options.export)
    }

    /// Rows of the current view, in view order.
    pub fn view(&self) -> Vec<&Row> {
        self.view_iter().collect()
    }

    /// Positions of the current view's rows in the snapshot.
    pub fn view_indices(&self) -> &[usize] {
        &self.view
    }

    /// The row snapshot.
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Configured columns.
    pub fn columns(&self) -> &[String] {
        &self.options.columns
    }

    /// Engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Active column filters.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Lower-cased search query; empty when no search is active.
    pub fn search_query(&self) -> &str {
        &self.search
    }

    /// Current sort column and direction.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    fn view_iter(&self) -> impl Iterator<Item = &Row> + '_ {
        self.view.iter().map(|&i| &self.data[i])
    }

    fn refresh(&mut self) -> std::result::Result<(), E> {
        self.recompute();
        let rows: Vec<&Row> = self.view.iter().map(|&i| &self.data[i]).collect();
        (self.render)(&rows)
    }

    fn recompute(&mut self) {
        let mut indices: Vec<usize> = (0..self.data.len())
            .filter(|&i| self.filters.matches(&self.data[i]))
            .collect();

        if !self.search.is_empty() {
            indices.retain(|&i| self.matches_search(&self.data[i]));
        }

        if let Some(column) = self.sort.column() {
            sort_indices(
                &self.data,
                &mut indices,
                column,
                self.sort.dir(),
                self.options.comparator,
            );
        }

        debug!(
            total = self.data.len(),
            filtered = indices.len(),
            filters = self.filters.len(),
            search = !self.search.is_empty(),
            sort = ?self.sort.column(),
            "view recomputed"
        );
        self.view = indices;
    }

    fn matches_search(&self, row: &Row) -> bool {
        self.options.columns.iter().any(|column| {
            Self::get_cell_value(row, column)
                .to_text()
                .to_lowercase()
                .contains(&self.search)
        })
    }
}

impl<E> fmt::Debug for TableEngine<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableEngine")
            .field("options", &self.options)
            .field("rows", &self.data.len())
            .field("view", &self.view.len())
            .field("filters", &self.filters)
            .field("search", &self.search)
            .field("sort", &self.sort)
            .finish_non_exhaustive()
    }
}
