//! Cassiopeia view - command-line host for the table engine.
//!
//! Loads rows from a JSON file, drives a [`TableEngine`] from command-line
//! flags and writes the resulting view as a text table, JSON or CSV. The
//! engine's render callback formats every intermediate view; the last frame
//! is what gets written.
//!
//! # Example
//!
//! ```text
//! cview events.json --columns id,body,when_utc \
//!     --filter body=moon --date-filter when_utc=2024-01-01.. \
//!     --sort when_utc --desc --stats
//! ```

mod cli;
mod config;
mod logging;
mod render;

use std::cell::RefCell;
use std::io::Write;

use anyhow::{Context, Result};
use cassiopeia_table::{Dir, TableEngine};
use chrono::Local;
use tracing::{debug, info};

pub use cli::{Cli, DateFilterArg, FilterArg, OutputFormat};
pub use config::{load_options, load_rows, resolve_columns};
pub use logging::init as init_logging;
pub use render::{stats_line, ViewRenderer};

/// Runs one invocation, writing the view to `out`.
///
/// `styled` enables terminal styling in table output.
pub fn run<W: Write>(cli: &Cli, styled: bool, out: &mut W) -> Result<()> {
    let rows = load_rows(&cli.rows)?;
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => Default::default(),
    };
    resolve_columns(&cli.columns, &mut options, &rows);
    debug!(rows = rows.len(), columns = ?options.columns, "loaded");

    let mut renderer =
        ViewRenderer::new(cli.format, options.columns.clone(), options.export.clone())
            .styled(styled);
    if cli.highlight {
        if let Some(query) = cli.search.as_deref().filter(|q| !q.is_empty()) {
            renderer = renderer.highlight(query);
        }
    }

    let frame = RefCell::new(String::new());
    let mut engine = TableEngine::try_with_options(options, |view| {
        *frame.borrow_mut() = renderer.render(view)?;
        Ok::<(), anyhow::Error>(())
    });

    engine.set_data(rows)?;
    for filter in &cli.filters {
        engine.add_filter(&filter.column, filter.value.as_str())?;
    }
    for filter in &cli.date_filters {
        engine.add_date_filter(
            &filter.column,
            filter.start.as_deref(),
            filter.end.as_deref(),
        )?;
    }
    if let Some(query) = &cli.search {
        engine.search(query)?;
    }
    for column in &cli.sorts {
        engine.sort(column)?;
    }
    if cli.desc {
        engine.set_sort_direction(Dir::Desc)?;
    }

    if let Some(dir) = &cli.export_dir {
        let path = dir.join(engine.options().export.file_name(Local::now().date_naive()));
        let csv = engine.export_current()?;
        std::fs::write(&path, csv)
            .with_context(|| format!("failed to write export {}", path.display()))?;
        info!(path = %path.display(), rows = engine.get_stats().filtered, "view exported");
    }

    let stats = engine.get_stats();
    drop(engine);

    writeln!(out, "{}", frame.into_inner())?;
    if cli.stats {
        writeln!(out, "{}", stats_line(&stats))?;
    }
    Ok(())
}
