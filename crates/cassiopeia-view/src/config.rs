//! Engine options and row loading from files.

use std::path::Path;

use anyhow::{bail, Context, Result};
use cassiopeia_table::{rows_from_json, EngineOptions, Row};

/// Loads [`EngineOptions`] from a YAML or JSON file, chosen by extension.
pub fn load_options(path: &Path) -> Result<EngineOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let options = match extension.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?,
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?,
        _ => bail!(
            "unsupported config format for {} (expected .yaml, .yml or .json)",
            path.display()
        ),
    };
    Ok(options)
}

/// Reads a JSON array of row objects.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rows {}", path.display()))?;
    rows_from_json(&content).with_context(|| format!("invalid rows in {}", path.display()))
}

/// Columns from the command line, the config file, or the first row, in
/// that order of preference.
pub fn resolve_columns(cli_columns: &[String], options: &mut EngineOptions, rows: &[Row]) {
    if !cli_columns.is_empty() {
        options.columns = cli_columns.to_vec();
    } else if options.columns.is_empty() {
        if let Some(first) = rows.first() {
            options.columns = first.keys().map(str::to_string).collect();
        }
    }
}
