//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::export::ExportOptions;
use crate::ordering::ComparatorMode;

/// Settings a [`TableEngine`](crate::TableEngine) is constructed with.
///
/// Every field has a default, so a configuration file only needs the keys it
/// changes:
///
/// ```
/// use cassiopeia_table::{ComparatorMode, EngineOptions};
///
/// let options: EngineOptions = serde_json::from_str(
///     r#"{"columns": ["id", "body"], "comparator": "per-column"}"#,
/// ).unwrap();
/// assert_eq!(options.columns, vec!["id", "body"]);
/// assert_eq!(options.comparator, ComparatorMode::PerColumn);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Column identifiers, possibly dotted paths.
    ///
    /// Search scope and export header order follow this list.
    pub columns: Vec<String>,
    /// How the sort comparator is chosen.
    pub comparator: ComparatorMode,
    /// CSV export settings.
    pub export: ExportOptions,
}

impl EngineOptions {
    /// Options for the given columns with everything else defaulted.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EngineOptions {
            columns: columns.into_iter().map(Into::into).collect(),
            ..EngineOptions::default()
        }
    }

    /// Sets the comparator mode.
    pub fn comparator(mut self, mode: ComparatorMode) -> Self {
        self.comparator = mode;
        self
    }

    /// Sets the export options.
    pub fn export(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }
}
