//! CSV export of a view.
//!
//! Export produces text only; writing it somewhere is up to the host.

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::row::Row;
use crate::value::CellValue;

/// Quoting rule for data fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteMode {
    /// Quote fields containing a delimiter, quote or line break.
    #[default]
    Necessary,
    /// Quote every data field. The header line stays bare.
    Always,
}

impl From<QuoteMode> for QuoteStyle {
    fn from(mode: QuoteMode) -> Self {
        match mode {
            QuoteMode::Necessary => QuoteStyle::Necessary,
            QuoteMode::Always => QuoteStyle::Always,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Quoting rule for data fields.
    pub quote: QuoteMode,
    /// Leading part of generated file names.
    pub file_prefix: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            quote: QuoteMode::Necessary,
            file_prefix: "cassiopeia_export".to_string(),
        }
    }
}

impl ExportOptions {
    /// File name for an export made on `date`, e.g.
    /// `cassiopeia_export_2024-01-15.csv`.
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.csv", self.file_prefix, date.format("%Y-%m-%d"))
    }
}

/// Serializes rows as CSV.
///
/// The first line holds the column identifiers; each row follows with its
/// cells stringified in column order. Embedded quotes are doubled inside
/// quoted fields. Lines are separated by `\n` with no trailing newline.
///
/// # Example
///
/// ```
/// use cassiopeia_table::{export_rows, ExportOptions, Row};
/// use serde_json::json;
///
/// let rows = vec![Row::from_value(json!({"a": "hello, \"world\"", "b": 2})).unwrap()];
/// let csv = export_rows(&rows, &["a", "b"], &ExportOptions::default()).unwrap();
/// assert_eq!(csv, "a,b\n\"hello, \"\"world\"\"\",2");
/// ```
pub fn export_rows<'r, I, C>(rows: I, columns: &[C], options: &ExportOptions) -> Result<String>
where
    I: IntoIterator<Item = &'r Row>,
    C: AsRef<str>,
{
    let columns: Vec<&str> = columns.iter().map(AsRef::<str>::as_ref).collect();
    if columns.is_empty() {
        // No fields: one empty line for the header and for each row.
        let lines = 1 + rows.into_iter().count();
        return Ok(vec![""; lines].join("\n"));
    }

    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    header.write_record(&columns)?;
    let buf = header
        .into_inner()
        .map_err(|e| TableError::CsvFlush(e.to_string()))?;

    let mut body = WriterBuilder::new()
        .quote_style(options.quote.into())
        .from_writer(buf);
    for row in rows {
        body.write_record(columns.iter().map(|column| {
            CellValue::from_json(row.resolve(column))
                .to_text()
                .into_owned()
        }))?;
    }
    let bytes = body
        .into_inner()
        .map_err(|e| TableError::CsvFlush(e.to_string()))?;

    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
