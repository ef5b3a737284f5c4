//! Formatting a view for output.

use anyhow::Result;
use cassiopeia_table::{export_rows, CellValue, ExportOptions, Highlighter, Row, TableStats};
use console::Style;
use unicode_width::UnicodeWidthStr;

use crate::cli::OutputFormat;

const COLUMN_GAP: &str = "  ";

/// Turns a view into text in one of the output formats.
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    format: OutputFormat,
    columns: Vec<String>,
    export: ExportOptions,
    styled: bool,
    highlight: Option<(Highlighter, String)>,
}

impl ViewRenderer {
    /// Creates a renderer for the given columns.
    pub fn new(format: OutputFormat, columns: Vec<String>, export: ExportOptions) -> Self {
        ViewRenderer {
            format,
            columns,
            export,
            styled: false,
            highlight: None,
        }
    }

    /// Enables terminal styling of the table header and highlights.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Marks occurrences of `query` in table cells.
    ///
    /// Styled output uses reverse video; plain output uses `<mark>` tags.
    pub fn highlight(mut self, query: &str) -> Self {
        let highlighter = if self.styled {
            Highlighter::new("\u{1b}[7m", "\u{1b}[27m")
        } else {
            Highlighter::default()
        };
        self.highlight = Some((highlighter, query.to_string()));
        self
    }

    /// Renders `view` in the configured format.
    pub fn render(&self, view: &[&Row]) -> Result<String> {
        match self.format {
            OutputFormat::Table => self.render_table(view),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
            OutputFormat::Csv => Ok(export_rows(
                view.iter().copied(),
                &self.columns,
                &self.export,
            )?),
        }
    }

    fn render_table(&self, view: &[&Row]) -> Result<String> {
        let cells: Vec<Vec<String>> = view
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| cell_text(row, column))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells
                    .iter()
                    .map(|row| row[i].width())
                    .chain(std::iter::once(column.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header_style = Style::new().bold().force_styling(true);
        let mut lines = Vec::with_capacity(cells.len() + 2);

        let header: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                if self.styled {
                    header_style.apply_to(column).to_string()
                } else {
                    column.clone()
                }
            })
            .collect();
        let plain_header: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        lines.push(join_padded(&header, &plain_header, &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP),
        );

        for row in &cells {
            let plain: Vec<&str> = row.iter().map(String::as_str).collect();
            let shown = match &self.highlight {
                Some((highlighter, query)) => row
                    .iter()
                    .map(|text| highlighter.highlight(text, query))
                    .collect::<cassiopeia_table::Result<Vec<_>>>()?,
                None => row.clone(),
            };
            lines.push(join_padded(&shown, &plain, &widths));
        }

        Ok(lines.join("\n"))
    }
}

/// One-line summary of the view size.
pub fn stats_line(stats: &TableStats) -> String {
    format!(
        "Showing {} of {} ({} hidden)",
        stats.filtered, stats.total, stats.hidden
    )
}

// Table cells are single-line.
fn cell_text(row: &Row, column: &str) -> String {
    CellValue::from_json(row.resolve(column))
        .to_text()
        .replace(['\n', '\r'], " ")
}

// Pads using the width of the plain text so markup does not shift columns.
fn join_padded(shown: &[String], plain: &[&str], widths: &[usize]) -> String {
    let last = shown.len().saturating_sub(1);
    let mut line = String::new();
    for (i, (text, width)) in shown.iter().zip(widths).enumerate() {
        line.push_str(text);
        if i < last {
            let pad = width.saturating_sub(plain[i].width());
            line.push_str(&" ".repeat(pad));
            line.push_str(COLUMN_GAP);
        }
    }
    line
}
