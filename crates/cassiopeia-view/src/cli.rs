//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, ValueEnum};

/// View a JSON table: filter, search, sort and export rows.
#[derive(Debug, Parser)]
#[command(name = "cview", version, about)]
pub struct Cli {
    /// JSON file holding an array of row objects
    #[arg(value_name = "ROWS")]
    pub rows: PathBuf,

    /// Engine options file (.yaml, .yml or .json)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Columns to show, search and export (overrides the config file)
    #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
    pub columns: Vec<String>,

    /// Substring filter, repeatable
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    pub filters: Vec<FilterArg>,

    /// Inclusive date-range filter; either side may be empty
    #[arg(long = "date-filter", value_name = "COLUMN=START..END")]
    pub date_filters: Vec<DateFilterArg>,

    /// Free-text search across all columns
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Sort toggle; repeating a column flips its direction
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sorts: Vec<String>,

    /// Sort the active column in descending order
    #[arg(long)]
    pub desc: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the view as CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Print row counts after the view
    #[arg(long)]
    pub stats: bool,

    /// Mark search matches in table output
    #[arg(long)]
    pub highlight: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// How the final view is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// Pretty-printed JSON array
    Json,
    /// CSV using the export settings
    Csv,
}

/// `COLUMN=VALUE` substring filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub column: String,
    pub value: String,
}

impl FromStr for FilterArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = split_column(s)?;
        Ok(FilterArg {
            column,
            value: value.to_string(),
        })
    }
}

/// `COLUMN=START..END` date-range filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilterArg {
    pub column: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FromStr for DateFilterArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, range) = split_column(s)?;
        let (start, end) = range
            .split_once("..")
            .ok_or_else(|| format!("expected START..END in '{s}'"))?;
        let bound = |b: &str| Some(b.trim()).filter(|b| !b.is_empty()).map(str::to_string);
        Ok(DateFilterArg {
            column,
            start: bound(start),
            end: bound(end),
        })
    }
}

fn split_column(s: &str) -> Result<(String, &str), String> {
    let (column, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=... in '{s}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{s}'"));
    }
    Ok((column.to_string(), rest))
}
