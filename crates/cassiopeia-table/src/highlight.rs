//! Search-match highlighting for rendered cells.

use regex::{Captures, RegexBuilder};

use crate::error::Result;

/// Wraps case-insensitive occurrences of a search query in markers.
///
/// The query is matched literally; regex metacharacters in it carry no
/// special meaning. Text is not escaped, so callers rendering HTML should
/// escape cell text before highlighting.
///
/// # Example
///
/// ```
/// use cassiopeia_table::Highlighter;
///
/// let marked = Highlighter::default().highlight("Moon and moon", "MOON").unwrap();
/// assert_eq!(marked, "<mark>Moon</mark> and <mark>moon</mark>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    open: String,
    close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Highlighter::new("<mark>", "</mark>")
    }
}

impl Highlighter {
    /// Creates a highlighter with custom markers.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Highlighter {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Returns `text` with every match of `query` wrapped.
    ///
    /// An empty query returns the text unchanged.
    pub fn highlight(&self, text: &str, query: &str) -> Result<String> {
        if query.is_empty() {
            return Ok(text.to_string());
        }
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()?;
        let marked = pattern.replace_all(text, |caps: &Captures<'_>| {
            format!("{}{}{}", self.open, &caps[0], self.close)
        });
        Ok(marked.into_owned())
    }
}
