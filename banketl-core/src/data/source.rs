//! Page source trait and structured error types.
//!
//! `PageSource` abstracts over where the HTML comes from (live HTTP, a saved
//! snapshot, a test fixture) so the pipeline can be driven without a network.

use thiserror::Error;

/// Structured errors for fetch, extract and transform.
///
/// Variants group into transport, parse, conversion and file failures so the
/// CLI can report which kind of input was at fault.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("no <table> element found in page")]
    TableNotFound,

    #[error("table row {row} has {cells} data cells, need at least {required}")]
    MalformedRow {
        row: usize,
        cells: usize,
        required: usize,
    },

    #[error("row {row}: column {column} is not a number: '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("exchange rate for {currency} missing from rate file")]
    MissingRate { currency: String },

    #[error("invalid rate for {currency}: '{value}'")]
    InvalidRate { currency: String, value: String },

    #[error("rate file: {0}")]
    RateFile(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    /// Short label for the failure class, used in terminal log entries.
    pub fn kind(&self) -> &'static str {
        match self {
            DataError::NetworkUnreachable(_) | DataError::HttpStatus { .. } => "network",
            DataError::TableNotFound | DataError::MalformedRow { .. } => "parse",
            DataError::InvalidNumber { .. }
            | DataError::MissingRate { .. }
            | DataError::InvalidRate { .. } => "conversion",
            DataError::RateFile(_) | DataError::Io { .. } => "file",
        }
    }
}

/// Anything that can hand back the HTML of a page.
pub trait PageSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the page body as text.
    fn fetch(&self, url: &str) -> Result<String, DataError>;
}

/// A fixed page body. Used for offline runs and tests.
#[derive(Debug, Clone)]
pub struct StaticPage {
    html: String,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl PageSource for StaticPage {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, _url: &str) -> Result<String, DataError> {
        Ok(self.html.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_failure_class() {
        assert_eq!(DataError::TableNotFound.kind(), "parse");
        assert_eq!(
            DataError::HttpStatus {
                url: "u".into(),
                status: 404
            }
            .kind(),
            "network"
        );
        assert_eq!(
            DataError::MissingRate {
                currency: "INR".into()
            }
            .kind(),
            "conversion"
        );
    }

    #[test]
    fn static_page_ignores_url() {
        let page = StaticPage::new("<table></table>");
        assert_eq!(page.fetch("https://example.invalid").unwrap(), "<table></table>");
    }
}
