//! Page fetching, table extraction and rate-file loading.

pub mod extract;
pub mod http;
pub mod rates;
pub mod source;

pub use extract::{extract_table, ColumnMapping};
pub use http::HttpSource;
pub use source::{DataError, PageSource, StaticPage};
