//! BankETL Runner: load, query and orchestration.
//!
//! This crate builds on `banketl-core` to provide:
//! - Serializable run configuration with TOML loading
//! - CSV export of the transformed table
//! - SQLite replace-load and the fixed report queries
//! - Append-only progress log
//! - The linear pipeline tying the steps together

pub mod config;
pub mod export;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod store;

pub use config::{ConfigError, EtlConfig};
pub use export::{export_csv, import_csv, read_csv, write_csv, ExportError};
pub use pipeline::{
    run_pipeline, run_standard_queries, NoopObserver, PipelineError, PipelineFailure,
    PipelineObserver, PipelineReport, Stage,
};
pub use progress::ProgressLog;
pub use query::{Cell, NamedQuery, QueryResult, StandardQueries};
pub use store::{Store, StoreError};
