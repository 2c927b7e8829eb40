//! ETL orchestrator: one strict linear pass.
//!
//! Fetch → Extract → Transform → WriteCsv → Connect → Load → Query×3 → Close.
//! No retries, no branching. The first failing stage stops the run; one
//! terminal entry naming the stage goes to the progress log before the error
//! is returned.

use std::fmt;
use std::path::PathBuf;

use banketl_core::data::{extract_table, DataError, PageSource};
use banketl_core::domain::ExchangeRates;
use banketl_core::transform;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::config::EtlConfig;
use crate::export::{write_csv, ExportError};
use crate::progress::ProgressLog;
use crate::query::{NamedQuery, QueryResult, StandardQueries};
use crate::store::{Store, StoreError};

/// Step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetch,
    Extract,
    Transform,
    WriteCsv,
    Connect,
    Load,
    Query,
    Close,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Extract => "extract",
            Stage::Transform => "transform",
            Stage::WriteCsv => "write_csv",
            Stage::Connect => "connect",
            Stage::Load => "load",
            Stage::Query => "query",
            Stage::Close => "close",
        };
        f.write_str(name)
    }
}

/// Underlying cause of a failed run.
#[derive(Debug, Error)]
pub enum PipelineFailure {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A run that stopped at `stage`.
#[derive(Debug, Error)]
#[error("ETL process failed at {stage}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub failure: PipelineFailure,
}

impl PipelineError {
    /// Failure class: network, parse, conversion, file or store.
    pub fn kind(&self) -> &'static str {
        match &self.failure {
            PipelineFailure::Data(e) => e.kind(),
            PipelineFailure::Export(_) => "file",
            PipelineFailure::Store(_) => "store",
        }
    }
}

fn at<E: Into<PipelineFailure>>(stage: Stage) -> impl FnOnce(E) -> PipelineError {
    move |e| PipelineError {
        stage,
        failure: e.into(),
    }
}

/// Callbacks for reporting while the pipeline runs.
pub trait PipelineObserver {
    /// Called when a stage starts.
    fn on_stage(&self, _stage: Stage) {}

    /// Called once per report query, in order, while the store is open.
    fn on_query(&self, _query: &NamedQuery, _result: &QueryResult) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// What a successful run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub rows: usize,
    pub csv_path: PathBuf,
    pub store_path: PathBuf,
    pub table_name: String,
    pub queries: Vec<(NamedQuery, QueryResult)>,
}

/// Run the full ETL job described by `config`.
pub fn run_pipeline(
    config: &EtlConfig,
    source: &dyn PageSource,
    log: &ProgressLog,
    observer: &dyn PipelineObserver,
) -> Result<PipelineReport, PipelineError> {
    log.log("Preliminaries complete. Initiating ETL process");

    let result = execute(config, source, log, observer);
    if let Err(e) = &result {
        error!(stage = %e.stage, kind = e.kind(), error = %e.failure, "pipeline failed");
        log.log(&format!("ETL process failed at {}: {}", e.stage, e.failure));
    }
    result
}

fn execute(
    config: &EtlConfig,
    source: &dyn PageSource,
    log: &ProgressLog,
    observer: &dyn PipelineObserver,
) -> Result<PipelineReport, PipelineError> {
    observer.on_stage(Stage::Fetch);
    info!(source = source.name(), url = %config.source_url, "fetching source page");
    let html = source.fetch(&config.source_url).map_err(at(Stage::Fetch))?;

    observer.on_stage(Stage::Extract);
    let extracted = extract_table(&html, &config.columns).map_err(at(Stage::Extract))?;
    info!(rows = extracted.len(), "extraction complete");
    log.log("Data extraction complete. Initiating Transformation process");

    observer.on_stage(Stage::Transform);
    let rates = ExchangeRates::from_path(&config.rate_file_path).map_err(at(Stage::Transform))?;
    let table = transform(&extracted, &rates).map_err(at(Stage::Transform))?;
    log.log("Data transformation complete. Initiating Loading process");

    observer.on_stage(Stage::WriteCsv);
    write_csv(&table, &config.csv_output_path).map_err(at(Stage::WriteCsv))?;
    log.log("Data saved to CSV file");

    observer.on_stage(Stage::Connect);
    let mut store = Store::open(&config.store_path).map_err(at(Stage::Connect))?;
    log.log("SQL Connection initiated");

    observer.on_stage(Stage::Load);
    let rows = store
        .replace_table(&config.table_name, &table)
        .map_err(at(Stage::Load))?;
    info!(rows, table = %config.table_name, "table loaded");
    log.log("Data loaded to Database as a table, Executing queries");

    observer.on_stage(Stage::Query);
    let queries = run_standard_queries(&store, &config.table_name, observer)
        .map_err(at(Stage::Query))?;
    log.log("Process Complete");

    observer.on_stage(Stage::Close);
    store.close().map_err(at(Stage::Close))?;
    log.log("Server Connection closed");

    Ok(PipelineReport {
        rows,
        csv_path: config.csv_output_path.clone(),
        store_path: config.store_path.clone(),
        table_name: config.table_name.clone(),
        queries,
    })
}

/// Run the three report queries against `table`, notifying `observer` after each.
pub fn run_standard_queries(
    store: &Store,
    table: &str,
    observer: &dyn PipelineObserver,
) -> Result<Vec<(NamedQuery, QueryResult)>, StoreError> {
    let queries = StandardQueries::for_table(table);
    let mut out = Vec::with_capacity(3);
    for query in queries.iter() {
        let result = store.run_query(&query.sql)?;
        observer.on_query(query, &result);
        out.push((query.clone(), result));
    }
    Ok(out)
}
