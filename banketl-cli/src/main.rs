//! BankETL CLI: run the largest-banks ETL job and query its store.
//!
//! Commands:
//! - `run` (default): fetch, transform, write CSV, load SQLite, print the
//!   three report queries
//! - `query`: print the report queries from an existing store without
//!   re-scraping

use anyhow::{bail, Context, Result};
use banketl_core::data::HttpSource;
use banketl_runner::{
    run_pipeline, run_standard_queries, EtlConfig, NamedQuery, PipelineObserver, ProgressLog,
    QueryResult, Store,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "banketl",
    version,
    about = "BankETL: scrape, convert and load the largest-banks table"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full ETL pipeline.
    Run {
        #[command(flatten)]
        overrides: Overrides,

        /// Source page URL.
        #[arg(long)]
        url: Option<String>,

        /// Exchange-rate CSV (Currency,Rate).
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Output CSV path.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Progress log path.
        #[arg(long)]
        log: Option<PathBuf>,

        /// Print query results as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run the report queries against an existing store.
    Query {
        #[command(flatten)]
        overrides: Overrides,

        /// Print query results as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Options shared by every command.
#[derive(Args, Default)]
struct Overrides {
    /// TOML config file. Fields not set there keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database file.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Table to replace / query.
    #[arg(long)]
    table: Option<String>,
}

impl Overrides {
    fn load(self) -> Result<EtlConfig> {
        let mut config = match &self.config {
            Some(path) => EtlConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EtlConfig::default(),
        };
        if let Some(db) = self.db {
            config.store_path = db;
        }
        if let Some(table) = self.table {
            config.table_name = table;
        }
        Ok(config)
    }
}

/// Prints each report query as soon as it has run.
struct StdoutReport {
    json: bool,
}

impl PipelineObserver for StdoutReport {
    fn on_query(&self, query: &NamedQuery, result: &QueryResult) {
        print_query(query, result, self.json);
    }
}

fn print_query(query: &NamedQuery, result: &QueryResult, json: bool) {
    if json {
        let value = serde_json::json!({
            "label": query.label,
            "sql": query.sql,
            "columns": result.columns,
            "rows": result.rows,
        });
        println!("{value}");
        return;
    }
    println!("=== {} ===", query.label);
    println!("{}", query.sql);
    print!("{result}");
    println!();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run {
        overrides: Overrides::default(),
        url: None,
        rates: None,
        csv: None,
        log: None,
        json: false,
    }) {
        Commands::Run {
            overrides,
            url,
            rates,
            csv,
            log,
            json,
        } => {
            let mut config = overrides.load()?;
            if let Some(url) = url {
                config.source_url = url;
            }
            if let Some(rates) = rates {
                config.rate_file_path = rates;
            }
            if let Some(csv) = csv {
                config.csv_output_path = csv;
            }
            if let Some(log) = log {
                config.log_path = log;
            }
            run_etl(&config, json)
        }
        Commands::Query { overrides, json } => run_query_cmd(&overrides.load()?, json),
    }
}

fn run_etl(config: &EtlConfig, json: bool) -> Result<()> {
    config.validate()?;
    debug!(?config, "resolved config");

    let source = HttpSource::new(config.http_timeout())?;
    let log = ProgressLog::new(&config.log_path);
    let report = run_pipeline(config, &source, &log, &StdoutReport { json })?;

    if !json {
        println!(
            "Loaded {} rows into {} ({}); CSV at {}",
            report.rows,
            report.table_name,
            report.store_path.display(),
            report.csv_path.display()
        );
    }
    Ok(())
}

fn run_query_cmd(config: &EtlConfig, json: bool) -> Result<()> {
    if !config.store_path.exists() {
        bail!(
            "store {} does not exist; run `banketl run` first",
            config.store_path.display()
        );
    }

    let store = Store::open(&config.store_path)?;
    if !store.table_exists(&config.table_name)? {
        bail!(
            "table '{}' not found in {}",
            config.table_name,
            config.store_path.display()
        );
    }

    run_standard_queries(&store, &config.table_name, &StdoutReport { json })?;
    store.close()?;
    Ok(())
}
