//! Serializable pipeline configuration.
//!
//! Every path, the source URL and the table name live here instead of in
//! module constants. `Default` reproduces the standard job; a TOML file may
//! override any subset of fields.

use banketl_core::data::ColumnMapping;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Archived snapshot of the Wikipedia "largest banks" list.
pub const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything one ETL run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Page holding the market-cap table.
    pub source_url: String,
    /// `Currency,Rate` CSV.
    pub rate_file_path: PathBuf,
    /// Destination of the transformed CSV (overwritten).
    pub csv_output_path: PathBuf,
    /// SQLite database file.
    pub store_path: PathBuf,
    /// Table replaced on every run.
    pub table_name: String,
    /// Append-only progress log.
    pub log_path: PathBuf,
    pub http_timeout_secs: u64,
    pub columns: ColumnMapping,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            rate_file_path: PathBuf::from("exchange_rate.csv"),
            csv_output_path: PathBuf::from("Largest_banks_data.csv"),
            store_path: PathBuf::from("Banks.db"),
            table_name: "Largest_banks".to_string(),
            log_path: PathBuf::from("code_log.txt"),
            http_timeout_secs: 30,
            columns: ColumnMapping::default(),
        }
    }
}

impl EtlConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source_url is empty".into()));
        }
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Invalid("table_name is empty".into()));
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http_timeout_secs must be at least 1".into(),
            ));
        }
        if self.columns.name_cell == self.columns.market_cap_cell {
            return Err(ConfigError::Invalid(
                "columns.name_cell and columns.market_cap_cell must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_job() {
        let config = EtlConfig::default();
        assert_eq!(config.table_name, "Largest_banks");
        assert_eq!(config.store_path, PathBuf::from("Banks.db"));
        assert_eq!(config.csv_output_path, PathBuf::from("Largest_banks_data.csv"));
        assert_eq!(config.columns, ColumnMapping::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = EtlConfig::from_toml(
            r#"
table_name = "Banks_2023"
store_path = "out/banks.db"

[columns]
market_cap_cell = 3
"#,
        )
        .unwrap();

        assert_eq!(config.table_name, "Banks_2023");
        assert_eq!(config.store_path, PathBuf::from("out/banks.db"));
        assert_eq!(config.columns.name_cell, 1);
        assert_eq!(config.columns.market_cap_cell, 3);
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn empty_table_name_is_rejected() {
        let err = EtlConfig::from_toml("table_name = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_http_timeout_is_rejected() {
        let err = EtlConfig::from_toml("http_timeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("http_timeout_secs")));

        let config = EtlConfig::from_toml("http_timeout_secs = 5").unwrap();
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn unparseable_toml_is_rejected() {
        let err = EtlConfig::from_toml("table_name = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = EtlConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(EtlConfig::from_toml(&text).unwrap(), config);
    }
}
