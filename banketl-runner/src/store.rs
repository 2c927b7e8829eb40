//! SQLite store: replace-load of the bank table and ad-hoc queries.
//!
//! Layout: one table per load, schema taken from `TransformedTable::COLUMNS`.
//! A load drops the table, recreates it and inserts every record inside one
//! transaction, so a failed load leaves the previous contents in place.

use std::fs;
use std::path::{Path, PathBuf};

use banketl_core::domain::{ColumnKind, TransformedTable};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::debug;

use crate::query::{quote_ident, Cell, QueryResult};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid table name '{0}'")]
    InvalidTableName(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Text => "TEXT",
        ColumnKind::Real => "REAL",
    }
}

fn validate_table_name(name: &str) -> Result<(), StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.to_ascii_lowercase().starts_with("sqlite_") {
        return Err(StoreError::InvalidTableName(name.to_string()));
    }
    Ok(())
}

/// `CREATE TABLE` statement for the bank table.
pub fn create_table_sql(table: &str) -> String {
    let columns: Vec<String> = TransformedTable::COLUMNS
        .iter()
        .map(|c| format!("{} {}", quote_ident(c.name), sql_type(c.kind)))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), columns.join(", "))
}

fn insert_sql(table: &str) -> String {
    let names: Vec<String> = TransformedTable::COLUMNS
        .iter()
        .map(|c| quote_ident(c.name))
        .collect();
    let placeholders = vec!["?"; names.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote_ident(table),
        names.join(", ")
    )
}

fn to_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(f) => Cell::Real(f),
        ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Cell::Text(format!("<blob {} bytes>", bytes.len())),
    }
}

/// Exclusively owned connection to the relational store.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (creating the file and its parent directories if needed) a
    /// file-backed store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: None,
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace `table` with the contents of `data`. Returns rows inserted.
    pub fn replace_table(&mut self, table: &str, data: &TransformedTable) -> Result<usize, StoreError> {
        validate_table_name(table)?;

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)), [])?;
        tx.execute(&create_table_sql(table), [])?;
        {
            let mut stmt = tx.prepare(&insert_sql(table))?;
            for r in &data.records {
                stmt.execute(params![
                    r.name,
                    r.mc_usd_billion,
                    r.mc_gbp_billion,
                    r.mc_eur_billion,
                    r.mc_inr_billion,
                ])?;
            }
        }
        tx.commit()?;

        debug!(table, rows = data.len(), "replaced table");
        Ok(data.len())
    }

    /// Whether `table` exists in the store.
    pub fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Execute `sql` and collect every row.
    pub fn run_query(&self, sql: &str) -> Result<QueryResult, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(to_cell))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(sql, rows = rows.len(), "query complete");
        Ok(QueryResult { columns, rows })
    }

    /// Close the connection, surfacing any error from SQLite.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}
