//! Query results and the fixed report queries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One value in a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(i) => Some(*i as f64),
            Cell::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NULL"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Real(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Tabular result of one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First cell of the first row, for single-value aggregates.
    pub fn scalar(&self) -> Option<&Cell> {
        self.rows.first().and_then(|r| r.first())
    }

    /// All values of the named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }
}

impl fmt::Display for QueryResult {
    /// Aligned text table with a leading row index; text left-aligned,
    /// numbers right-aligned.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "(no columns)");
        }

        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();

        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                rendered
                    .iter()
                    .filter_map(|r| r.get(i).map(|s| s.chars().count()))
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, w) in self.columns.iter().zip(widths.iter().copied()) {
            write!(f, "  {name:>w$}")?;
        }
        writeln!(f)?;

        for (i, (row, cells)) in rendered.iter().zip(&self.rows).enumerate() {
            write!(f, "{i:<index_width$}")?;
            for ((text, cell), w) in row.iter().zip(cells).zip(widths.iter().copied()) {
                match cell {
                    Cell::Text(_) => write!(f, "  {text:<w$}")?,
                    _ => write!(f, "  {text:>w$}")?,
                }
            }
            writeln!(f)?;
        }

        if self.rows.is_empty() {
            writeln!(f, "(0 rows)")?;
        }
        Ok(())
    }
}

/// A SQL statement with the label printed above its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedQuery {
    pub label: String,
    pub sql: String,
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// The three report queries run after every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardQueries {
    pub all_banks: NamedQuery,
    pub average_gbp: NamedQuery,
    pub top_5_banks: NamedQuery,
}

impl StandardQueries {
    pub fn for_table(table: &str) -> Self {
        let t = quote_ident(table);
        Self {
            all_banks: NamedQuery {
                label: "All banks".into(),
                sql: format!("SELECT * FROM {t}"),
            },
            average_gbp: NamedQuery {
                label: "Average market cap (GBP billion)".into(),
                sql: format!("SELECT AVG(MC_GBP_Billion) FROM {t}"),
            },
            // rowid order is insertion order for a freshly loaded table.
            top_5_banks: NamedQuery {
                label: "Top 5 banks".into(),
                sql: format!("SELECT Name FROM {t} ORDER BY rowid LIMIT 5"),
            },
        }
    }

    /// Queries in report order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedQuery> {
        [&self.all_banks, &self.average_gbp, &self.top_5_banks].into_iter()
    }
}
