//! In-memory histogram tables.
//!
//! A [`TableSource`] holds scraped histogram tables and answers
//! [`HistogramSource`] queries against them. Tables are usually loaded from
//! TOML:
//!
//! ```toml
//! [[histogram]]
//! name = "Media.HLS.PlaybackError"
//! header = ["Group", "Total", "Stalled", "DecodeError"]
//! rows = [
//!     ["Control_20250131", "902", "700", "202"],
//!     ["Enabled_20250131", "800", "650", "150"],
//! ]
//! ```
//!
//! The first header cell labels the row column and the second labels the
//! row total; the remaining cells are the breakdown columns. Counts may
//! carry thousands separators (`12,500` or `12_500`).

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use histoflow_core::histogram::{HistogramSource, NOT_FOUND, TOTAL_COLUMN};

/// Errors raised while loading histogram tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read histogram tables: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(
        "Histogram `{histogram}` header needs a row label and a total label, found {found} cells"
    )]
    Header { histogram: String, found: usize },

    #[error("Histogram `{histogram}` row `{row}` has {found} counts, expected {expected}")]
    RowWidth {
        histogram: String,
        row: String,
        found: usize,
        expected: usize,
    },

    #[error("Histogram `{histogram}` row `{row}`: `{cell}` is not a count")]
    InvalidCount {
        histogram: String,
        row: String,
        cell: String,
    },
}

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default, rename = "histogram")]
    histograms: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    name: String,
    header: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableRow {
    total: i64,
    counts: Vec<i64>,
}

/// Why a lookup produced no count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Miss {
    Row,
    Column,
}

/// One histogram: breakdown columns and counts keyed by row label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramTable {
    name: String,
    columns: Vec<String>,
    rows: IndexMap<String, TableRow>,
}

impl HistogramTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: IndexMap::new(),
        }
    }

    /// Adds or replaces a row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RowWidth`] if `counts` does not have one entry
    /// per breakdown column.
    pub fn with_row(
        mut self,
        row: impl Into<String>,
        total: i64,
        counts: Vec<i64>,
    ) -> Result<Self, TableError> {
        let row = row.into();
        if counts.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                histogram: self.name,
                row,
                found: counts.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.insert(row, TableRow { total, counts });
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Breakdown column labels in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels in table order.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Returns the count at `row` x `column`.
    ///
    /// An explicit `Total` column wins over the row total field, which only
    /// answers `Total` when the header has no such column.
    pub fn count(&self, row: &str, column: &str) -> Option<i64> {
        self.resolve(row, column).ok()
    }

    fn resolve(&self, row: &str, column: &str) -> Result<i64, Miss> {
        let row = self.rows.get(row).ok_or(Miss::Row)?;
        if let Some(index) = self.columns.iter().position(|c| c == column) {
            return Ok(row.counts[index]);
        }
        if column == TOTAL_COLUMN {
            return Ok(row.total);
        }
        Err(Miss::Column)
    }

    fn from_raw(raw: RawTable) -> Result<Self, TableError> {
        let RawTable { name, header, rows } = raw;
        if header.len() < 2 {
            return Err(TableError::Header {
                histogram: name,
                found: header.len(),
            });
        }

        let columns = header[2..].to_vec();
        let mut table = Self::new(name, columns);
        for cells in rows {
            let Some((label, values)) = cells.split_first() else {
                continue;
            };
            let counts = values
                .iter()
                .map(|cell| {
                    parse_count(cell).ok_or_else(|| TableError::InvalidCount {
                        histogram: table.name.clone(),
                        row: label.clone(),
                        cell: cell.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let Some((&total, breakdown)) = counts.split_first() else {
                return Err(TableError::RowWidth {
                    histogram: table.name,
                    row: label.clone(),
                    found: 0,
                    expected: header.len() - 2,
                });
            };
            table = table.with_row(label.clone(), total, breakdown.to_vec())?;
        }
        Ok(table)
    }
}

/// Parses a scraped count, ignoring thousands separators and whitespace.
fn parse_count(cell: &str) -> Option<i64> {
    let digits: String = cell
        .chars()
        .filter(|c| !matches!(c, ',' | '_') && !c.is_whitespace())
        .collect();
    digits.parse().ok()
}

/// A [`HistogramSource`] over tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct TableSource {
    tables: IndexMap<String, HistogramTable>,
}

impl TableSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `[[histogram]]` table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] for malformed TOML, short headers, ragged
    /// rows or cells that are not counts.
    pub fn from_toml_str(source: &str) -> Result<Self, TableError> {
        let file: TableFile = toml::from_str(source)?;
        let mut tables = Self::new();
        for raw in file.histograms {
            tables.insert(HistogramTable::from_raw(raw)?);
        }
        debug!(tables = tables.len(); "Loaded histogram tables");
        Ok(tables)
    }

    /// Adds a table, replacing any table with the same name.
    pub fn insert(&mut self, table: HistogramTable) {
        if self.tables.contains_key(table.name()) {
            debug!(histogram = table.name(); "Replacing histogram table");
        }
        self.tables.insert(table.name().to_string(), table);
    }

    /// Moves every table of `other` into this source. Later tables win.
    pub fn merge(&mut self, other: TableSource) {
        for (_, table) in other.tables {
            self.insert(table);
        }
    }

    pub fn get(&self, histogram: &str) -> Option<&HistogramTable> {
        self.tables.get(histogram)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl HistogramSource for TableSource {
    fn columns(&self, histogram: &str) -> Vec<String> {
        self.get(histogram)
            .map(|table| table.columns().to_vec())
            .unwrap_or_default()
    }

    fn lookup(&self, histogram: &str, row: &str, column: &str) -> i64 {
        let Some(table) = self.get(histogram) else {
            debug!(histogram; "Unknown histogram");
            return NOT_FOUND;
        };

        match table.resolve(row, column) {
            Ok(count) => count,
            Err(Miss::Row) => {
                debug!(histogram, row; "Row not present in histogram");
                NOT_FOUND
            }
            Err(Miss::Column) => {
                warn!(histogram, column; "Unknown histogram column");
                NOT_FOUND
            }
        }
    }
}
