//! Core ExoplanetTable implementation

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

/// Errors from dataset loading and queries
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column '{0}' has no usable rows")]
    EmptyColumn(String),

    #[error("Invalid quantile band [{lo}, {hi}]")]
    InvalidBand { lo: f64, hi: f64 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fractional [lo, hi] range of a column's distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileBand {
    pub lo: f64,
    pub hi: f64,
}

impl QuantileBand {
    /// Create a band, requiring 0 <= lo <= hi <= 1
    pub fn new(lo: f64, hi: f64) -> Result<Self, DatasetError> {
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(DatasetError::InvalidBand { lo, hi });
        }
        Ok(Self { lo, hi })
    }
}

/// Tabular source answering quantile queries over named numeric columns
pub trait ReferenceDataset: Send + Sync {
    /// Column values at the band's lower and upper quantile
    fn quantile_range(&self, column: &str, band: QuantileBand) -> Result<(f64, f64), DatasetError>;
}

/// Basic statistics for one column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// In-memory table of numeric columns; missing cells are stored as NaN
#[derive(Debug, Clone, Default)]
pub struct ExoplanetTable {
    columns: BTreeMap<String, Vec<f64>>,
    rows: usize,
}

impl ExoplanetTable {
    /// Load a table from a CSV file
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        debug!("from_csv_path: path={}", path.display());
        let file = File::open(path)?;
        let table = Self::from_csv_reader(file)?;
        info!(
            "Loaded {} rows, {} columns from {}",
            table.rows,
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load a table from any CSV source with a header row
    ///
    /// Lines starting with `#` are skipped (archive exports prefix their
    /// column documentation that way). Cells that are empty or not finite
    /// numbers become NaN.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        debug!("from_csv_reader: headers={:?}", headers);

        let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        let mut rows = 0;

        for record in rdr.records() {
            let record = record?;
            for (idx, column) in values.iter_mut().enumerate() {
                column.push(record.get(idx).map(parse_cell).unwrap_or(f64::NAN));
            }
            rows += 1;
        }

        Ok(Self {
            columns: headers.into_iter().zip(values).collect(),
            rows,
        })
    }

    /// Build a table from in-memory columns
    ///
    /// Shorter columns are padded with NaN so every column has the same length.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut columns: BTreeMap<String, Vec<f64>> = columns.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let rows = columns.values().map(Vec::len).max().unwrap_or(0);
        for column in columns.values_mut() {
            column.resize(rows, f64::NAN);
        }
        Self { columns, rows }
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Column names in sorted order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Raw values of a column, NaN for missing cells
    pub fn column(&self, name: &str) -> Result<&[f64], DatasetError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| DatasetError::UnknownColumn(name.to_string()))
    }

    /// Count, range and mean of a column's usable values
    pub fn summary(&self, name: &str) -> Result<ColumnSummary, DatasetError> {
        let values = self.column(name)?;
        let usable: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if usable.is_empty() {
            return Err(DatasetError::EmptyColumn(name.to_string()));
        }

        let min = usable.iter().copied().fold(f64::INFINITY, f64::min);
        let max = usable.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = usable.iter().sum::<f64>() / usable.len() as f64;

        Ok(ColumnSummary {
            column: name.to_string(),
            count: usable.len(),
            missing: values.len() - usable.len(),
            min,
            max,
            mean,
        })
    }

    fn sorted_usable(&self, name: &str) -> Result<Vec<f64>, DatasetError> {
        let mut usable: Vec<f64> = self.column(name)?.iter().copied().filter(|v| v.is_finite()).collect();
        if usable.is_empty() {
            return Err(DatasetError::EmptyColumn(name.to_string()));
        }
        usable.sort_by(f64::total_cmp);
        Ok(usable)
    }
}

impl ReferenceDataset for ExoplanetTable {
    fn quantile_range(&self, column: &str, band: QuantileBand) -> Result<(f64, f64), DatasetError> {
        debug!("quantile_range: column={} band=[{}, {}]", column, band.lo, band.hi);
        let sorted = self.sorted_usable(column)?;
        Ok((interpolate(&sorted, band.lo), interpolate(&sorted, band.hi)))
    }
}

/// Quantile `q` of the finite values in `values`, linear between closest ranks
///
/// Returns `None` when there are no finite values.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    Some(interpolate(&sorted, q.clamp(0.0, 1.0)))
}

// `sorted` must be non-empty and ascending.
fn interpolate(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

fn parse_cell(cell: &str) -> f64 {
    cell.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(f64::NAN)
}
