//! ExoData - reference exoplanet table
//!
//! Loads a table of known exoplanets (NASA Exoplanet Archive style CSV) and
//! answers quantile queries over its numeric columns.
//!
//! # Example
//!
//! ```ignore
//! use exodata::{ExoplanetTable, QuantileBand, ReferenceDataset, MASS_COLUMN};
//!
//! let table = ExoplanetTable::from_csv_path("Data/merged.csv")?;
//! let (lo, hi) = table.quantile_range(MASS_COLUMN, QuantileBand::new(0.75, 1.0)?)?;
//! ```

pub mod cli;
mod table;

pub use table::{ColumnSummary, DatasetError, ExoplanetTable, QuantileBand, ReferenceDataset, quantile};

/// Planet mass column (Earth masses)
pub const MASS_COLUMN: &str = "pl_bmasse";

/// Orbital period column (days)
pub const PERIOD_COLUMN: &str = "pl_orbper";
