//! CLI argument parsing for exodata

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xd")]
#[command(author, version, about = "Inspect a reference exoplanet table", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the columns of a dataset
    Columns {
        /// Path to the CSV file
        #[arg(required = true)]
        dataset: PathBuf,
    },

    /// Show count, range and mean of a column
    Stats {
        /// Path to the CSV file
        #[arg(required = true)]
        dataset: PathBuf,

        /// Column name
        #[arg(required = true)]
        column: String,
    },

    /// Show the column values at a quantile band
    Quantile {
        /// Path to the CSV file
        #[arg(required = true)]
        dataset: PathBuf,

        /// Column name
        #[arg(required = true)]
        column: String,

        /// Lower quantile (0-1)
        #[arg(long, default_value = "0.0")]
        lo: f64,

        /// Upper quantile (0-1)
        #[arg(long, default_value = "1.0")]
        hi: f64,
    },
}
