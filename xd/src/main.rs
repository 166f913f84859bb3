use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use exodata::cli::{Cli, Command};
use exodata::{ExoplanetTable, QuantileBand, ReferenceDataset};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn load(dataset: &std::path::Path) -> Result<ExoplanetTable> {
    ExoplanetTable::from_csv_path(dataset).context(format!("Failed to load dataset {}", dataset.display()))
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    info!("exodata starting");

    match cli.command {
        Command::Columns { dataset } => {
            let table = load(&dataset)?;
            println!("{} rows", table.row_count().to_string().cyan());
            for name in table.column_names() {
                println!("  {}", name);
            }
        }
        Command::Stats { dataset, column } => {
            let table = load(&dataset)?;
            let stats = table.summary(&column)?;
            println!("Column: {}", stats.column.cyan());
            println!("  Count: {}", stats.count);
            println!("  Missing: {}", stats.missing);
            println!("  Min: {:.4}", stats.min);
            println!("  Max: {:.4}", stats.max);
            println!("  Mean: {:.4}", stats.mean);
        }
        Command::Quantile { dataset, column, lo, hi } => {
            let table = load(&dataset)?;
            let band = QuantileBand::new(lo, hi)?;
            let (low, high) = table.quantile_range(&column, band)?;
            println!(
                "{} [{}, {}] = [{}, {}]",
                column.yellow(),
                lo,
                hi,
                format!("{:.4}", low).green(),
                format!("{:.4}", high).green()
            );
        }
    }

    Ok(())
}
