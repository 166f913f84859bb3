//! CLI argument parsing for pg

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::domain::{PlanetType, Size, Temperature};

#[derive(Parser, Debug)]
#[command(
    name = "pg",
    about = "Describe a planet in plain words, get exoplanet parameters and an image prompt",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true, help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Design a planet interactively
    Chat {
        /// Reference dataset CSV (overrides config)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Seed for reproducible parameters (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Classify a description and print the image prompt
    Generate {
        /// Planet description
        #[arg(required = true)]
        text: String,

        /// Extra feature to include (repeatable)
        #[arg(short = 'a', long = "add")]
        additions: Vec<String>,

        /// Also generate an image
        #[arg(long)]
        image: bool,

        /// Have the model write the prompt instead of the template
        #[arg(long)]
        narrate: bool,

        /// Reference dataset CSV (overrides config)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Seed for reproducible parameters (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Estimate parameters from explicit tags, without a language model
    Estimate {
        /// Planet size (small, medium, large)
        #[arg(long)]
        size: Size,

        /// Surface temperature (cold, temperate, hot)
        #[arg(long, default_value = "temperate")]
        temperature: Temperature,

        /// Planet type (rocky, gassy, icy)
        #[arg(long = "type")]
        planet_type: PlanetType,

        /// Planet color
        #[arg(long)]
        color: Option<String>,

        /// Extra feature to include (repeatable)
        #[arg(short = 'a', long = "add")]
        additions: Vec<String>,

        /// Reference dataset CSV (overrides config)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Seed for reproducible parameters (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check whether an orbital distance lies in the Sun's habitable zone
    Zone {
        /// Orbital distance in AU
        #[arg(required = true)]
        distance_au: f64,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planetgen")
        .join("logs")
        .join("planetgen.log")
}

/// Output format for generate/estimate
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_with_additions() {
        let cli = Cli::parse_from([
            "pg",
            "generate",
            "a big blue ice world",
            "-a",
            "rings",
            "--add",
            "two moons",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Generate {
                text,
                additions,
                image,
                narrate,
                format,
                ..
            } => {
                assert_eq!(text, "a big blue ice world");
                assert_eq!(additions, vec!["rings", "two moons"]);
                assert!(!image);
                assert!(!narrate);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_estimate_tags() {
        let cli = Cli::parse_from([
            "pg", "estimate", "--size", "Large", "--type", "icy", "--color", "blue", "--seed", "7",
        ]);
        match cli.command {
            Command::Estimate {
                size,
                temperature,
                planet_type,
                color,
                seed,
                format,
                ..
            } => {
                assert_eq!(size, Size::Large);
                assert_eq!(temperature, Temperature::Temperate);
                assert_eq!(planet_type, PlanetType::Icy);
                assert_eq!(color.as_deref(), Some("blue"));
                assert_eq!(seed, Some(7));
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_estimate_rejects_unknown_size() {
        let result = Cli::try_parse_from(["pg", "estimate", "--size", "huge", "--type", "icy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pg", "zone", "1.0", "-l", "debug", "--config", "x.yml"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
        assert!(matches!(cli.command, Command::Zone { distance_au } if distance_au == 1.0));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }
}
