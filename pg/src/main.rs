//! planetgen - conversational planet generator
//!
//! CLI entry point: interactive chat, one-shot generation and offline estimates.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use exodata::{ExoplanetTable, ReferenceDataset};
use planetgen::cli::{Cli, Command, OutputFormat, get_log_path};
use planetgen::config::Config;
use planetgen::describe::{DescriptiveBands, describe};
use planetgen::domain::{FeatureTags, PlanetParameters, PlanetType, Size, Temperature};
use planetgen::features::{Classifier, FixedClassifier, LlmClassifier};
use planetgen::image::{ImageGenerator, ImageReference, OpenAIImageClient};
use planetgen::llm::{LlmClient, create_client};
use planetgen::physics::{Estimator, HabitableZone, SamplerSource};
use planetgen::prompts::PromptLoader;
use planetgen::repl::{self, format_parameters};
use planetgen::session::{SessionManager, SessionOptions};
use planetgen::transcript::TranscriptLogger;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // API keys may live in a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("planetgen loaded config: model={}", config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Chat { dataset, seed } => cmd_chat(&config, dataset, seed).await,
        Command::Generate {
            text,
            additions,
            image,
            narrate,
            dataset,
            seed,
            format,
        } => {
            let request = GenerateRequest {
                text,
                additions,
                image,
                narrate,
            };
            cmd_generate(&config, request, dataset, seed, format).await
        }
        Command::Estimate {
            size,
            temperature,
            planet_type,
            color,
            additions,
            dataset,
            seed,
            format,
        } => {
            let tags = build_tags(size, temperature, planet_type, color);
            cmd_estimate(&config, tags, additions, dataset, seed, format).await
        }
        Command::Zone { distance_au } => cmd_zone(distance_au),
    }
}

fn build_tags(size: Size, temperature: Temperature, planet_type: PlanetType, color: Option<String>) -> FeatureTags {
    FeatureTags::new(size, temperature, planet_type, color.unwrap_or_default())
}

fn load_dataset(config: &Config, override_path: Option<PathBuf>) -> Result<Arc<dyn ReferenceDataset>> {
    let path = override_path.unwrap_or_else(|| config.dataset.path.clone());
    debug!(?path, "load_dataset: called");
    let table = ExoplanetTable::from_csv_path(&path).context(format!("Failed to load dataset {}", path.display()))?;
    info!(rows = table.row_count(), path = %path.display(), "Loaded reference dataset");
    Ok(Arc::new(table))
}

fn session_options(config: &Config, seed: Option<u64>) -> Result<SessionOptions> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let transcript = config
        .transcript
        .enabled
        .then(|| TranscriptLogger::new(&config.transcript.dir));

    Ok(SessionOptions {
        estimator: Estimator::new(&config.dataset.mass_column, &config.dataset.period_column),
        samplers: SamplerSource::from_seed(seed.or(config.sampling.seed)),
        prompts: Arc::new(PromptLoader::new(cwd)),
        transcript,
    })
}

fn connect_llm(config: &Config) -> Result<Arc<dyn LlmClient>> {
    config.validate()?;
    create_client(&config.llm).context("Failed to create LLM client")
}

async fn cmd_chat(config: &Config, dataset: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    debug!(?dataset, ?seed, "cmd_chat: called");
    let llm = connect_llm(config)?;
    let options = session_options(config, seed)?;
    let classifier = LlmClassifier::with_loader(llm.clone(), &options.prompts)?;
    let images: Arc<dyn ImageGenerator> = Arc::new(OpenAIImageClient::from_config(&config.llm, &config.image)?);

    let manager = SessionManager::spawn(load_dataset(config, dataset)?, Arc::new(classifier), options);
    let result = repl::run_interactive(manager.clone(), Some(llm), Some(images)).await;
    manager.shutdown().await?;
    result
}

struct GenerateRequest {
    text: String,
    additions: Vec<String>,
    image: bool,
    narrate: bool,
}

/// Machine-readable result of generate/estimate
#[derive(Debug, Serialize)]
struct PlanetReport {
    parameters: PlanetParameters,
    bands: DescriptiveBands,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImageReference>,
}

async fn cmd_generate(
    config: &Config,
    request: GenerateRequest,
    dataset: Option<PathBuf>,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    debug!(text = %request.text, additions = request.additions.len(), "cmd_generate: called");
    let llm = connect_llm(config)?;
    let options = session_options(config, seed)?;
    let classifier = LlmClassifier::with_loader(llm.clone(), &options.prompts)?;
    let manager = SessionManager::spawn(load_dataset(config, dataset)?, Arc::new(classifier), options);

    let id = manager.create_session().await?;
    manager.start(&id, &request.text).await?;
    let parameters = add_features(&manager, &id, &request.additions).await?;

    let prompt = if request.narrate {
        manager.narrate(&id, llm.as_ref()).await?
    } else {
        manager.finalize(&id).await?
    };

    let image = if request.image {
        let images = OpenAIImageClient::from_config(&config.llm, &config.image)?;
        let image = images.generate(&prompt).await.context("Image generation failed")?;
        manager.record_image(&id, &prompt, &image);
        Some(image)
    } else {
        None
    };

    manager.shutdown().await?;
    print_report(
        PlanetReport {
            bands: describe(&parameters),
            parameters,
            prompt,
            image,
        },
        format,
    )
}

async fn cmd_estimate(
    config: &Config,
    tags: FeatureTags,
    additions: Vec<String>,
    dataset: Option<PathBuf>,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    debug!(?tags, "cmd_estimate: called");
    let classifier: Arc<dyn Classifier> = Arc::new(FixedClassifier::new(tags.clone()));
    let manager = SessionManager::spawn(load_dataset(config, dataset)?, classifier, session_options(config, seed)?);

    let id = manager.create_session().await?;
    manager.start_with_tags(&id, tags).await?;
    let parameters = add_features(&manager, &id, &additions).await?;
    let prompt = manager.finalize(&id).await?;
    manager.shutdown().await?;

    print_report(
        PlanetReport {
            bands: describe(&parameters),
            parameters,
            prompt,
            image: None,
        },
        format,
    )
}

/// Apply every addition in order and return the resulting parameters
async fn add_features(manager: &SessionManager, id: &str, additions: &[String]) -> Result<PlanetParameters> {
    for addition in additions {
        manager.continue_session(id, addition).await?;
    }
    manager
        .parameters(id)
        .await?
        .ok_or_else(|| eyre::eyre!("session {} has no planet", id))
}

fn print_report(report: PlanetReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{}", format_parameters(&report.parameters));
            println!();
            println!("{}", "Prompt:".bright_cyan());
            println!("{}", report.prompt);
            if let Some(image) = &report.image {
                println!();
                println!("{} {}", "Image:".bright_green(), image.url);
            }
        }
    }
    Ok(())
}

fn cmd_zone(distance_au: f64) -> Result<()> {
    debug!(%distance_au, "cmd_zone: called");
    let zone = HabitableZone::solar();
    let verdict = if zone.contains(distance_au) {
        "habitable".bright_green()
    } else {
        "not habitable".red()
    };
    println!(
        "{} AU is {} (zone: {:.3} - {:.3} AU)",
        distance_au, verdict, zone.inner_edge, zone.outer_edge
    );
    Ok(())
}
