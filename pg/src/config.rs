//! planetgen configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main planetgen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language model used for feature extraction and narrated prompts
    pub llm: LlmConfig,

    /// Image generation settings
    pub image: ImageConfig,

    /// Reference dataset location and columns
    pub dataset: DatasetConfig,

    /// Randomness settings
    pub sampling: SamplingConfig,

    /// Conversation transcript logging
    pub transcript: TranscriptConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before any model call
    ///
    /// Checks that the API key environment variable is set.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: .planetgen.yml
        let local_config = PathBuf::from(".planetgen.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/planetgen/planetgen.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("planetgen").join("planetgen.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; the full load reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".planetgen.yml")];
                if let Some(config_dir) = dirs::config_dir() {
                    paths.push(config_dir.join("planetgen").join("planetgen.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Config>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Language model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (only "openai" is supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Retries for transient HTTP failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 1024,
            timeout_ms: 60_000,
            max_retries: 3,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).context(format!("Environment variable {} is not set", self.api_key_env))
    }
}

/// Image generation configuration
///
/// Shares the API key and base URL of [`LlmConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Image model identifier
    pub model: String,

    /// Output size, e.g. "1024x1024"
    pub size: String,

    /// Rendering quality ("standard" or "hd")
    pub quality: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            timeout_ms: 120_000,
        }
    }
}

/// Reference dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV file with the exoplanet table
    pub path: PathBuf,

    /// Mass column (Earth masses)
    #[serde(rename = "mass-column")]
    pub mass_column: String,

    /// Orbital period column (days)
    #[serde(rename = "period-column")]
    pub period_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Data/merged.csv"),
            mass_column: exodata::MASS_COLUMN.to_string(),
            period_column: exodata::PERIOD_COLUMN.to_string(),
        }
    }
}

/// Sampling configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Fixed seed for reproducible parameters; entropy when unset
    pub seed: Option<u64>,
}

/// Transcript logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Write conversation transcripts
    pub enabled: bool,

    /// Directory for per-conversation JSONL files
    pub dir: PathBuf,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        // XDG data directory (~/.local/share/planetgen on Linux)
        let dir = dirs::data_local_dir()
            .map(|d| d.join("planetgen").join("transcripts"))
            .unwrap_or_else(|| PathBuf::from(".planetgen/transcripts"));

        Self { enabled: false, dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.image.model, "dall-e-3");
        assert_eq!(config.dataset.mass_column, "pl_bmasse");
        assert_eq!(config.dataset.period_column, "pl_orbper");
        assert!(config.sampling.seed.is_none());
        assert!(!config.transcript.enabled);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  model: gpt-4o
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-retries: 1

image:
  size: 1792x1024
  quality: hd

dataset:
  path: /data/exoplanets.csv
  mass-column: mass
  period-column: period

sampling:
  seed: 42

transcript:
  enabled: true
  dir: /tmp/transcripts

log-level: DEBUG
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_retries, 1);
        assert_eq!(config.image.size, "1792x1024");
        assert_eq!(config.image.quality, "hd");
        assert_eq!(config.dataset.path, PathBuf::from("/data/exoplanets.csv"));
        assert_eq!(config.dataset.mass_column, "mass");
        assert_eq!(config.sampling.seed, Some(42));
        assert!(config.transcript.enabled);
        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gpt-4.1-mini
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "gpt-4.1-mini");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.image.model, "dall-e-3");
        assert_eq!(config.dataset.path, PathBuf::from("Data/merged.csv"));
    }

    #[test]
    fn test_load_explicit_path_and_log_level() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log-level: WARN\nsampling:\n  seed: 7").unwrap();
        let path = file.path().to_path_buf();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.sampling.seed, Some(7));
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("WARN"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/planetgen.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_validate_reports_missing_key_variable() {
        let mut config = Config::default();
        config.llm.api_key_env = "PLANETGEN_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PLANETGEN_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
