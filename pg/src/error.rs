//! Planet generation error types

use exodata::DatasetError;
use thiserror::Error;

/// Errors raised by the planet generation core
///
/// None of these are retried internally; callers decide how to surface them.
#[derive(Debug, Error)]
pub enum PlanetError {
    #[error("Feature extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Unknown size tag '{0}' (expected small, medium or large)")]
    UnknownSizeTag(String),

    #[error("Unknown temperature tag '{0}' (expected cold, temperate or hot)")]
    UnknownTemperatureTag(String),

    #[error("Unknown planet type tag '{0}' (expected rocky, gassy or icy)")]
    UnknownTypeTag(String),

    #[error("No dataset rows available for sampling column '{0}'")]
    EmptyDataset(String),

    #[error("Dataset error: {0}")]
    Dataset(DatasetError),

    #[error("No active conversation; start one first")]
    NoActiveConversation,

    #[error("Input text must not be empty")]
    EmptyInput,

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),
}

impl From<DatasetError> for PlanetError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::EmptyColumn(column) => PlanetError::EmptyDataset(column),
            other => PlanetError::Dataset(other),
        }
    }
}
