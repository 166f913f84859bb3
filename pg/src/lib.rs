//! planetgen - conversational planet generator
//!
//! Turns a free-text planet description into categorical feature tags, samples
//! physical parameters for those tags from a reference exoplanet table, and
//! renders an image-generation prompt that can be refined turn by turn.
//!
//! # Core Concepts
//!
//! - **One planet per conversation**: starting again replaces the planet
//! - **Sampled, not invented**: mass and period come from the dataset's quantile bands
//! - **Additive refinement**: later turns only append features, numbers stay fixed
//!
//! # Modules
//!
//! - [`features`] - description to tags via a language model
//! - [`physics`] - tag to parameter estimation
//! - [`describe`] - numeric parameters to qualitative bands
//! - [`prompts`] - image prompt templates and composition
//! - [`conversation`] - the start/continue/finalize state machine
//! - [`session`] - actor-owned store of concurrent conversations
//! - [`repl`] - interactive chat
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod conversation;
pub mod describe;
pub mod domain;
pub mod error;
pub mod features;
pub mod image;
pub mod llm;
pub mod physics;
pub mod prompts;
pub mod repl;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use conversation::{ConversationState, PlanetAssistant};
pub use describe::{DescriptiveBands, describe};
pub use domain::{FeatureTags, PlanetParameters, PlanetType, Size, Temperature};
pub use error::PlanetError;
pub use features::{Classifier, FixedClassifier, LlmClassifier};
pub use image::{ImageGenerator, ImageReference, OpenAIImageClient};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use physics::{Estimator, HabitableZone, MidpointSampler, RngSampler, UniformSampler};
pub use session::{SessionError, SessionManager, SessionOptions};
pub use transcript::{TranscriptEvent, TranscriptLogger};
