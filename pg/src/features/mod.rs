//! Feature extraction: free text to categorical planet tags

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::{FeatureTags, PlanetType, RawFeatureTags, Size, Temperature};
use crate::error::PlanetError;
use crate::llm::{CompletionRequest, LlmClient, ResponseFormat};
use crate::prompts::{PromptLoader, embedded};

/// Name of the structured-output schema sent with every classification
pub const SCHEMA_NAME: &str = "planet_features_response";

const CLASSIFY_MAX_TOKENS: u32 = 200;

/// Turns a free-text planet description into [`FeatureTags`]
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<FeatureTags, PlanetError>;
}

/// JSON schema constraining the classifier's reply
pub fn feature_schema() -> serde_json::Value {
    fn names<T: Copy>(all: &[T], as_str: fn(&T) -> &'static str) -> Vec<&'static str> {
        all.iter().map(as_str).collect()
    }

    serde_json::json!({
        "type": "object",
        "properties": {
            "planet_size": {"type": "string", "enum": names(&Size::ALL, Size::as_str)},
            "temperature": {"type": "string", "enum": names(&Temperature::ALL, Temperature::as_str)},
            "type": {"type": "string", "enum": names(&PlanetType::ALL, PlanetType::as_str)},
            "color": {"type": "string"}
        },
        "required": ["planet_size", "temperature", "type", "color"],
        "additionalProperties": false
    })
}

/// Parse the model's JSON reply into validated tags
pub fn parse_features(content: &str) -> Result<FeatureTags, PlanetError> {
    let raw: RawFeatureTags = serde_json::from_str(content.trim())
        .map_err(|e| PlanetError::ExtractionFailed(format!("malformed classifier output: {}", e)))?;
    FeatureTags::try_from(raw)
}

/// Classifier backed by a hosted model with structured output
pub struct LlmClassifier {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl LlmClassifier {
    /// Classifier using the built-in `classify` prompt
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: embedded::CLASSIFY.trim().to_string(),
        }
    }

    /// Classifier using the `classify` prompt resolved through `loader`
    pub fn with_loader(llm: Arc<dyn LlmClient>, loader: &PromptLoader) -> Result<Self, PlanetError> {
        let system_prompt = loader
            .render("classify", &serde_json::json!({}))
            .map_err(|e| PlanetError::Prompt(e.to_string()))?;
        Ok(Self { llm, system_prompt })
    }

    fn request(&self, text: &str) -> CompletionRequest {
        CompletionRequest::single(&self.system_prompt, text, CLASSIFY_MAX_TOKENS).with_response_format(
            ResponseFormat::JsonSchema {
                name: SCHEMA_NAME.to_string(),
                strict: true,
                schema: feature_schema(),
            },
        )
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> Result<FeatureTags, PlanetError> {
        debug!(text_len = text.len(), "LlmClassifier::classify: called");
        if text.trim().is_empty() {
            return Err(PlanetError::EmptyInput);
        }

        let response = self.llm.complete(self.request(text)).await.map_err(|e| {
            warn!(error = %e, "LlmClassifier::classify: model call failed");
            PlanetError::ExtractionFailed(e.to_string())
        })?;
        debug!(tokens = response.usage.total(), stop_reason = ?response.stop_reason, "LlmClassifier::classify: model replied");

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| PlanetError::ExtractionFailed("empty classifier response".to_string()))?;

        let tags = parse_features(&content)?;
        info!(size = %tags.size, temperature = %tags.temperature, planet_type = %tags.planet_type, color = %tags.color, "Classified planet description");
        Ok(tags)
    }
}

/// Classifier that always returns the same tags
///
/// Used by the offline `estimate` command and in tests.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    tags: FeatureTags,
}

impl FixedClassifier {
    pub fn new(tags: FeatureTags) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, text: &str) -> Result<FeatureTags, PlanetError> {
        if text.trim().is_empty() {
            return Err(PlanetError::EmptyInput);
        }
        Ok(self.tags.clone())
    }
}
