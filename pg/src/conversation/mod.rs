//! Conversation state machine
//!
//! A [`PlanetAssistant`] holds at most one planet at a time. Starting a
//! conversation classifies the user's text and samples fresh parameters;
//! continuing only appends requested features; finalizing renders the image
//! prompt from whatever is current.

use std::sync::Arc;

use exodata::ReferenceDataset;
use serde::Serialize;
use tracing::{debug, info};

use crate::describe::{DescriptiveBands, describe};
use crate::domain::{FeatureTags, PlanetParameters};
use crate::error::PlanetError;
use crate::features::Classifier;
use crate::llm::{CompletionRequest, LlmClient};
use crate::physics::{Estimator, UniformSampler};
use crate::prompts::{ImagePromptContext, PromptLoader};

const NARRATE_MAX_TOKENS: u32 = 400;

/// Where a conversation stands
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "parameters", rename_all = "lowercase")]
pub enum ConversationState {
    #[default]
    Empty,
    Active(PlanetParameters),
}

/// Stateful planet generation assistant
pub struct PlanetAssistant {
    classifier: Arc<dyn Classifier>,
    sampler: Box<dyn UniformSampler>,
    estimator: Estimator,
    prompts: Arc<PromptLoader>,
    state: ConversationState,
}

impl std::fmt::Debug for PlanetAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanetAssistant")
            .field("estimator", &self.estimator)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PlanetAssistant {
    pub fn new(classifier: Arc<dyn Classifier>, sampler: Box<dyn UniformSampler>) -> Self {
        debug!("PlanetAssistant::new: called");
        Self {
            classifier,
            sampler,
            estimator: Estimator::default(),
            prompts: Arc::new(PromptLoader::embedded_only()),
            state: ConversationState::Empty,
        }
    }

    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_prompts(mut self, prompts: Arc<PromptLoader>) -> Self {
        self.prompts = prompts;
        self
    }

    /// Classify `text` and start a new planet, discarding any previous one
    ///
    /// On failure the previous state is left untouched.
    pub async fn start_conversation(
        &mut self,
        text: &str,
        dataset: &dyn ReferenceDataset,
    ) -> Result<&PlanetParameters, PlanetError> {
        debug!(text_len = text.len(), "PlanetAssistant::start_conversation: called");
        let tags = self.classifier.classify(text).await?;
        self.start_with_tags(&tags, dataset)
    }

    /// Start a new planet from already-extracted tags
    pub fn start_with_tags(
        &mut self,
        tags: &FeatureTags,
        dataset: &dyn ReferenceDataset,
    ) -> Result<&PlanetParameters, PlanetError> {
        debug!(?tags, "PlanetAssistant::start_with_tags: called");
        let params = self.estimator.estimate(tags, dataset, self.sampler.as_mut())?;
        info!(size = %params.size, planet_type = %params.planet_type, "Conversation started");
        self.state = ConversationState::Active(params);
        self.parameters().ok_or(PlanetError::NoActiveConversation)
    }

    /// Append a requested feature to the current planet
    ///
    /// Physical parameters are not re-derived.
    pub fn continue_conversation(&mut self, addition: &str) -> Result<(), PlanetError> {
        debug!(%addition, "PlanetAssistant::continue_conversation: called");
        let params = match &mut self.state {
            ConversationState::Active(params) => params,
            ConversationState::Empty => return Err(PlanetError::NoActiveConversation),
        };

        let addition = addition.trim();
        if addition.is_empty() {
            return Err(PlanetError::EmptyInput);
        }

        params.additional_features.push(addition.to_string());
        info!(count = params.additional_features.len(), "Feature added");
        Ok(())
    }

    /// Render the image prompt for the current planet
    ///
    /// Read-only; the same state always renders the same prompt.
    pub fn finalize_conversation(&self) -> Result<String, PlanetError> {
        debug!("PlanetAssistant::finalize_conversation: called");
        let params = self.require_active()?;
        self.prompts.compose(params, &describe(params))
    }

    /// Ask a model to write the image prompt from the qualitative bands
    ///
    /// Unlike [`finalize_conversation`](Self::finalize_conversation) the result
    /// varies from call to call.
    pub async fn narrate_prompt(&self, llm: &dyn LlmClient) -> Result<String, PlanetError> {
        debug!("PlanetAssistant::narrate_prompt: called");
        narrate(self.require_active()?, &self.prompts, llm).await
    }

    pub fn parameters(&self) -> Option<&PlanetParameters> {
        match &self.state {
            ConversationState::Active(params) => Some(params),
            ConversationState::Empty => None,
        }
    }

    pub fn bands(&self) -> Option<DescriptiveBands> {
        self.parameters().map(describe)
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ConversationState::Active(_))
    }

    fn require_active(&self) -> Result<&PlanetParameters, PlanetError> {
        self.parameters().ok_or(PlanetError::NoActiveConversation)
    }
}

/// Ask `llm` to author an image prompt for `params`
///
/// The model only sees the qualitative bands, tags and additions.
pub async fn narrate(
    params: &PlanetParameters,
    prompts: &PromptLoader,
    llm: &dyn LlmClient,
) -> Result<String, PlanetError> {
    debug!("narrate: called");
    let context = ImagePromptContext::new(params, &describe(params));
    let instructions = prompts
        .render("narrate", &context)
        .map_err(|e| PlanetError::Prompt(e.to_string()))?;

    let request = CompletionRequest {
        system_prompt: instructions,
        messages: vec![],
        max_tokens: NARRATE_MAX_TOKENS,
        response_format: None,
    };
    let response = llm
        .complete(request)
        .await
        .map_err(|e| PlanetError::Prompt(format!("narration failed: {}", e)))?;

    response
        .content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| PlanetError::Prompt("narration returned no text".to_string()))
}
