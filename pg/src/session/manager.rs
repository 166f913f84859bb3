//! SessionManager actor implementation

use std::collections::HashMap;
use std::sync::Arc;

use exodata::ReferenceDataset;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

use super::messages::{SessionCommand, SessionError, SessionResponse};
use crate::conversation::{PlanetAssistant, narrate};
use crate::domain::{FeatureTags, PlanetParameters};
use crate::error::PlanetError;
use crate::features::Classifier;
use crate::image::ImageReference;
use crate::llm::LlmClient;
use crate::physics::{Estimator, SamplerSource};
use crate::prompts::PromptLoader;
use crate::transcript::{TranscriptEvent, TranscriptLogger};

/// Settings shared by every session of a manager
pub struct SessionOptions {
    pub estimator: Estimator,
    pub samplers: SamplerSource,
    pub prompts: Arc<PromptLoader>,
    pub transcript: Option<TranscriptLogger>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            estimator: Estimator::default(),
            samplers: SamplerSource::Entropy,
            prompts: Arc::new(PromptLoader::embedded_only()),
            transcript: None,
        }
    }
}

/// Handle to send commands to the SessionManager
///
/// Classification runs in the calling task; the actor owns every
/// [`PlanetAssistant`] and performs all estimation and state changes.
#[derive(Clone)]
pub struct SessionManager {
    tx: mpsc::Sender<SessionCommand>,
    classifier: Arc<dyn Classifier>,
    prompts: Arc<PromptLoader>,
    transcript: Option<TranscriptLogger>,
}

impl SessionManager {
    /// Spawn a new SessionManager actor
    pub fn spawn(dataset: Arc<dyn ReferenceDataset>, classifier: Arc<dyn Classifier>, options: SessionOptions) -> Self {
        debug!("SessionManager::spawn: called");
        let (tx, rx) = mpsc::channel(64);

        let actor = SessionActor {
            sessions: HashMap::new(),
            dataset,
            classifier: classifier.clone(),
            estimator: options.estimator,
            samplers: options.samplers,
            prompts: options.prompts.clone(),
        };
        tokio::spawn(actor_loop(actor, rx));

        info!("SessionManager spawned");

        Self {
            tx,
            classifier,
            prompts: options.prompts,
            transcript: options.transcript,
        }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<SessionResponse<T>>) -> SessionCommand,
    ) -> SessionResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)?
    }

    /// Create an empty session and return its id
    pub async fn create_session(&self) -> SessionResponse<String> {
        debug!("create_session: called");
        self.request(|reply| SessionCommand::Create { reply }).await
    }

    /// Classify `text` and start a new planet in session `id`
    pub async fn start(&self, id: &str, text: &str) -> SessionResponse<PlanetParameters> {
        debug!(%id, text_len = text.len(), "start: called");
        // Unknown sessions fail before the model is called
        self.parameters(id).await?;
        let tags = self.classifier.classify(text).await?;
        let params = self.send_start(id, tags).await?;
        self.log(id, || TranscriptEvent::Started {
            text: text.to_string(),
            parameters: params.clone(),
        });
        Ok(params)
    }

    /// Start a new planet in session `id` from already-extracted tags
    pub async fn start_with_tags(&self, id: &str, tags: FeatureTags) -> SessionResponse<PlanetParameters> {
        debug!(%id, ?tags, "start_with_tags: called");
        let text = format!("{} {} {} {}", tags.size, tags.temperature, tags.planet_type, tags.color);
        let params = self.send_start(id, tags).await?;
        self.log(id, || TranscriptEvent::Started {
            text,
            parameters: params.clone(),
        });
        Ok(params)
    }

    async fn send_start(&self, id: &str, tags: FeatureTags) -> SessionResponse<PlanetParameters> {
        self.request(|reply| SessionCommand::Start {
            id: id.to_string(),
            tags,
            reply,
        })
        .await
    }

    /// Add a feature to session `id`
    pub async fn continue_session(&self, id: &str, addition: &str) -> SessionResponse<PlanetParameters> {
        debug!(%id, %addition, "continue_session: called");
        let params = self
            .request(|reply| SessionCommand::Continue {
                id: id.to_string(),
                addition: addition.to_string(),
                reply,
            })
            .await?;
        self.log(id, || TranscriptEvent::Continued {
            addition: addition.trim().to_string(),
        });
        Ok(params)
    }

    /// Render the image prompt of session `id`
    pub async fn finalize(&self, id: &str) -> SessionResponse<String> {
        debug!(%id, "finalize: called");
        let prompt = self
            .request(|reply| SessionCommand::Finalize {
                id: id.to_string(),
                reply,
            })
            .await?;
        self.log(id, || TranscriptEvent::Finalized { prompt: prompt.clone() });
        Ok(prompt)
    }

    /// Have `llm` author the image prompt of session `id`
    pub async fn narrate(&self, id: &str, llm: &dyn LlmClient) -> SessionResponse<String> {
        debug!(%id, "narrate: called");
        let params = self
            .parameters(id)
            .await?
            .ok_or(SessionError::Planet(PlanetError::NoActiveConversation))?;
        Ok(narrate(&params, &self.prompts, llm).await?)
    }

    /// Record an image generated from a finalized prompt of session `id`
    pub fn record_image(&self, id: &str, prompt: &str, image: &ImageReference) {
        debug!(%id, url = %image.url, "record_image: called");
        self.log(id, || TranscriptEvent::ImageGenerated {
            prompt: prompt.to_string(),
            image_url: image.url.clone(),
        });
    }

    /// Current parameters of session `id`, `None` before the first start
    pub async fn parameters(&self, id: &str) -> SessionResponse<Option<PlanetParameters>> {
        debug!(%id, "parameters: called");
        self.request(|reply| SessionCommand::Parameters {
            id: id.to_string(),
            reply,
        })
        .await
    }

    pub async fn remove_session(&self, id: &str) -> SessionResponse<()> {
        debug!(%id, "remove_session: called");
        self.request(|reply| SessionCommand::Remove {
            id: id.to_string(),
            reply,
        })
        .await
    }

    /// Ids of all live sessions, oldest first
    pub async fn list_sessions(&self) -> SessionResponse<Vec<String>> {
        debug!("list_sessions: called");
        self.request(|reply| SessionCommand::List { reply }).await
    }

    /// Shutdown the SessionManager
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        debug!("shutdown: called");
        self.tx
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::ChannelError)
    }

    fn log(&self, id: &str, event: impl FnOnce() -> TranscriptEvent) {
        if let Some(transcript) = &self.transcript {
            transcript.record(id, event());
        }
    }
}

struct SessionActor {
    sessions: HashMap<String, PlanetAssistant>,
    dataset: Arc<dyn ReferenceDataset>,
    classifier: Arc<dyn Classifier>,
    estimator: Estimator,
    samplers: SamplerSource,
    prompts: Arc<PromptLoader>,
}

impl SessionActor {
    fn create(&mut self) -> String {
        let id = Uuid::now_v7().to_string();
        let assistant = PlanetAssistant::new(self.classifier.clone(), self.samplers.next_sampler())
            .with_estimator(self.estimator.clone())
            .with_prompts(self.prompts.clone());
        self.sessions.insert(id.clone(), assistant);
        info!(session_id = %id, "Session created");
        id
    }

    fn assistant(&mut self, id: &str) -> SessionResponse<&mut PlanetAssistant> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn start(&mut self, id: &str, tags: &FeatureTags) -> SessionResponse<PlanetParameters> {
        let dataset = self.dataset.clone();
        let assistant = self.assistant(id)?;
        Ok(assistant.start_with_tags(tags, dataset.as_ref())?.clone())
    }

    fn continue_session(&mut self, id: &str, addition: &str) -> SessionResponse<PlanetParameters> {
        let assistant = self.assistant(id)?;
        assistant.continue_conversation(addition)?;
        assistant
            .parameters()
            .cloned()
            .ok_or(SessionError::Planet(PlanetError::NoActiveConversation))
    }

    fn finalize(&mut self, id: &str) -> SessionResponse<String> {
        Ok(self.assistant(id)?.finalize_conversation()?)
    }

    fn remove(&mut self, id: &str) -> SessionResponse<()> {
        self.sessions
            .remove(id)
            .map(|_| info!(session_id = %id, "Session removed"))
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.keys().cloned().collect();
        // UUIDv7 strings sort by creation time
        ids.sort();
        ids
    }
}

/// The actor loop that processes commands
async fn actor_loop(mut actor: SessionActor, mut rx: mpsc::Receiver<SessionCommand>) {
    debug!("SessionManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            SessionCommand::Create { reply } => {
                debug!("actor_loop: Create command");
                let _ = reply.send(Ok(actor.create()));
            }

            SessionCommand::Start { id, tags, reply } => {
                debug!(%id, "actor_loop: Start command");
                let _ = reply.send(actor.start(&id, &tags));
            }

            SessionCommand::Continue { id, addition, reply } => {
                debug!(%id, "actor_loop: Continue command");
                let _ = reply.send(actor.continue_session(&id, &addition));
            }

            SessionCommand::Finalize { id, reply } => {
                debug!(%id, "actor_loop: Finalize command");
                let _ = reply.send(actor.finalize(&id));
            }

            SessionCommand::Parameters { id, reply } => {
                debug!(%id, "actor_loop: Parameters command");
                let result = actor.assistant(&id).map(|a| a.parameters().cloned());
                let _ = reply.send(result);
            }

            SessionCommand::Remove { id, reply } => {
                debug!(%id, "actor_loop: Remove command");
                let _ = reply.send(actor.remove(&id));
            }

            SessionCommand::List { reply } => {
                debug!("actor_loop: List command");
                let _ = reply.send(Ok(actor.list()));
            }

            SessionCommand::Shutdown => {
                info!("SessionManager shutting down");
                break;
            }
        }
    }

    debug!("SessionManager actor stopped");
}
