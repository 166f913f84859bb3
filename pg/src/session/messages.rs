//! Session manager messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{FeatureTags, PlanetParameters};
use crate::error::PlanetError;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Planet(#[from] PlanetError),

    #[error("Channel error")]
    ChannelError,
}

/// Response from session operations
pub type SessionResponse<T> = Result<T, SessionError>;

/// Commands sent to the SessionManager actor
#[derive(Debug)]
pub enum SessionCommand {
    Create {
        reply: oneshot::Sender<SessionResponse<String>>,
    },
    Start {
        id: String,
        tags: FeatureTags,
        reply: oneshot::Sender<SessionResponse<PlanetParameters>>,
    },
    Continue {
        id: String,
        addition: String,
        reply: oneshot::Sender<SessionResponse<PlanetParameters>>,
    },
    Finalize {
        id: String,
        reply: oneshot::Sender<SessionResponse<String>>,
    },
    Parameters {
        id: String,
        reply: oneshot::Sender<SessionResponse<Option<PlanetParameters>>>,
    },
    Remove {
        id: String,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    List {
        reply: oneshot::Sender<SessionResponse<Vec<String>>>,
    },
    Shutdown,
}
