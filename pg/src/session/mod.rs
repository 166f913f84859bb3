//! Session store with actor pattern
//!
//! SessionManager owns one PlanetAssistant per session and processes
//! messages via channels, so concurrent callers never share a conversation.

mod manager;
mod messages;

pub use manager::{SessionManager, SessionOptions};
pub use messages::{SessionCommand, SessionError, SessionResponse};
