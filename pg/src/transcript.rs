//! Transcript logger - persists conversation events to JSONL files
//!
//! Each session gets `{dir}/{session_id}.jsonl`, one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::PlanetParameters;

/// A conversation event worth keeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TranscriptEvent {
    Started {
        text: String,
        parameters: PlanetParameters,
    },
    Continued {
        addition: String,
    },
    Finalized {
        prompt: String,
    },
    /// An image was rendered from a finalized prompt
    ImageGenerated {
        prompt: String,
        image_url: String,
    },
}

impl TranscriptEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            TranscriptEvent::Started { .. } => "started",
            TranscriptEvent::Continued { .. } => "continued",
            TranscriptEvent::Finalized { .. } => "finalized",
            TranscriptEvent::ImageGenerated { .. } => "image_generated",
        }
    }
}

/// One line of a transcript file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    #[serde(flatten)]
    pub event: TranscriptEvent,
}

/// Appends conversation events to per-session JSONL files
#[derive(Debug, Clone)]
pub struct TranscriptLogger {
    dir: PathBuf,
}

impl TranscriptLogger {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        debug!(?dir, "TranscriptLogger::new: creating logger");
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", session_id))
    }

    /// Append one event to the session's transcript
    pub fn write_event(&self, session_id: &str, event: TranscriptEvent) -> eyre::Result<()> {
        debug!(%session_id, event_type = event.event_type(), "TranscriptLogger::write_event");
        fs::create_dir_all(&self.dir)?;

        let entry = TranscriptEntry {
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
            event,
        };
        let json = serde_json::to_string(&entry)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(session_id))?;
        writeln!(file, "{}", json)?;
        Ok(())
    }

    /// Like [`write_event`](Self::write_event) but only logs failures
    pub fn record(&self, session_id: &str, event: TranscriptEvent) {
        if let Err(e) = self.write_event(session_id, event) {
            warn!(%session_id, error = %e, "TranscriptLogger: failed to write event");
        }
    }
}

/// Read all entries of a session's transcript
pub fn read_transcript(dir: impl AsRef<Path>, session_id: &str) -> eyre::Result<Vec<TranscriptEntry>> {
    let path = dir.as_ref().join(format!("{}.jsonl", session_id));
    debug!(?path, "read_transcript: reading log file");

    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)?;
    let mut entries = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<TranscriptEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(line, error = %e, "read_transcript: failed to parse line");
            }
        }
    }

    Ok(entries)
}
