//! Session state for one interactive run
//!
//! Holds at most one uploaded-document handle plus an append-only
//! conversation history. A single instance is owned by the command loop
//! and passed explicitly wherever needed; nothing here is global and
//! nothing survives the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to a document uploaded to the Gemini File API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    /// Server-side resource name, e.g. "files/abc-123".
    pub name: String,
    /// URI referenced from generate requests.
    pub uri: String,
    pub mime_type: Option<String>,
    /// Local path the file came from, for user-facing messages.
    pub display_name: String,
}

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// A single prior exchange line in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub turn_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: TurnRole, content: String) -> Self {
        Self {
            turn_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            role,
            content,
        }
    }
}

/// Mutable context for the whole interactive session.
#[derive(Debug, Default)]
pub struct SessionState {
    document: Option<UploadedFile>,
    history: Vec<ChatTurn>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active uploaded document, if any.
    pub fn document(&self) -> Option<&UploadedFile> {
        self.document.as_ref()
    }

    /// Replace the active document. At most one handle is kept; a later
    /// upload supersedes an earlier one.
    pub fn set_document(&mut self, file: UploadedFile) {
        self.document = Some(file);
    }

    /// Iterate over prior turns, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ChatTurn> {
        self.history.iter()
    }

    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    /// Append one successful chat exchange. Failed exchanges are never
    /// recorded, so the history only contains completed turns.
    pub fn record_exchange(&mut self, user_text: &str, model_text: &str) {
        self.history
            .push(ChatTurn::new(TurnRole::User, user_text.to_string()));
        self.history
            .push(ChatTurn::new(TurnRole::Model, model_text.to_string()));
    }
}
