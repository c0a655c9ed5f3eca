//! Session state types

use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

/// One message exchanged with the backend
///
/// Turns are immutable once created; on the wire they appear as
/// `{ "type": "user"|"bot", "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(rename = "type")]
    role: Role,
    #[serde(rename = "message")]
    text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered, append-only transcript of canonical turns
///
/// Only text the backend would itself treat as conversational context is
/// recorded here; display-only output (errors, order cards) never is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Copy of the transcript as it stands now
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }
}

/// Whether a request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Ready for user input, no pending request
    #[default]
    Idle,

    /// Request sent, waiting for the transport to complete
    AwaitingReply,
}

impl SessionStatus {
    pub fn is_busy(self) -> bool {
        matches!(self, SessionStatus::AwaitingReply)
    }
}
