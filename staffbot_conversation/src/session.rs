//! A conversation session keyed by the Telegram user (or chat) id.

use chrono::{DateTime, Utc};
use staffbot_core::{ChatMessage, Role, StoredSession};

#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    #[must_use]
    pub fn empty(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
        self.updated_at = Utc::now();
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.updated_at = Utc::now();
    }
}

impl From<StoredSession> for ConversationSession {
    fn from(stored: StoredSession) -> Self {
        Self {
            id: stored.id,
            messages: stored.messages,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

impl From<&ConversationSession> for StoredSession {
    fn from(session: &ConversationSession) -> Self {
        Self {
            id: session.id.clone(),
            messages: session.messages.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
