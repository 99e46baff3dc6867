//! Session persistence wrapper and the conversational turn processor.

use std::sync::Arc;

use chrono::Utc;
use staffbot_core::{AppError, ChatMessage, LLMProvider, Role, SessionStore};
use tracing::{debug, info, warn};

use crate::history::truncate_oldest;
use crate::session::ConversationSession;

/// Configuration for the conversational fallback.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    pub model: String,
    pub system_prompt: String,
    /// The stored window is capped at twice this value.
    pub max_history_messages: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            system_prompt: "Ты — полезный корпоративный ассистент. Отвечай кратко, вежливо, на русском языке.".to_string(),
            max_history_messages: 10,
        }
    }
}

/// Fail-open wrapper around a [`SessionStore`]. Storage trouble never
/// surfaces to the user: loads degrade to an empty session, failed saves
/// are logged and dropped.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, session_id: &str) -> ConversationSession {
        match self.store.get(session_id).await {
            Ok(Some(stored)) => stored.into(),
            Ok(None) => ConversationSession::empty(session_id),
            Err(e) => {
                warn!("Failed to load session {session_id}: {e}. Starting empty.");
                ConversationSession::empty(session_id)
            }
        }
    }

    pub async fn save(&self, session: &ConversationSession) {
        if let Err(e) = self.store.save(&session.into()).await {
            warn!("Failed to save session {}: {e}", session.id);
        }
    }

    pub async fn clear(&self, session_id: &str) {
        if let Err(e) = self.store.delete(session_id).await {
            warn!("Failed to clear session {session_id}: {e}");
        }
    }

    /// Age-based sweep. Reports a count and never an error.
    pub async fn cleanup_older_than(&self, max_age: chrono::Duration) -> u64 {
        match self.store.delete_older_than(max_age).await {
            Ok(count) => {
                if count > 0 {
                    info!("Session sweep removed {count} stale sessions");
                }
                count
            }
            Err(e) => {
                warn!("Session sweep failed: {e}");
                0
            }
        }
    }
}

/// Processes one conversational turn against the fallback provider.
pub struct ConversationManager {
    provider: Arc<dyn LLMProvider>,
    sessions: SessionManager,
    config: ConversationConfig,
}

impl ConversationManager {
    #[must_use]
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        sessions: SessionManager,
        config: ConversationConfig,
    ) -> Self {
        Self {
            provider,
            sessions,
            config,
        }
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// One turn: load, append the user message, truncate, ask the provider,
    /// append the reply, save. A provider failure (including a blank reply)
    /// leaves the stored session untouched.
    pub async fn process_turn(&self, session_id: &str, text: &str) -> Result<String, AppError> {
        let mut session = self.sessions.load(session_id).await;

        session.add_message(Role::User, text);
        truncate_oldest(&mut session.messages, self.window_cap());

        let mut messages = Vec::with_capacity(session.messages.len() + 1);
        messages.push(ChatMessage {
            role: Role::System,
            content: self.config.system_prompt.clone(),
        });
        messages.extend(session.messages.iter().cloned());

        let response = self
            .provider
            .chat(&messages, &self.config.model)
            .await
            .map_err(|e| AppError::external("AI", e))?;

        let reply = response.content.trim().to_string();
        if reply.is_empty() {
            return Err(AppError::external(
                "AI",
                anyhow::anyhow!("empty response from provider"),
            ));
        }

        session.add_message(Role::Assistant, reply.clone());
        truncate_oldest(&mut session.messages, self.window_cap());
        session.updated_at = Utc::now();
        self.sessions.save(&session).await;

        debug!(
            "Turn completed for session {session_id}: {} messages stored",
            session.message_count()
        );

        Ok(reply)
    }

    const fn window_cap(&self) -> usize {
        self.config.max_history_messages * 2
    }
}
