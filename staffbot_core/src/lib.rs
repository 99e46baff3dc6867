#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod employee;
pub mod error;
pub mod predicate;

pub use employee::{Employee, NewEmployee};
pub use error::AppError;
pub use predicate::{Field, MatchMode, Predicate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Conversational fallback collaborator. The pipeline only needs
/// "send messages, get one reply back".
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse>;
    fn get_default_model(&self) -> &str;
}

/// Employee record store. Predicates are evaluated case-insensitively;
/// `find_first` returns matches in store insertion order, which is
/// implementation-defined and not part of the contract.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_first(&self, predicate: &Predicate) -> anyhow::Result<Option<Employee>>;
    async fn find_all(&self, predicate: &Predicate) -> anyhow::Result<Vec<Employee>>;
}

/// A persisted conversation session as the storage layer sees it.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session persistence. Callers treat failures as fail-open: a missing or
/// unreadable session degrades to an empty one, it never aborts a turn.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &str) -> anyhow::Result<Option<StoredSession>>;
    async fn save(&self, session: &StoredSession) -> anyhow::Result<()>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
    /// Delete sessions not updated for at least `max_age`. Returns the count.
    async fn delete_older_than(&self, max_age: chrono::Duration) -> anyhow::Result<u64>;
}
