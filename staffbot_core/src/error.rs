//! Application error taxonomy.
//!
//! Inner components return these typed values; the Telegram handler is the
//! single place where they are rendered into user-facing text. Recoverable
//! misses (no record found, no entities extracted, empty history) are in-band
//! results, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("unauthorized")]
    Authorization,

    #[error("rate limit exceeded, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("database error: {0}")]
    Database(#[source] anyhow::Error),

    #[error("{service} error: {source}")]
    ExternalApi {
        service: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("unexpected error: {0}")]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    #[must_use]
    pub fn external(service: impl Into<String>, source: anyhow::Error) -> Self {
        Self::ExternalApi {
            service: service.into(),
            source,
        }
    }

    /// One user-facing template per kind. Consulted at the outermost
    /// message-handling boundary only.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { errors } => {
                format!("Ошибка валидации: {}", errors.join("; "))
            }
            Self::Authorization => "❌ У вас нет прав для выполнения этой операции.".to_string(),
            Self::RateLimit { retry_after } => {
                format!("⚠️ Слишком много запросов. Попробуйте через {retry_after} секунд.")
            }
            Self::Database(_) => "❌ Ошибка базы данных. Попробуйте позже.".to_string(),
            Self::ExternalApi { service, .. } => {
                format!("❌ Ошибка сервиса {service}. Попробуйте позже.")
            }
            Self::Unknown(_) => "❌ Произошла ошибка. Попробуйте позже.".to_string(),
        }
    }
}
