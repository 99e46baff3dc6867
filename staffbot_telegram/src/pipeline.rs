//! Transport-free message pipeline.
//!
//! Order is fixed: rate gate, then the cheap classifier, then the resolver
//! chain, and only when nothing was handled the conversational fallback.
//! A directory answer leaves the session untouched; a rate-limited request
//! touches neither the store nor the session.

use staffbot_core::AppError;
use staffbot_conversation::{ConversationManager, SessionManager};
use staffbot_directory::{DirectoryResolver, Resolution, is_directory_query};
use tracing::debug;

use crate::ratelimit::{ANONYMOUS_KEY, RateLimiter};

pub struct MessagePipeline {
    limiter: RateLimiter,
    resolver: DirectoryResolver,
    conversation: ConversationManager,
}

impl MessagePipeline {
    #[must_use]
    pub const fn new(
        limiter: RateLimiter,
        resolver: DirectoryResolver,
        conversation: ConversationManager,
    ) -> Self {
        Self {
            limiter,
            resolver,
            conversation,
        }
    }

    /// Process one free-text message and produce the reply text.
    pub async fn handle_text(
        &self,
        user_id: Option<i64>,
        chat_id: i64,
        text: &str,
    ) -> Result<String, AppError> {
        let rate_key = user_id.map_or_else(|| ANONYMOUS_KEY.to_string(), |id| id.to_string());
        self.limiter.check(&rate_key).await?;

        if is_directory_query(text) {
            if let Resolution::Handled(reply) = self.resolver.resolve(text).await? {
                debug!("Directory pipeline handled the message");
                return Ok(reply);
            }
            debug!("Directory pipeline fell through to conversation");
        }

        let session_id = Self::session_id(user_id, chat_id);
        self.conversation.process_turn(&session_id, text).await
    }

    /// Session key: sender id when known, otherwise the chat id.
    #[must_use]
    pub fn session_id(user_id: Option<i64>, chat_id: i64) -> String {
        user_id.unwrap_or(chat_id).to_string()
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionManager {
        self.conversation.sessions()
    }

    #[must_use]
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use staffbot_config::RateLimitConfig;
    use staffbot_conversation::ConversationConfig;
    use staffbot_core::{
        ChatMessage, Employee, LLMProvider, LLMResponse, Predicate, RecordStore, SessionStore,
        StoredSession,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MemStore {
        employees: Vec<Employee>,
        queries: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for MemStore {
        async fn find_first(&self, predicate: &Predicate) -> anyhow::Result<Option<Employee>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .employees
                .iter()
                .find(|emp| predicate.matches(emp))
                .cloned())
        }

        async fn find_all(&self, predicate: &Predicate) -> anyhow::Result<Vec<Employee>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .employees
                .iter()
                .filter(|emp| predicate.matches(emp))
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct MemSessions {
        saves: AtomicUsize,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl SessionStore for MemSessions {
        async fn get(&self, _id: &str) -> anyhow::Result<Option<StoredSession>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        async fn save(&self, _session: &StoredSession) -> anyhow::Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete(&self, _id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn delete_older_than(&self, _max_age: chrono::Duration) -> anyhow::Result<u64> {
            Ok(0)
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LLMProvider for CountingProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _model: &str,
        ) -> anyhow::Result<LLMResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LLMResponse {
                content: "обычный ответ".to_string(),
                usage: None,
            })
        }

        fn get_default_model(&self) -> &str {
            "test"
        }
    }

    struct Fixture {
        pipeline: MessagePipeline,
        store: Arc<MemStore>,
        sessions: Arc<MemSessions>,
        provider: Arc<CountingProvider>,
    }

    fn fixture(max_requests: usize) -> Fixture {
        let zorin = Employee {
            id: 1,
            first_name: "Михаил".to_string(),
            last_name: "Зорин".to_string(),
            email: Some("zorin@example.com".to_string()),
            phone: None,
            position: Some("Директор".to_string()),
            department: None,
            birthday_day: None,
            birthday_month: None,
        };

        let store = Arc::new(MemStore {
            employees: vec![zorin],
            queries: AtomicUsize::new(0),
        });
        let sessions = Arc::new(MemSessions::default());
        let provider = Arc::new(CountingProvider::default());

        let limiter = RateLimiter::new(&RateLimitConfig {
            enabled: true,
            max_requests,
            window_ms: 60_000,
        });
        let resolver = DirectoryResolver::new(Arc::clone(&store) as Arc<dyn RecordStore>);
        let conversation = ConversationManager::new(
            Arc::clone(&provider) as Arc<dyn LLMProvider>,
            SessionManager::new(Arc::clone(&sessions) as Arc<dyn SessionStore>),
            ConversationConfig::default(),
        );

        Fixture {
            pipeline: MessagePipeline::new(limiter, resolver, conversation),
            store,
            sessions,
            provider,
        }
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn directory_answer_skips_fallback_and_session() {
        let fx = fixture(10);

        let reply = fx
            .pipeline
            .handle_text(Some(7), 7, "кто директор?")
            .await
            .expect("directory query should be handled");

        assert!(reply.contains("Михаил Зорин"));
        assert_eq!(fx.provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.sessions.reads.load(Ordering::SeqCst), 0);
        assert_eq!(fx.sessions.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn unhandled_text_goes_to_conversation_and_saves_session() {
        let fx = fixture(10);

        let reply = fx
            .pipeline
            .handle_text(Some(7), 7, "посоветуй фильм")
            .await
            .expect("conversation should answer");

        assert_eq!(reply, "обычный ответ");
        assert_eq!(fx.provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.sessions.saves.load(Ordering::SeqCst), 1);
        // No record-store access for out-of-scope text.
        assert_eq!(fx.store.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn bare_name_miss_falls_through_to_conversation() {
        let fx = fixture(10);

        let reply = fx
            .pipeline
            .handle_text(Some(7), 7, "Анна Смирнова")
            .await
            .expect("fallthrough should reach conversation");

        assert_eq!(reply, "обычный ответ");
        assert_eq!(fx.provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rate_limited_request_touches_nothing() {
        let fx = fixture(1);

        fx.pipeline
            .handle_text(Some(7), 7, "кто директор?")
            .await
            .ok();

        let result = fx.pipeline.handle_text(Some(7), 7, "кто директор?").await;
        assert!(matches!(result, Err(AppError::RateLimit { .. })));

        // Only the first request reached the store; the session was never
        // touched at all.
        assert!(fx.store.queries.load(Ordering::SeqCst) > 0);
        let queries_after_first = fx.store.queries.load(Ordering::SeqCst);
        assert_eq!(fx.sessions.reads.load(Ordering::SeqCst), 0);

        fx.pipeline
            .handle_text(Some(7), 7, "кто директор?")
            .await
            .ok();
        assert_eq!(fx.store.queries.load(Ordering::SeqCst), queries_after_first);
    }

    #[tokio::test]
    async fn anonymous_senders_share_the_fallback_key() {
        let fx = fixture(1);

        assert!(fx.pipeline.handle_text(None, 1, "привет").await.is_ok());
        let result = fx.pipeline.handle_text(None, 2, "привет").await;
        assert!(matches!(result, Err(AppError::RateLimit { .. })));
    }
}
