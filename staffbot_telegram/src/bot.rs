use crate::{Command, MessagePipeline, RateLimiter, Result};
use staffbot_config::Config;
use staffbot_conversation::{ConversationConfig, ConversationManager, SessionManager};
use staffbot_core::{LLMProvider, RecordStore, SessionStore};
use staffbot_directory::DirectoryResolver;
use staffbot_storage::StorageEngine;
use std::{sync::Arc, time::Duration};
use teloxide::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};

/// Telegram bot wiring: the transport, the message pipeline and the
/// background sweeps.
#[derive(Clone)]
pub struct TelegramBot {
    /// Teloxide bot instance
    pub bot: Bot,
    pipeline: Arc<MessagePipeline>,
    storage: Arc<StorageEngine>,
    config: Config,
}

impl TelegramBot {
    /// Create a new Telegram bot
    pub fn new(
        config: Config,
        provider: Arc<dyn LLMProvider>,
        storage: Arc<StorageEngine>,
    ) -> Result<Self> {
        let bot = Bot::new(config.telegram.token.clone());

        let limiter = RateLimiter::new(&config.rate_limit);
        let resolver =
            DirectoryResolver::new(Arc::clone(&storage) as Arc<dyn RecordStore>);
        let sessions = SessionManager::new(Arc::clone(&storage) as Arc<dyn SessionStore>);
        let conversation = ConversationManager::new(
            provider,
            sessions,
            ConversationConfig {
                model: config.provider.model.clone(),
                system_prompt: config.provider.system_prompt.clone(),
                max_history_messages: config.session.max_history_messages,
            },
        );

        Ok(Self {
            bot,
            pipeline: Arc::new(MessagePipeline::new(limiter, resolver, conversation)),
            storage,
            config,
        })
    }

    #[must_use]
    pub fn pipeline(&self) -> &MessagePipeline {
        &self.pipeline
    }

    #[must_use]
    pub const fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    #[must_use]
    pub fn admin_user_ids(&self) -> &[i64] {
        &self.config.telegram.admin_user_ids
    }

    /// Test connection to Telegram API with capped linear backoff.
    /// Starts at 2s, increases by 2s each attempt, max 10s delay.
    /// Retries indefinitely until connection succeeds.
    async fn test_connection(&self) -> Result<()> {
        const INITIAL_DELAY_SECS: u64 = 2;
        const MAX_DELAY_SECS: u64 = 10;

        let mut attempt = 1u64;
        loop {
            match self.bot.get_me().await {
                Ok(bot_user) => {
                    info!(
                        "Connected to Telegram API: @{} (id: {})",
                        bot_user
                            .user
                            .username
                            .clone()
                            .unwrap_or_else(|| "no username".to_string()),
                        bot_user.user.id
                    );
                    return Ok(());
                }
                Err(e) => {
                    let delay_secs = (INITIAL_DELAY_SECS * attempt).min(MAX_DELAY_SECS);

                    warn!("Connection attempt {attempt} failed: {e}. Retrying in {delay_secs}s...");

                    if attempt == 1 {
                        warn!("This may be due to:");
                        warn!("  - Network connectivity issues");
                        warn!("  - Firewall blocking api.telegram.org");
                        warn!("  - Invalid bot token");
                        warn!("  - Telegram API being temporarily unavailable");
                    }

                    sleep(Duration::from_secs(delay_secs)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Background maintenance: the session age sweep and the rate-limiter
    /// key sweep. Both run once immediately and then on their interval.
    fn spawn_sweepers(&self) {
        let sessions = self.pipeline.sessions().clone();
        let max_age = chrono::Duration::days(self.config.session.max_age_days);
        let interval = Duration::from_secs(self.config.session.cleanup_interval_secs.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                sessions.cleanup_older_than(max_age).await;
            }
        });

        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(5 * 60));
            loop {
                ticker.tick().await;
                pipeline.limiter().sweep().await;
            }
        });
    }

    /// Run the bot
    pub async fn run(self) -> Result<()> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::types::Update;

        // Make sure Telegram is reachable before starting the dispatcher.
        self.test_connection().await?;
        self.bot.set_my_commands(Command::bot_commands()).await?;

        self.spawn_sweepers();

        let bot = self.bot.clone();

        let schema = dptree::entry().branch(Update::filter_message().endpoint({
            let bot_clone = self.clone();
            move |_bot: Bot, msg: teloxide::types::Message| {
                let bot_clone = bot_clone.clone();
                async move { crate::handler::handle_message(bot_clone, msg).await }
            }
        }));

        Dispatcher::builder(bot, schema)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
