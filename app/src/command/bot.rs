use crate::command::CommandStrategy;
use staffbot_config::Config;
use staffbot_core::LLMProvider;
use staffbot_providers::OpenAiProvider;
use staffbot_storage::StorageEngine;
use staffbot_telegram::TelegramBot;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Connect to the storage engine with capped backoff retry.
///
/// # Retry Behavior
/// - First retry: 1s
/// - Second retry: 2s
/// - Third and beyond: 3s (capped)
/// - Retries indefinitely until connection succeeds
async fn connect_storage_with_retry(database_url: &str) -> anyhow::Result<StorageEngine> {
    const MAX_DELAY: Duration = Duration::from_secs(3);
    const INITIAL_DELAY: Duration = Duration::from_secs(1);

    let mut attempt = 0u32;
    let mut delay = INITIAL_DELAY;

    loop {
        attempt += 1;
        match StorageEngine::new(database_url).await {
            Ok(engine) => {
                info!("Storage engine connected successfully on attempt {attempt}");
                return Ok(engine);
            }
            Err(e) => {
                warn!(
                    "Failed to connect to database (attempt {attempt}): {e}. Retrying in {}s...",
                    delay.as_secs()
                );
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

/// Strategy for running the Telegram bot.
pub struct BotStrategy;

impl CommandStrategy for BotStrategy {
    type Input = ();

    async fn execute(&self, (): Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        if config.telegram.token.is_empty() {
            anyhow::bail!("Telegram bot token not configured. Set \"telegram.token\" in config");
        }

        info!("Starting Telegram bot...");

        // The default database URL points into the config directory.
        Config::ensure_config_dir()?;

        let provider: Arc<dyn LLMProvider> = Arc::new(
            OpenAiProvider::new(config.provider.api_key.clone())
                .with_params(config.provider.max_tokens, config.provider.temperature),
        );

        let storage = Arc::new(connect_storage_with_retry(&config.database.url).await?);

        let bot = TelegramBot::new(config, provider, storage)?;

        info!("Telegram bot is running. Press Ctrl+C to stop.");
        bot.run().await?;

        Ok(())
    }
}
