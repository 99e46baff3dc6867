use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    pub token: String,
    /// Telegram user ids allowed to run administrative commands.
    #[serde(default)]
    pub admin_user_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    #[serde(default = "ProviderConfig::default_model")]
    pub model: String,
    #[serde(default = "ProviderConfig::default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "ProviderConfig::default_temperature")]
    pub temperature: f32,
    #[serde(default = "ProviderConfig::default_system_prompt")]
    pub system_prompt: String,
}

impl ProviderConfig {
    fn default_model() -> String {
        "gpt-3.5-turbo".to_string()
    }

    const fn default_max_tokens() -> usize {
        800
    }

    const fn default_temperature() -> f32 {
        0.2
    }

    fn default_system_prompt() -> String {
        "Ты — полезный корпоративный ассистент. Отвечай кратко, вежливо, на русском языке."
            .to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Context window sent to the fallback provider is capped at twice this.
    #[serde(default = "SessionConfig::default_max_history_messages")]
    pub max_history_messages: usize,
    #[serde(default = "SessionConfig::default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    /// Sessions idle longer than this are removed by the background sweep.
    #[serde(default = "SessionConfig::default_max_age_days")]
    pub max_age_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history_messages: Self::default_max_history_messages(),
            cleanup_interval_secs: Self::default_cleanup_interval_secs(),
            max_age_days: Self::default_max_age_days(),
        }
    }
}

impl SessionConfig {
    const fn default_max_history_messages() -> usize {
        10
    }

    const fn default_cleanup_interval_secs() -> u64 {
        3600
    }

    const fn default_max_age_days() -> i64 {
        7
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "RateLimitConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "RateLimitConfig::default_max_requests")]
    pub max_requests: usize,
    #[serde(default = "RateLimitConfig::default_window_ms")]
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            max_requests: Self::default_max_requests(),
            window_ms: Self::default_window_ms(),
        }
    }
}

impl RateLimitConfig {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_max_requests() -> usize {
        10
    }

    const fn default_window_ms() -> u64 {
        60_000
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        dirs::home_dir().map_or_else(
            || "sqlite://staffbot.db?mode=rwc".to_string(),
            |home| {
                format!(
                    "sqlite://{}?mode=rwc",
                    home.join(".staffbot").join("staffbot.db").display()
                )
            },
        )
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'staffbot init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(".staffbot"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "telegram": {
    "token": "your-telegram-bot-token-here",
    "admin_user_ids": []
  },
  "provider": {
    "api_key": "your-openai-api-key-here",
    "model": "gpt-3.5-turbo",
    "max_tokens": 800,
    "temperature": 0.2,
    "system_prompt": "Ты — полезный корпоративный ассистент. Отвечай кратко, вежливо, на русском языке."
  },
  "session": {
    "max_history_messages": 10,
    "cleanup_interval_secs": 3600,
    "max_age_days": 7
  },
  "rate_limit": {
    "enabled": true,
    "max_requests": 10,
    "window_ms": 60000
  }
}"#;

        std::fs::write(&config_path, config_template)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your Telegram bot token");
        println!("   2. Add your OpenAI API key");
        println!("   3. Run 'staffbot bot' to start the bot");
        println!();
        Ok(())
    }
}
