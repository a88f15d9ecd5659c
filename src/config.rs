use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{BotError, BotResult};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingKey(&'static str),

    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub generation: GenerationConfig,
    pub payment: PaymentConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn set_global(config: AppConfig) -> BotResult<()> {
        APP_CONFIG
            .set(config)
            .map_err(|_| BotError::AppState("Failed to set global app config".to_string()))
    }

    pub fn get() -> BotResult<&'static AppConfig> {
        APP_CONFIG
            .get()
            .ok_or_else(|| BotError::AppState("App config not initialized".to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct TelegramConfig(pub String);

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    /// Absent key disables readings instead of failing startup.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    /// Absent token disables the shop checkout.
    pub provider_token: Option<String>,
    pub currency: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub sessions_path: PathBuf,
}

pub fn build_config() -> BotResult<AppConfig> {
    info!("Building AppConfig...");

    let config = AppConfig {
        telegram: TelegramConfig(
            std::env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingKey("BOT_TOKEN"))?,
        ),
        generation: GenerationConfig {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            api_base: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4.1-2025-04-14".to_string()),
            request_timeout_secs: match std::env::var("GENERATION_TIMEOUT_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue("GENERATION_TIMEOUT_SECS"))?,
                Err(_) => 60,
            },
        },
        payment: PaymentConfig {
            provider_token: std::env::var("PROVIDER_TOKEN").ok(),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "UAH".to_string()),
        },
        storage: StorageConfig {
            sessions_path: std::env::var("SESSIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("sessions/sessions.json")),
        },
    };

    if config.generation.api_key.is_none() {
        warn!("OPENAI_API_KEY missing, reading generation is disabled");
    }
    if config.payment.provider_token.is_none() {
        warn!("PROVIDER_TOKEN missing, coin purchases are disabled");
    }

    info!("AppConfig built");

    Ok(config)
}
