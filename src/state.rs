use std::sync::OnceLock;

use crate::config::AppConfig;
use crate::error::{BotError, BotResult};
use crate::services::divination::GenerationClient;
use crate::services::subscription::SubscriptionService;
use crate::storage::SessionRepository;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRepository,
    pub subscriptions: SubscriptionService,
    pub generation: GenerationClient,
}

static APP_STATE: OnceLock<AppState> = OnceLock::new();

impl AppState {
    pub async fn new(config: &AppConfig) -> BotResult<Self> {
        let sessions = SessionRepository::load(config.storage.sessions_path.clone()).await?;
        let subscriptions = SubscriptionService::new(sessions.clone());
        let generation = GenerationClient::new(&config.generation)?;

        Ok(Self {
            sessions,
            subscriptions,
            generation,
        })
    }

    pub fn set_global(state: AppState) -> BotResult<()> {
        APP_STATE
            .set(state)
            .map_err(|_| BotError::AppState("Failed to set global app state".into()))
    }

    pub fn get() -> BotResult<AppState> {
        APP_STATE
            .get()
            .cloned()
            .ok_or_else(|| BotError::AppState("App state not initialized".into()))
    }
}
