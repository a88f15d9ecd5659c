use teloxide::adaptors::throttle::Limits;
use teloxide::adaptors::Throttle;
use teloxide::prelude::*;
use teloxide::Bot;

use crate::config::AppConfig;
use crate::error::BotResult;
use crate::handlers::get_handler;
use crate::services::scheduler::Scheduler;
use crate::state::AppState;

pub struct BotService {
    pub bot: Throttle<Bot>,
}

impl BotService {
    pub fn new(config: &AppConfig) -> Self {
        let bot = Bot::new(config.telegram.0.clone()).throttle(Limits::default());
        Self { bot }
    }

    pub async fn start(&self) -> BotResult<()> {
        info!("Testing connection to Telegram API...");
        match self.bot.get_me().await {
            Ok(_) => info!("Successfully connected to Telegram API"),
            Err(e) => {
                error!("Failed to connect to Telegram API: {:?}", e);
                return Err(anyhow::anyhow!("Failed to connect to Telegram API: {}", e).into());
            }
        }

        let state = AppState::get()?;
        let scheduler = Scheduler::new(
            self.bot.clone(),
            state.sessions.clone(),
            state.subscriptions.clone(),
            state.generation.clone(),
        );
        scheduler.start();

        info!("🌙 Lunora bot started");

        Dispatcher::builder(self.bot.clone(), get_handler())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
