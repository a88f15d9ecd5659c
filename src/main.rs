use bot::BotService;
use config::AppConfig;
use state::AppState;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

mod bot;
mod commands;
mod config;
mod error;
mod handlers;
mod services;
mod state;
mod storage;
mod utils;

#[tokio::main]
async fn main() -> error::BotResult<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = pretty_env_logger::try_init_timed();

    info!("Starting bot...");

    let config = config::build_config()?;
    AppConfig::set_global(config.clone())?;

    info!("Initializing AppState...");
    let state = AppState::new(&config).await?;
    AppState::set_global(state)?;

    let service = BotService::new(&config);
    info!("Bot instance created");

    service.start().await?;

    Ok(())
}
