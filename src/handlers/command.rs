use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::commands::Command;
use crate::error::HandlerResult;
use crate::services::dialogue::DialogueService;
use crate::services::user::STARTING_COINS;
use crate::state::AppState;
use crate::utils::keyboard;

use super::{payment, subscriptions, RequestContext};

pub(super) fn get_command_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command)
}

async fn handle_command(
    bot: Throttle<Bot>,
    msg: Message,
    cmd: Command,
    context: RequestContext,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    match cmd {
        Command::Start => {
            info!("User {} started the bot", context.user_id);
            state
                .sessions
                .update(context.user_id, DialogueService::back_to_main);

            let greeting = if context.is_new_user {
                format!(
                    "🌙 Welcome to Lunora, {}! You received {} coins to get started.",
                    context.first_name, STARTING_COINS
                )
            } else {
                format!("🌙 Welcome back to Lunora, {}!", context.first_name)
            };
            bot.send_message(msg.chat.id, greeting).await?;
            bot.send_message(msg.chat.id, "Choose a mode:")
                .reply_markup(keyboard::main_menu())
                .await?;
        }
        Command::Balance => {
            let coins = state
                .sessions
                .get(context.user_id)
                .map(|user| user.coins)
                .unwrap_or(0);
            bot.send_message(msg.chat.id, format!("💰 Your balance: {} coins", coins))
                .await?;
        }
        Command::Shop => payment::send_shop(&bot, msg.chat.id).await?,
        Command::Subscriptions => {
            subscriptions::send_overview(&bot, msg.chat.id, context.user_id).await?
        }
        Command::Help => {
            bot.send_message(msg.chat.id, help_text()).await?;
        }
    }

    Ok(())
}

pub(super) fn help_text() -> String {
    "🌙 Lunora is your personal bot for esoteric practices\n\n\
     Available modes:\n\
     🎴 Tarot - get a daily card or a full spread\n\
     ✋ Palm Reading - send a photo of your palm for a reading\n\
     ✨ Astrology - natal charts, horoscopes and compatibility\n\
     🔢 Numerology - readings from your name and birth date\n\n\
     Commands:\n\
     /start - main menu\n\
     /balance - check your coin balance\n\
     /shop - buy coins\n\
     /subscriptions - manage your subscriptions\n\n\
     For anything else, reach out to @lunora_support"
        .to_string()
}
