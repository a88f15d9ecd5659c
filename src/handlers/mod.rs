mod callback;
mod command;
mod message;
mod payment;
mod subscriptions;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::dptree;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Update, UpdateKind, User, UserId};

use crate::error::HandlerResult;
use crate::services::dialogue::DialogueService;
use crate::state::AppState;
use crate::utils;

/// Coin prices for every paid action, in one place.
pub(crate) mod costs {
    pub const TAROT_SIMPLE_SPREAD: u32 = 2;
    pub const TAROT_CELTIC_CROSS: u32 = 5;
    pub const TAROT_LOVE_SPREAD: u32 = 3;
    pub const TAROT_SUBSCRIPTION: u32 = 10;
    pub const NATAL_CHART: u32 = 5;
    pub const COMPATIBILITY: u32 = 2;
    pub const FORECAST: u32 = 3;
    pub const LIFE_PATH: u32 = 1;
    pub const DESTINY: u32 = 1;
    pub const FULL_ANALYSIS: u32 = 3;
    pub const PALM_READING: u32 = 3;
}

/// Per-update context resolved before any handler runs.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub user_id: UserId,
    pub first_name: String,
    pub is_new_user: bool,
}

fn extract_user(update: &Update) -> Option<&User> {
    update.from()
}

fn update_category(update: &Update) -> &'static str {
    match &update.kind {
        UpdateKind::Message(_) => "message",
        UpdateKind::CallbackQuery(_) => "callback_query",
        UpdateKind::PreCheckoutQuery(_) => "pre_checkout_query",
        _ => "other",
    }
}

pub fn get_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .filter_map(|update: Update| {
            let state = match AppState::get() {
                Ok(state) => state,
                Err(e) => {
                    error!("Failed to get AppState: {:?}", e);
                    return None;
                }
            };

            let user = extract_user(&update)?;
            let (_, is_new_user) =
                state
                    .sessions
                    .get_or_create(user.id, &user.first_name, user.username.as_deref());
            state
                .sessions
                .update(user.id, |record| record.touch(update_category(&update)));

            Some(RequestContext {
                user_id: user.id,
                first_name: user.first_name.clone(),
                is_new_user,
            })
        })
        .branch(command::get_command_handler())
        .branch(payment::get_payment_handler())
        .branch(callback::get_callback_handler())
        .branch(message::get_message_handler())
}

const GENERATION_FAILED_REFUNDED: &str = "😔 Something went wrong while preparing your reading. \
     Your coins have been refunded, please try again later.";
const GENERATION_FAILED_FREE: &str =
    "😔 Something went wrong while preparing your reading. Please try again later.";

/// Generates a reading and sends it in message-sized slices, then drops the
/// flow back to its mode menu. On generation failure the deducted amount is
/// credited back (against the live record, not a pre-await copy) before the
/// user sees the apology.
pub(crate) async fn deliver_reading(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    user_id: UserId,
    prompt: &str,
    refund: u32,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    match state.generation.generate(prompt).await {
        Ok(text) => {
            state.sessions.update(user_id, DialogueService::finish_flow);
            for chunk in utils::chunk_text(&text, utils::MAX_MESSAGE_LEN) {
                bot.send_message(chat_id, chunk).await?;
            }
        }
        Err(e) => {
            error!("Generation failed for user {}: {}", user_id, e);
            state.sessions.update(user_id, |user| {
                if refund > 0 {
                    user.credit(refund);
                }
                DialogueService::finish_flow(user);
            });
            let apology = if refund > 0 {
                GENERATION_FAILED_REFUNDED
            } else {
                GENERATION_FAILED_FREE
            };
            bot.send_message(chat_id, apology).await?;
        }
    }

    Ok(())
}

pub(crate) async fn send_insufficient_funds(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    cost: u32,
) -> HandlerResult<()> {
    bot.send_message(
        chat_id,
        format!(
            "❌ Not enough coins! This costs {} coins.\nCheck your balance (/balance) or top up in the shop (/shop).",
            cost
        ),
    )
    .reply_markup(utils::keyboard::back_to_main_menu())
    .await?;
    Ok(())
}

/// Interactive mutations flush to disk best-effort; a failed flush degrades
/// durability only and is never surfaced to the user.
pub(crate) async fn persist_sessions() {
    match AppState::get() {
        Ok(state) => {
            if let Err(e) = state.sessions.persist().await {
                warn!("Session persistence degraded: {}", e);
            }
        }
        Err(e) => error!("Failed to get AppState: {:?}", e),
    }
}
