use teloxide::adaptors::Throttle;
use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, UserId};

use crate::error::HandlerResult;
use crate::state::AppState;
use crate::utils::keyboard;

pub(super) async fn send_overview(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    user_id: UserId,
) -> HandlerResult<()> {
    let state = AppState::get()?;
    let Some(record) = state.sessions.get(user_id) else {
        return Ok(());
    };

    match keyboard::subscription_overview(&record) {
        Some(text) => {
            bot.send_message(chat_id, text)
                .reply_markup(keyboard::subscription_list(&record))
                .await?;
        }
        None => {
            bot.send_message(
                chat_id,
                "You have no active subscriptions. You can set them up inside the reading modes.",
            )
            .await?;
        }
    }

    Ok(())
}

/// Cancels the subscription at `index` and refreshes the inline list the
/// button came from. A stale index is reported without any mutation.
pub(super) async fn handle_cancel(
    bot: &Throttle<Bot>,
    q: &CallbackQuery,
    chat_id: ChatId,
    user_id: UserId,
    index: usize,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    match state.subscriptions.cancel(user_id, index) {
        Ok(removed) => {
            bot.send_message(
                chat_id,
                format!(
                    "✅ Subscription {} ({}) cancelled!",
                    removed.kind, removed.frequency
                ),
            )
            .await?;

            // Refresh the list message the button belongs to.
            if let (Some(message), Some(record)) = (&q.message, state.sessions.get(user_id)) {
                match keyboard::subscription_overview(&record) {
                    Some(text) => {
                        bot.edit_message_text(chat_id, message.id(), text)
                            .reply_markup(keyboard::subscription_list(&record))
                            .await?;
                    }
                    None => {
                        bot.edit_message_text(chat_id, message.id(), "You have no active subscriptions.")
                            .await?;
                    }
                }
            }
        }
        Err(e) => {
            debug!("Cancel failed for user {}: {}", user_id, e);
            bot.send_message(chat_id, "Error: subscription not found").await?;
        }
    }

    Ok(())
}
