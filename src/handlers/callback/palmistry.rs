use teloxide::adaptors::Throttle;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::HandlerResult;
use crate::services::dialogue::{ConversationState, DialogueService, PalmistryState};
use crate::state::AppState;
use crate::utils::keyboard;

use super::super::{costs, send_insufficient_funds, RequestContext};

pub(super) async fn open_menu(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
) -> HandlerResult<()> {
    let state = AppState::get()?;
    state.sessions.update(context.user_id, |user| {
        DialogueService::enter_mode(user, ConversationState::Palmistry(PalmistryState::Menu))
    });

    bot.send_message(
        chat_id,
        "✋ You picked Palm Reading. The lines of your palm hold your story.",
    )
    .reply_markup(keyboard::palmistry_menu())
    .await?;

    Ok(())
}

pub(super) async fn handle_reading_request(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    let Some(record) = state.sessions.get(context.user_id) else {
        return Ok(());
    };
    if !matches!(record.conversation, ConversationState::Palmistry(_)) {
        return Ok(());
    }

    let charged = state
        .sessions
        .update(context.user_id, |user| {
            DialogueService::begin_paid_flow(
                user,
                costs::PALM_READING,
                ConversationState::Palmistry(PalmistryState::AwaitingPalmPhoto),
            )
        })
        .unwrap_or(false);
    if !charged {
        return send_insufficient_funds(bot, chat_id, costs::PALM_READING).await;
    }

    bot.send_message(
        chat_id,
        format!(
            "✋ Palm reading ({} coins spent).\n\nSend a clear photo of your palm.",
            costs::PALM_READING
        ),
    )
    .await?;

    Ok(())
}
