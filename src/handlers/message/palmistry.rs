use teloxide::adaptors::Throttle;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::HandlerResult;
use crate::services::dialogue::{ConversationState, PalmistryState};
use crate::services::divination::prompts;

use super::super::{costs, deliver_reading, RequestContext};

pub(super) async fn handle_photo(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
    conversation: &ConversationState,
) -> HandlerResult<()> {
    // Unsolicited photos are ignored.
    if !matches!(
        conversation,
        ConversationState::Palmistry(PalmistryState::AwaitingPalmPhoto)
    ) {
        return Ok(());
    }

    bot.send_message(chat_id, "✋ Reading the lines of your palm...").await?;

    deliver_reading(
        bot,
        chat_id,
        context.user_id,
        &prompts::palm_reading(),
        costs::PALM_READING,
    )
    .await
}

pub(super) async fn handle_text(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    _context: &RequestContext,
    palm: PalmistryState,
) -> HandlerResult<()> {
    if matches!(palm, PalmistryState::AwaitingPalmPhoto) {
        bot.send_message(chat_id, "Please send a photo of your palm to continue.")
            .await?;
    }
    Ok(())
}
