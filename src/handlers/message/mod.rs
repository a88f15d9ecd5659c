mod astrology;
mod numerology;
mod palmistry;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::error::HandlerResult;
use crate::services::dialogue::ConversationState;
use crate::state::AppState;

use super::RequestContext;

pub(super) fn get_message_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_message().endpoint(handle_message)
}

/// Routes free-form input to whichever wizard slot is awaited. Input that
/// matches no awaited slot is dropped on purpose rather than treated as an
/// error.
async fn handle_message(
    bot: Throttle<Bot>,
    msg: Message,
    context: RequestContext,
) -> HandlerResult<()> {
    let state = AppState::get()?;
    let Some(record) = state.sessions.get(context.user_id) else {
        return Ok(());
    };

    if msg.photo().is_some() {
        palmistry::handle_photo(&bot, msg.chat.id, &context, &record.conversation).await?;
        super::persist_sessions().await;
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    debug!(
        "Routing text from user {} in {} mode",
        context.user_id,
        record.conversation.mode_name()
    );

    match record.conversation {
        ConversationState::Astrology(astro) => {
            astrology::handle_text(&bot, msg.chat.id, &context, astro, text).await?;
        }
        ConversationState::Numerology(num_state) => {
            numerology::handle_text(&bot, msg.chat.id, &context, num_state, text).await?;
        }
        ConversationState::Palmistry(palm) => {
            palmistry::handle_text(&bot, msg.chat.id, &context, palm).await?;
        }
        // Idle and tarot take no free-form input.
        _ => return Ok(()),
    }

    super::persist_sessions().await;

    Ok(())
}
