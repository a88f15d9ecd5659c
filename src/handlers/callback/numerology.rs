use teloxide::adaptors::Throttle;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::HandlerResult;
use crate::services::dialogue::{
    ConversationState, DialogueService, FullAnalysisStep, NumerologyState,
};
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
        DialogueService::enter_mode(user, ConversationState::Numerology(NumerologyState::Menu))
    });

    bot.send_message(
        chat_id,
        "🔢 Numerology reveals the secrets of the numbers in your life!\n\nChoose an analysis:",
    )
    .reply_markup(keyboard::numerology_menu())
    .await?;

    Ok(())
}

pub(super) async fn handle_action(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
    data: &str,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    let Some(record) = state.sessions.get(context.user_id) else {
        return Ok(());
    };
    if !matches!(record.conversation, ConversationState::Numerology(_)) {
        return Ok(());
    }

    match data {
        "num_life_path" => {
            let charged = state
                .sessions
                .update(context.user_id, |user| {
                    DialogueService::begin_paid_flow(
                        user,
                        costs::LIFE_PATH,
                        ConversationState::Numerology(NumerologyState::AwaitingLifePathDate),
                    )
                })
                .unwrap_or(false);
            if !charged {
                return send_insufficient_funds(bot, chat_id, costs::LIFE_PATH).await;
            }
            bot.send_message(
                chat_id,
                "🛣️ The life path number reveals your innate talents and trials.\n\n\
                 Send your birth date as DD.MM.YYYY:",
            )
            .await?;
        }
        "num_destiny" => {
            let charged = state
                .sessions
                .update(context.user_id, |user| {
                    DialogueService::begin_paid_flow(
                        user,
                        costs::DESTINY,
                        ConversationState::Numerology(NumerologyState::AwaitingDestinyName),
                    )
                })
                .unwrap_or(false);
            if !charged {
                return send_insufficient_funds(bot, chat_id, costs::DESTINY).await;
            }
            bot.send_message(
                chat_id,
                "🌟 The destiny (expression) number reveals your talents and goals.\n\n\
                 Send your full birth name:",
            )
            .await?;
        }
        "num_full" => {
            let charged = state
                .sessions
                .update(context.user_id, |user| {
                    DialogueService::begin_paid_flow(
                        user,
                        costs::FULL_ANALYSIS,
                        ConversationState::Numerology(NumerologyState::FullAnalysis(
                            FullAnalysisStep::AwaitingBirthDate,
                        )),
                    )
                })
                .unwrap_or(false);
            if !charged {
                return send_insufficient_funds(bot, chat_id, costs::FULL_ANALYSIS).await;
            }
            bot.send_message(
                chat_id,
                "📊 The full analysis covers every key number and its influence.\n\n\
                 First, send your birth date as DD.MM.YYYY:",
            )
            .await?;
        }
        _ => {}
    }

    Ok(())
}
