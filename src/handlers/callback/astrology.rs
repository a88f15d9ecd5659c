use teloxide::adaptors::Throttle;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::HandlerResult;
use crate::services::dialogue::{
    AstrologyState, ConversationState, DialogueService, NatalChartStep,
};
use crate::services::divination::{prompts, ZodiacSign};
use crate::state::AppState;
use crate::utils::keyboard;

use super::super::{costs, deliver_reading, send_insufficient_funds, RequestContext};

pub(super) async fn open_menu(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
) -> HandlerResult<()> {
    let state = AppState::get()?;
    state.sessions.update(context.user_id, |user| {
        DialogueService::enter_mode(user, ConversationState::Astrology(AstrologyState::Menu))
    });

    bot.send_message(chat_id, "✨ You picked Astrology. Choose a service:")
        .reply_markup(keyboard::astrology_menu())
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

    // A stale menu tap from outside the mode is ignored.
    let Some(record) = state.sessions.get(context.user_id) else {
        return Ok(());
    };
    if !matches!(record.conversation, ConversationState::Astrology(_)) {
        return Ok(());
    }

    match data {
        "astro_horoscope" => {
            state.sessions.update(context.user_id, |user| {
                DialogueService::enter_mode(
                    user,
                    ConversationState::Astrology(AstrologyState::AwaitingHoroscopeSign),
                )
            });
            bot.send_message(chat_id, "Pick your zodiac sign for today's horoscope:")
                .reply_markup(keyboard::zodiac_signs())
                .await?;
        }
        "astro_natal" => {
            let charged = state
                .sessions
                .update(context.user_id, |user| {
                    DialogueService::begin_paid_flow(
                        user,
                        costs::NATAL_CHART,
                        ConversationState::Astrology(AstrologyState::NatalChart(
                            NatalChartStep::AwaitingBirthDate,
                        )),
                    )
                })
                .unwrap_or(false);
            if !charged {
                return send_insufficient_funds(bot, chat_id, costs::NATAL_CHART).await;
            }
            bot.send_message(
                chat_id,
                format!(
                    "🌟 Natal chart ({} coins spent).\n\nSend your birth date as DD.MM.YYYY, e.g. 15.06.1990",
                    costs::NATAL_CHART
                ),
            )
            .await?;
        }
        "astro_compat" => {
            let charged = state
                .sessions
                .update(context.user_id, |user| {
                    DialogueService::begin_paid_flow(
                        user,
                        costs::COMPATIBILITY,
                        ConversationState::Astrology(AstrologyState::Compatibility {
                            first_sign: None,
                        }),
                    )
                })
                .unwrap_or(false);
            if !charged {
                return send_insufficient_funds(bot, chat_id, costs::COMPATIBILITY).await;
            }
            bot.send_message(
                chat_id,
                format!(
                    "🌙 Sign compatibility ({} coins spent).\n\nPick the first zodiac sign:",
                    costs::COMPATIBILITY
                ),
            )
            .reply_markup(keyboard::zodiac_signs())
            .await?;
        }
        "astro_forecast" => {
            let charged = state
                .sessions
                .update(context.user_id, |user| {
                    DialogueService::begin_paid_flow(
                        user,
                        costs::FORECAST,
                        ConversationState::Astrology(AstrologyState::AwaitingForecastBirthDate),
                    )
                })
                .unwrap_or(false);
            if !charged {
                return send_insufficient_funds(bot, chat_id, costs::FORECAST).await;
            }
            bot.send_message(
                chat_id,
                format!(
                    "📅 Three-month forecast ({} coins spent).\n\nSend your birth date as DD.MM.YYYY, e.g. 15.06.1990",
                    costs::FORECAST
                ),
            )
            .await?;
        }
        _ => {}
    }

    Ok(())
}

/// Sign taps only mean something while an astrology action awaits one;
/// anywhere else they are ignored rather than treated as an error.
pub(super) async fn handle_sign(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
    sign: ZodiacSign,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    let Some(record) = state.sessions.get(context.user_id) else {
        return Ok(());
    };
    let ConversationState::Astrology(astro) = record.conversation else {
        return Ok(());
    };

    match astro {
        AstrologyState::AwaitingHoroscopeSign => {
            bot.send_message(chat_id, format!("Generating today's horoscope for {}...", sign))
                .await?;
            deliver_reading(
                bot,
                chat_id,
                context.user_id,
                &prompts::daily_horoscope(sign),
                0,
            )
            .await?;
        }
        AstrologyState::Compatibility { first_sign: None } => {
            state.sessions.update(context.user_id, |user| {
                DialogueService::enter_mode(
                    user,
                    ConversationState::Astrology(AstrologyState::Compatibility {
                        first_sign: Some(sign),
                    }),
                )
            });
            bot.send_message(
                chat_id,
                format!("First sign: {}\n\nNow pick the second sign:", sign),
            )
            .reply_markup(keyboard::zodiac_signs())
            .await?;
        }
        AstrologyState::Compatibility {
            first_sign: Some(first),
        } => {
            bot.send_message(
                chat_id,
                format!("Analyzing the compatibility of {} and {}...", first, sign),
            )
            .await?;
            deliver_reading(
                bot,
                chat_id,
                context.user_id,
                &prompts::compatibility(first, sign),
                costs::COMPATIBILITY,
            )
            .await?;
        }
        _ => {
            bot.send_message(chat_id, "Pick a service from the astrology menu first.")
                .await?;
        }
    }

    Ok(())
}
