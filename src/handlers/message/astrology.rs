use teloxide::adaptors::Throttle;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::HandlerResult;
use crate::services::dialogue::{
    AstrologyState, ConversationState, DialogueService, NatalChartStep,
};
use crate::services::divination::prompts;
use crate::state::AppState;
use crate::utils::validation;

use super::super::{costs, deliver_reading, RequestContext};

const INVALID_DATE_REPROMPT: &str =
    "❌ Invalid date format. Please send the date as DD.MM.YYYY (e.g. 15.06.1990)";
const INVALID_TIME_REPROMPT: &str =
    "❌ Invalid time format. Please send the time as HH:MM (e.g. 14:30) or \"unknown\"";

pub(super) async fn handle_text(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
    astro: AstrologyState,
    text: &str,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    match astro {
        AstrologyState::NatalChart(NatalChartStep::AwaitingBirthDate) => {
            match validation::parse_birth_date(text) {
                Ok(birth_date) => {
                    state.sessions.update(context.user_id, |user| {
                        DialogueService::enter_mode(
                            user,
                            ConversationState::Astrology(AstrologyState::NatalChart(
                                NatalChartStep::AwaitingBirthTime { birth_date },
                            )),
                        )
                    });
                    bot.send_message(
                        chat_id,
                        format!(
                            "Birth date: {}\n\nNow send your birth time as HH:MM (e.g. 14:30).\n\
                             If you don't know the exact time, send \"unknown\".",
                            birth_date
                        ),
                    )
                    .await?;
                }
                Err(_) => {
                    bot.send_message(chat_id, INVALID_DATE_REPROMPT).await?;
                }
            }
        }

        AstrologyState::NatalChart(NatalChartStep::AwaitingBirthTime { birth_date }) => {
            match validation::parse_birth_time(text) {
                Ok(birth_time) => {
                    state.sessions.update(context.user_id, |user| {
                        DialogueService::enter_mode(
                            user,
                            ConversationState::Astrology(AstrologyState::NatalChart(
                                NatalChartStep::AwaitingBirthPlace {
                                    birth_date,
                                    birth_time,
                                },
                            )),
                        )
                    });
                    bot.send_message(
                        chat_id,
                        format!(
                            "Birth time: {}\n\nNow send your birth place (city, country).",
                            birth_time
                        ),
                    )
                    .await?;
                }
                Err(_) => {
                    bot.send_message(chat_id, INVALID_TIME_REPROMPT).await?;
                }
            }
        }

        AstrologyState::NatalChart(NatalChartStep::AwaitingBirthPlace {
            birth_date,
            birth_time,
        }) => match validation::parse_free_text(text) {
            Ok(birth_place) => {
                bot.send_message(
                    chat_id,
                    format!(
                        "Building your natal chart for:\n\n\
                         Birth date: {}\nBirth time: {}\nBirth place: {}\n\n\
                         This can take a few minutes...",
                        birth_date, birth_time, birth_place
                    ),
                )
                .await?;
                deliver_reading(
                    bot,
                    chat_id,
                    context.user_id,
                    &prompts::natal_chart(birth_date, birth_time, birth_place),
                    costs::NATAL_CHART,
                )
                .await?;
            }
            Err(_) => {
                bot.send_message(chat_id, "❌ Please send a real birth place (city, country).")
                    .await?;
            }
        },

        AstrologyState::AwaitingForecastBirthDate => match validation::parse_birth_date(text) {
            Ok(birth_date) => {
                bot.send_message(
                    chat_id,
                    format!(
                        "Generating a three-month forecast for a person born on {}...",
                        birth_date
                    ),
                )
                .await?;
                deliver_reading(
                    bot,
                    chat_id,
                    context.user_id,
                    &prompts::forecast(birth_date),
                    costs::FORECAST,
                )
                .await?;
            }
            Err(_) => {
                bot.send_message(chat_id, INVALID_DATE_REPROMPT).await?;
            }
        },

        // Menu, horoscope and compatibility wait for sign taps, not text.
        _ => {}
    }

    Ok(())
}
