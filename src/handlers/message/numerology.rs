use chrono::{Datelike, Utc};
use teloxide::adaptors::Throttle;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::HandlerResult;
use crate::services::dialogue::{
    ConversationState, DialogueService, FullAnalysisStep, NumerologyState,
};
use crate::services::divination::{numerology, prompts};
use crate::state::AppState;
use crate::utils::validation;

use super::super::{costs, deliver_reading, RequestContext};

const INVALID_DATE_REPROMPT: &str =
    "❌ Invalid date format. Please send the date as DD.MM.YYYY (e.g. 15.06.1990)";

pub(super) async fn handle_text(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
    num_state: NumerologyState,
    text: &str,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    match num_state {
        NumerologyState::AwaitingLifePathDate => match validation::parse_birth_date(text) {
            Ok(birth_date) => {
                let number = numerology::life_path_number(birth_date);
                bot.send_message(chat_id, "🔄 Calculating your life path number...")
                    .await?;
                bot.send_message(chat_id, format!("🛣️ Your life path number: {}", number))
                    .await?;
                deliver_reading(
                    bot,
                    chat_id,
                    context.user_id,
                    &prompts::life_path(number, birth_date),
                    costs::LIFE_PATH,
                )
                .await?;
            }
            Err(_) => {
                bot.send_message(chat_id, INVALID_DATE_REPROMPT).await?;
            }
        },

        NumerologyState::AwaitingDestinyName => match validation::parse_free_text(text) {
            Ok(name) => {
                let number = numerology::destiny_number(name);
                bot.send_message(chat_id, "🔄 Calculating your destiny number...")
                    .await?;
                bot.send_message(chat_id, format!("🌟 Your destiny number: {}", number))
                    .await?;
                deliver_reading(
                    bot,
                    chat_id,
                    context.user_id,
                    &prompts::destiny(number, name),
                    costs::DESTINY,
                )
                .await?;
            }
            Err(_) => {
                bot.send_message(chat_id, "❌ That name is too short. Please send your full birth name.")
                    .await?;
            }
        },

        NumerologyState::FullAnalysis(FullAnalysisStep::AwaitingBirthDate) => {
            match validation::parse_birth_date(text) {
                Ok(birth_date) => {
                    state.sessions.update(context.user_id, |user| {
                        DialogueService::enter_mode(
                            user,
                            ConversationState::Numerology(NumerologyState::FullAnalysis(
                                FullAnalysisStep::AwaitingFullName { birth_date },
                            )),
                        )
                    });
                    bot.send_message(chat_id, "Now send your full birth name:").await?;
                }
                Err(_) => {
                    bot.send_message(chat_id, INVALID_DATE_REPROMPT).await?;
                }
            }
        }

        NumerologyState::FullAnalysis(FullAnalysisStep::AwaitingFullName { birth_date }) => {
            match validation::parse_free_text(text) {
                Ok(name) => {
                    let life_path = numerology::life_path_number(birth_date);
                    let destiny = numerology::destiny_number(name);
                    let personal_year =
                        numerology::personal_year_number(birth_date, Utc::now().year());

                    bot.send_message(chat_id, "🔄 Preparing your full numerology analysis...")
                        .await?;
                    bot.send_message(
                        chat_id,
                        format!(
                            "📊 Full numerology analysis\n\n\
                             🛣️ Life path number: {}\n\
                             🌟 Destiny number: {}\n\
                             📅 Personal year: {}",
                            life_path, destiny, personal_year
                        ),
                    )
                    .await?;
                    deliver_reading(
                        bot,
                        chat_id,
                        context.user_id,
                        &prompts::full_numerology(life_path, destiny, personal_year, birth_date, name),
                        costs::FULL_ANALYSIS,
                    )
                    .await?;
                }
                Err(_) => {
                    bot.send_message(chat_id, "❌ That name is too short. Please send your full birth name.")
                        .await?;
                }
            }
        }

        NumerologyState::Menu => {}
    }

    Ok(())
}
