mod astrology;
mod numerology;
mod palmistry;
mod tarot;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;

use crate::error::HandlerResult;
use crate::services::dialogue::DialogueService;
use crate::services::divination::ZodiacSign;
use crate::services::payment as payment_service;
use crate::services::subscription::Frequency;
use crate::state::AppState;
use crate::utils::{self, keyboard};

use super::{command, payment, subscriptions, RequestContext};

pub(super) fn get_callback_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_callback_query().endpoint(handle_callback)
}

async fn handle_callback(
    bot: Throttle<Bot>,
    q: CallbackQuery,
    context: RequestContext,
) -> HandlerResult<()> {
    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let chat_id = q
        .message
        .as_ref()
        .map(|message| message.chat().id)
        .unwrap_or_else(|| utils::chat_of(context.user_id));

    let state = AppState::get()?;

    match data.as_str() {
        "main_menu" => {
            state
                .sessions
                .update(context.user_id, DialogueService::back_to_main);
            bot.send_message(chat_id, "Main menu:")
                .reply_markup(keyboard::main_menu())
                .await?;
        }

        "menu_tarot" => tarot::open_menu(&bot, chat_id, &context).await?,
        "menu_palmistry" => palmistry::open_menu(&bot, chat_id, &context).await?,
        "menu_astrology" => astrology::open_menu(&bot, chat_id, &context).await?,
        "menu_numerology" => numerology::open_menu(&bot, chat_id, &context).await?,

        "show_balance" => {
            let coins = state
                .sessions
                .get(context.user_id)
                .map(|user| user.coins)
                .unwrap_or(0);
            bot.send_message(chat_id, format!("💰 Your balance: {} coins", coins))
                .await?;
        }
        "show_shop" => payment::send_shop(&bot, chat_id).await?,
        "show_subscriptions" => {
            subscriptions::send_overview(&bot, chat_id, context.user_id).await?
        }
        "show_help" => {
            bot.send_message(chat_id, command::help_text())
                .reply_markup(keyboard::back_to_main_menu())
                .await?;
        }
        "close_shop" => {
            if let Some(message) = &q.message {
                bot.delete_message(chat_id, message.id()).await?;
            }
        }

        "tarot_daily_card" => tarot::handle_daily_card(&bot, chat_id, &context).await?,
        "tarot_simple_spread" => tarot::handle_simple_spread(&bot, chat_id, &context).await?,
        "tarot_celtic_cross" => tarot::handle_celtic_cross(&bot, chat_id, &context).await?,
        "tarot_love_spread" => tarot::handle_love_spread(&bot, chat_id, &context).await?,
        "tarot_sub_daily" => {
            tarot::handle_subscribe(&bot, chat_id, &context, Frequency::Daily).await?
        }
        "tarot_sub_weekly" => {
            tarot::handle_subscribe(&bot, chat_id, &context, Frequency::Weekly).await?
        }

        "astro_natal" | "astro_horoscope" | "astro_compat" | "astro_forecast" => {
            astrology::handle_action(&bot, chat_id, &context, &data).await?
        }

        "num_life_path" | "num_destiny" | "num_full" => {
            numerology::handle_action(&bot, chat_id, &context, &data).await?
        }

        "palm_reading" => palmistry::handle_reading_request(&bot, chat_id, &context).await?,

        other => {
            if let Some(sign) = ZodiacSign::from_callback_data(other) {
                astrology::handle_sign(&bot, chat_id, &context, sign).await?;
            } else if let Some(index) = other
                .strip_prefix("unsub_")
                .and_then(|raw| raw.parse::<usize>().ok())
            {
                subscriptions::handle_cancel(&bot, &q, chat_id, context.user_id, index).await?;
            } else if let Some((coins, price)) = payment_service::parse_buy_callback(other) {
                payment::send_invoice(&bot, chat_id, coins, price).await?;
            } else {
                warn!("Unknown callback data: {}", other);
            }
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;
    super::persist_sessions().await;

    Ok(())
}
