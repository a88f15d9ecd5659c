use chrono::Utc;
use teloxide::adaptors::Throttle;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::HandlerResult;
use crate::services::dialogue::{ConversationState, DialogueService, TarotState};
use crate::services::divination::{prompts, tarot};
use crate::services::subscription::{Frequency, SubscriptionError, SubscriptionKind};
use crate::state::AppState;
use crate::utils::{format_expiry, keyboard};

use super::super::{costs, deliver_reading, send_insufficient_funds, RequestContext};

const SUBSCRIPTION_DAYS: i64 = 30;

pub(super) async fn open_menu(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
) -> HandlerResult<()> {
    let state = AppState::get()?;
    state.sessions.update(context.user_id, |user| {
        DialogueService::enter_mode(user, ConversationState::Tarot(TarotState::Menu))
    });

    bot.send_message(chat_id, "🎴 You picked Tarot. Choose a spread:")
        .reply_markup(keyboard::tarot_menu())
        .await?;

    Ok(())
}

/// The card of the day is free, once per calendar day.
pub(super) async fn handle_daily_card(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
) -> HandlerResult<()> {
    let state = AppState::get()?;
    let now = Utc::now();

    let allowed = state
        .sessions
        .update(context.user_id, |user| {
            if !user.can_draw_daily_card(now) {
                return false;
            }
            user.mark_daily_card(now);
            true
        })
        .unwrap_or(false);

    if !allowed {
        bot.send_message(
            chat_id,
            "You already received your card of the day. Come back tomorrow or pick another spread.",
        )
        .await?;
        return Ok(());
    }

    let card = tarot::draw_card();
    bot.send_message(chat_id, format!("🔮 Your card of the day: {}", card))
        .await?;
    bot.send_message(chat_id, "Interpreting your card...").await?;

    deliver_reading(bot, chat_id, context.user_id, &prompts::card_of_day(card), 0).await
}

pub(super) async fn handle_simple_spread(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
) -> HandlerResult<()> {
    run_spread(
        bot,
        chat_id,
        context,
        "🌙 Past-Present-Future spread",
        costs::TAROT_SIMPLE_SPREAD,
        &tarot::SIMPLE_SPREAD_POSITIONS,
        prompts::simple_spread,
    )
    .await
}

pub(super) async fn handle_celtic_cross(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
) -> HandlerResult<()> {
    run_spread(
        bot,
        chat_id,
        context,
        "💫 Celtic Cross spread",
        costs::TAROT_CELTIC_CROSS,
        &tarot::CELTIC_CROSS_POSITIONS,
        prompts::celtic_cross,
    )
    .await
}

pub(super) async fn handle_love_spread(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
) -> HandlerResult<()> {
    run_spread(
        bot,
        chat_id,
        context,
        "💝 Love spread",
        costs::TAROT_LOVE_SPREAD,
        &tarot::LOVE_SPREAD_POSITIONS,
        prompts::love_spread,
    )
    .await
}

async fn run_spread(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
    name: &str,
    cost: u32,
    positions: &[&str],
    prompt_for: fn(&[&str]) -> String,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    let charged = state
        .sessions
        .update(context.user_id, |user| user.deduct(cost))
        .unwrap_or(false);
    if !charged {
        return send_insufficient_funds(bot, chat_id, cost).await;
    }

    let cards = tarot::draw_spread(positions.len());

    let mut lines = vec![format!("{} ({} coins spent):", name, cost), String::new()];
    for (position, card) in positions.iter().zip(&cards) {
        lines.push(format!("{}: {}", position, card));
    }
    bot.send_message(chat_id, lines.join("\n")).await?;
    bot.send_message(chat_id, "Interpreting your spread...").await?;

    deliver_reading(bot, chat_id, context.user_id, &prompt_for(&cards), cost).await
}

pub(super) async fn handle_subscribe(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    context: &RequestContext,
    frequency: Frequency,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    match state.subscriptions.purchase(
        context.user_id,
        SubscriptionKind::Tarot,
        frequency,
        SUBSCRIPTION_DAYS,
        costs::TAROT_SUBSCRIPTION,
        Utc::now(),
    ) {
        Ok(subscription) => {
            let cadence = match frequency {
                Frequency::Daily => "Every morning at 08:00",
                Frequency::Weekly => "Every Monday at 09:00",
            };
            bot.send_message(
                chat_id,
                format!(
                    "✅ You are subscribed to the {} tarot reading ({} coins).\n\n\
                     {} you will receive a fresh reading with a detailed interpretation.\n\n\
                     Valid until: {}",
                    frequency,
                    costs::TAROT_SUBSCRIPTION,
                    cadence,
                    format_expiry(subscription.expires_at)
                ),
            )
            .await?;
        }
        Err(SubscriptionError::InsufficientFunds { required, .. }) => {
            send_insufficient_funds(bot, chat_id, required).await?;
        }
        Err(e) => {
            error!("Subscription purchase failed for user {}: {}", context.user_id, e);
            bot.send_message(chat_id, "😔 Could not complete the subscription. Please try again later.")
                .await?;
        }
    }

    Ok(())
}
