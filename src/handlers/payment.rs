use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::dptree;
use teloxide::payloads::{SendInvoiceSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{ChatId, LabeledPrice, Message, PreCheckoutQuery};

use crate::config::AppConfig;
use crate::error::HandlerResult;
use crate::services::payment;
use crate::state::AppState;
use crate::utils::keyboard;

use super::RequestContext;

pub(super) fn get_payment_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    dptree::entry()
        .branch(Update::filter_pre_checkout_query().endpoint(handle_pre_checkout))
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.successful_payment().is_some())
                .endpoint(handle_successful_payment),
        )
}

async fn handle_pre_checkout(bot: Throttle<Bot>, query: PreCheckoutQuery) -> HandlerResult<()> {
    bot.answer_pre_checkout_query(query.id.clone(), true).await?;
    info!("Pre-checkout confirmed for user {}", query.from.id);
    Ok(())
}

async fn handle_successful_payment(
    bot: Throttle<Bot>,
    msg: Message,
    context: RequestContext,
) -> HandlerResult<()> {
    let state = AppState::get()?;

    let Some(successful_payment) = msg.successful_payment() else {
        return Ok(());
    };

    match payment::parse_invoice_payload(&successful_payment.invoice_payload) {
        Ok(amount) => {
            let balance = state
                .sessions
                .update(context.user_id, |user| user.credit(amount))
                .unwrap_or(0);

            super::persist_sessions().await;

            bot.send_message(
                msg.chat.id,
                format!(
                    "✅ Payment successful!\n\n🪙 {} coins added to your balance.\n💰 New balance: {} coins",
                    amount, balance
                ),
            )
            .await?;

            info!(
                "User {} successfully purchased {} coins. New balance: {}",
                context.user_id, amount, balance
            );
        }
        Err(e) => {
            error!("Invalid payment payload from user {}: {}", context.user_id, e);
            bot.send_message(
                msg.chat.id,
                "⚠️ Something went wrong with this payment. Please contact support.",
            )
            .await?;
        }
    }

    Ok(())
}

pub(super) async fn send_shop(bot: &Throttle<Bot>, chat_id: ChatId) -> HandlerResult<()> {
    let config = AppConfig::get()?;
    bot.send_message(chat_id, "🛒 Pick a coin package:")
        .reply_markup(keyboard::shop(&config.payment.currency))
        .await?;
    Ok(())
}

pub(super) async fn send_invoice(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    coins: u32,
    price: u32,
) -> HandlerResult<()> {
    let config = AppConfig::get()?;

    let Some(provider_token) = config.payment.provider_token.clone() else {
        error!("PROVIDER_TOKEN is not configured");
        bot.send_message(
            chat_id,
            "⚠️ Payments are not set up yet. Please contact the administrator.",
        )
        .await?;
        return Ok(());
    };

    bot.send_invoice(
        chat_id,
        format!("{} coins for Lunora", coins),
        format!("Top up your balance with {} coins to unlock more readings", coins),
        payment::invoice_payload(coins),
        provider_token,
        config.payment.currency.clone(),
        // Smallest currency units.
        [LabeledPrice {
            label: format!("{} coins", coins),
            amount: (price * 100) as u32,
        }],
    )
    .start_parameter("get_coins")
    .await?;

    info!("Invoice for {} coins sent to chat {}", coins, chat_id);

    Ok(())
}
