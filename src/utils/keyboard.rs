use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::services::divination::ZodiacSign;
use crate::services::payment::COIN_PACKAGES;
use crate::services::user::UserRecord;
use crate::utils::format_expiry;

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            InlineKeyboardButton::callback("🎴 Tarot", "menu_tarot"),
            InlineKeyboardButton::callback("✋ Palm Reading", "menu_palmistry"),
        ],
        vec![
            InlineKeyboardButton::callback("✨ Astrology", "menu_astrology"),
            InlineKeyboardButton::callback("🔢 Numerology", "menu_numerology"),
        ],
        vec![
            InlineKeyboardButton::callback("💰 Balance", "show_balance"),
            InlineKeyboardButton::callback("🛒 Shop", "show_shop"),
        ],
        vec![
            InlineKeyboardButton::callback("📅 My Subscriptions", "show_subscriptions"),
            InlineKeyboardButton::callback("❓ Help", "show_help"),
        ],
    ])
}

pub fn back_to_main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::callback(
        "🔄 Back to Main Menu",
        "main_menu",
    )]])
}

pub fn tarot_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            InlineKeyboardButton::callback("🔮 Card of the Day", "tarot_daily_card"),
            InlineKeyboardButton::callback("🌙 Simple Spread", "tarot_simple_spread"),
        ],
        vec![
            InlineKeyboardButton::callback("💫 Celtic Cross", "tarot_celtic_cross"),
            InlineKeyboardButton::callback("💝 Love Spread", "tarot_love_spread"),
        ],
        vec![
            InlineKeyboardButton::callback("📬 Daily Subscription", "tarot_sub_daily"),
            InlineKeyboardButton::callback("📮 Weekly Subscription", "tarot_sub_weekly"),
        ],
        vec![InlineKeyboardButton::callback(
            "🔄 Back to Main Menu",
            "main_menu",
        )],
    ])
}

pub fn palmistry_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![InlineKeyboardButton::callback(
            "✋ Palm Reading",
            "palm_reading",
        )],
        vec![InlineKeyboardButton::callback(
            "🔄 Back to Main Menu",
            "main_menu",
        )],
    ])
}

pub fn astrology_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            InlineKeyboardButton::callback("🌟 Natal Chart", "astro_natal"),
            InlineKeyboardButton::callback("🌓 Daily Horoscope", "astro_horoscope"),
        ],
        vec![
            InlineKeyboardButton::callback("🌙 Sign Compatibility", "astro_compat"),
            InlineKeyboardButton::callback("📅 3-Month Forecast", "astro_forecast"),
        ],
        vec![InlineKeyboardButton::callback(
            "🔄 Back to Main Menu",
            "main_menu",
        )],
    ])
}

pub fn numerology_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            InlineKeyboardButton::callback("🛣️ Life Path Number", "num_life_path"),
            InlineKeyboardButton::callback("🌟 Destiny Number", "num_destiny"),
        ],
        vec![InlineKeyboardButton::callback(
            "📊 Full Analysis",
            "num_full",
        )],
        vec![InlineKeyboardButton::callback(
            "🔄 Back to Main Menu",
            "main_menu",
        )],
    ])
}

/// All twelve signs, three per row.
pub fn zodiac_signs() -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = ZodiacSign::ALL
        .chunks(3)
        .map(|signs| {
            signs
                .iter()
                .map(|sign| InlineKeyboardButton::callback(sign.label(), sign.callback_data()))
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

/// One cancel button per subscription. Indices match the stored list so a
/// `unsub_<idx>` callback maps straight to `cancel_subscription`.
pub fn subscription_list(user: &UserRecord) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = user
        .subscriptions
        .iter()
        .enumerate()
        .map(|(i, sub)| {
            vec![InlineKeyboardButton::callback(
                format!("❌ Cancel: {} ({})", sub.kind, sub.frequency),
                format!("unsub_{}", i),
            )]
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

pub fn shop(currency: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = COIN_PACKAGES
        .iter()
        .map(|(coins, price)| {
            vec![InlineKeyboardButton::callback(
                format!("{} coins - {} {}", coins, price, currency),
                format!("buy_{}_{}", coins, price),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("❌ Close", "close_shop")]);
    InlineKeyboardMarkup::new(rows)
}

/// Text body for the subscription overview message.
pub fn subscription_overview(user: &UserRecord) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    for (i, sub) in user.subscriptions.iter().enumerate() {
        lines.push(format!(
            "{}. {} - {} (until {})",
            i + 1,
            sub.kind,
            sub.frequency,
            format_expiry(sub.expires_at)
        ));
    }
    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "📊 Your active subscriptions:\n\n{}\n\nTap a button below to cancel one.",
        lines.join("\n")
    ))
}
