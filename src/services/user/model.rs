use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use teloxide::types::UserId;

use crate::services::dialogue::ConversationState;
use crate::services::subscription::Subscription;

/// Welcome grant for a first-time user.
pub const STARTING_COINS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub username: Option<String>,
    pub coins: u32,
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub conversation: ConversationState,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    #[serde(default)]
    pub activity: HashMap<String, u32>,
    #[serde(default)]
    pub last_daily_card_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn new(id: UserId, first_name: &str, username: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id,
            first_name: first_name.to_string(),
            username: username.map(str::to_string),
            coins: STARTING_COINS,
            subscriptions: Vec::new(),
            conversation: ConversationState::Idle,
            created_at: now,
            last_activity_at: now,
            activity: HashMap::new(),
            last_daily_card_at: None,
        }
    }

    /// Atomic check-then-decrement. A zero amount is a caller bug.
    pub fn deduct(&mut self, amount: u32) -> bool {
        debug_assert!(amount > 0, "deduct amount must be positive");
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }

    pub fn credit(&mut self, amount: u32) -> u32 {
        self.coins += amount;
        self.coins
    }

    /// Bumps the activity counter for an update category. Analytics only.
    pub fn touch(&mut self, category: &str) {
        self.last_activity_at = Utc::now();
        *self.activity.entry(category.to_string()).or_insert(0) += 1;
    }

    /// One free daily card per local calendar day.
    pub fn can_draw_daily_card(&self, now: DateTime<Utc>) -> bool {
        match self.last_daily_card_at {
            Some(last) => {
                last.with_timezone(&Local).date_naive() < now.with_timezone(&Local).date_naive()
            }
            None => true,
        }
    }

    pub fn mark_daily_card(&mut self, now: DateTime<Utc>) {
        self.last_daily_card_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_user() -> UserRecord {
        UserRecord::new(UserId(1), "Test", Some("test"))
    }

    #[test]
    fn test_new_user_defaults() {
        let user = test_user();
        assert_eq!(user.coins, STARTING_COINS);
        assert!(user.subscriptions.is_empty());
        assert_eq!(user.conversation, ConversationState::Idle);
    }

    #[test]
    fn test_deduct_fails_without_mutation_when_short() {
        let mut user = test_user();
        assert!(!user.deduct(STARTING_COINS + 1));
        assert_eq!(user.coins, STARTING_COINS);
    }

    #[test]
    fn test_deduct_down_to_zero() {
        let mut user = test_user();
        assert!(user.deduct(STARTING_COINS));
        assert_eq!(user.coins, 0);
        assert!(!user.deduct(1));
        assert_eq!(user.coins, 0);
    }

    #[test]
    fn test_credit_returns_new_balance() {
        let mut user = test_user();
        assert_eq!(user.credit(20), STARTING_COINS + 20);
    }

    #[test]
    fn test_deduct_then_refund_nets_zero() {
        let mut user = test_user();
        let before = user.coins;
        assert!(user.deduct(3));
        user.credit(3);
        assert_eq!(user.coins, before);
    }

    #[test]
    fn test_daily_card_once_per_day() {
        let mut user = test_user();
        let now = Utc::now();

        assert!(user.can_draw_daily_card(now));
        user.mark_daily_card(now);
        assert!(!user.can_draw_daily_card(now));
        assert!(user.can_draw_daily_card(now + Duration::days(1)));
    }

    #[test]
    fn test_touch_counts_categories() {
        let mut user = test_user();
        user.touch("message");
        user.touch("message");
        user.touch("callback_query");
        assert_eq!(user.activity.get("message"), Some(&2));
        assert_eq!(user.activity.get("callback_query"), Some(&1));
    }
}
