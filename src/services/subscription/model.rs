use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionKind {
    Tarot,
}

impl fmt::Display for SubscriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionKind::Tarot => write!(f, "TAROT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub kind: SubscriptionKind,
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        kind: SubscriptionKind,
        frequency: Frequency,
        duration_days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        debug_assert!(duration_days > 0, "subscription duration must be positive");
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            frequency,
            created_at: now,
            expires_at: now + Duration::days(duration_days),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
