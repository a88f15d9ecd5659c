mod model;

pub use model::{Frequency, Subscription, SubscriptionKind};

use chrono::{DateTime, Utc};
use teloxide::types::UserId;

use crate::services::user::UserRecord;
use crate::storage::SessionRepository;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SubscriptionError {
    #[error("No subscription at index {index}")]
    NotFound { index: usize },

    #[error("Not enough coins: need {required}, have {balance}")]
    InsufficientFunds { required: u32, balance: u32 },

    #[error("Unknown user {0}")]
    UnknownUser(UserId),
}

impl UserRecord {
    /// Adds a subscription, replacing any existing one of the same
    /// `(kind, frequency)` pair so at most one such entry exists.
    pub fn subscribe(
        &mut self,
        kind: SubscriptionKind,
        frequency: Frequency,
        duration_days: i64,
        now: DateTime<Utc>,
    ) -> Subscription {
        self.subscriptions
            .retain(|s| !(s.kind == kind && s.frequency == frequency));
        let subscription = Subscription::new(kind, frequency, duration_days, now);
        self.subscriptions.push(subscription.clone());
        subscription
    }

    pub fn cancel_subscription(&mut self, index: usize) -> Result<Subscription, SubscriptionError> {
        if index >= self.subscriptions.len() {
            return Err(SubscriptionError::NotFound { index });
        }
        Ok(self.subscriptions.remove(index))
    }

    /// Active subscriptions in insertion order.
    pub fn active_subscriptions(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.iter().filter(move |s| s.is_active(now))
    }

    pub fn has_active_subscription(
        &self,
        kind: SubscriptionKind,
        frequency: Frequency,
        now: DateTime<Utc>,
    ) -> bool {
        self.active_subscriptions(now)
            .any(|s| s.kind == kind && s.frequency == frequency)
    }

    pub fn remove_expired_subscriptions(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.is_active(now));
        before - self.subscriptions.len()
    }
}

#[derive(Clone)]
pub struct SubscriptionService {
    sessions: SessionRepository,
}

impl SubscriptionService {
    pub fn new(sessions: SessionRepository) -> Self {
        Self { sessions }
    }

    /// Deducts the price and records the subscription as one step under the
    /// user's record lock, so no scan can observe a deducted-but-unsubscribed
    /// record and insufficient funds leave the record untouched.
    pub fn purchase(
        &self,
        user_id: UserId,
        kind: SubscriptionKind,
        frequency: Frequency,
        duration_days: i64,
        cost: u32,
        now: DateTime<Utc>,
    ) -> Result<Subscription, SubscriptionError> {
        let result = self.sessions.update(user_id, |user| {
            if !user.deduct(cost) {
                return Err(SubscriptionError::InsufficientFunds {
                    required: cost,
                    balance: user.coins,
                });
            }
            Ok(user.subscribe(kind, frequency, duration_days, now))
        });

        match result {
            Some(Ok(subscription)) => {
                info!(
                    "User {} subscribed to {} ({}) for {} days",
                    user_id, kind, frequency, duration_days
                );
                Ok(subscription)
            }
            Some(Err(e)) => Err(e),
            None => Err(SubscriptionError::UnknownUser(user_id)),
        }
    }

    pub fn cancel(&self, user_id: UserId, index: usize) -> Result<Subscription, SubscriptionError> {
        self.sessions
            .update(user_id, |user| user.cancel_subscription(index))
            .unwrap_or(Err(SubscriptionError::UnknownUser(user_id)))
    }

    /// Removes lapsed subscriptions across every record. Returns the per-user
    /// removed counts so the caller can notify exactly the affected users.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<(UserId, usize)> {
        let mut lapsed = Vec::new();
        for id in self.sessions.user_ids() {
            if let Some(removed) = self
                .sessions
                .update(id, |user| user.remove_expired_subscriptions(now))
            {
                if removed > 0 {
                    lapsed.push((id, removed));
                }
            }
        }
        lapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user::STARTING_COINS;
    use chrono::Duration;

    fn test_user() -> UserRecord {
        UserRecord::new(UserId(1), "Test", None)
    }

    async fn test_repo() -> (SessionRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let repo = SessionRepository::load(dir.path().join("sessions.json"))
            .await
            .unwrap();
        (repo, dir)
    }

    #[test]
    fn test_subscribe_replaces_same_pair() {
        let mut user = test_user();
        let now = Utc::now();

        user.subscribe(SubscriptionKind::Tarot, Frequency::Daily, 7, now);
        let second = user.subscribe(SubscriptionKind::Tarot, Frequency::Daily, 30, now);

        assert_eq!(user.subscriptions.len(), 1);
        assert_eq!(user.subscriptions[0].id, second.id);
        assert_eq!(user.subscriptions[0].expires_at, now + Duration::days(30));
    }

    #[test]
    fn test_subscribe_keeps_other_pairs() {
        let mut user = test_user();
        let now = Utc::now();

        user.subscribe(SubscriptionKind::Tarot, Frequency::Daily, 30, now);
        user.subscribe(SubscriptionKind::Tarot, Frequency::Weekly, 30, now);

        assert_eq!(user.subscriptions.len(), 2);
    }

    #[test]
    fn test_cancel_out_of_range() {
        let mut user = test_user();
        let now = Utc::now();
        user.subscribe(SubscriptionKind::Tarot, Frequency::Daily, 30, now);

        assert_eq!(
            user.cancel_subscription(1),
            Err(SubscriptionError::NotFound { index: 1 })
        );
        assert_eq!(user.subscriptions.len(), 1);

        assert!(user.cancel_subscription(0).is_ok());
        assert!(user.subscriptions.is_empty());
    }

    #[test]
    fn test_active_subscriptions_filters_and_keeps_order() {
        let mut user = test_user();
        let now = Utc::now();

        user.subscribe(SubscriptionKind::Tarot, Frequency::Daily, 1, now - Duration::days(2));
        user.subscribe(SubscriptionKind::Tarot, Frequency::Weekly, 30, now);

        let active: Vec<_> = user.active_subscriptions(now).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].frequency, Frequency::Weekly);
    }

    #[tokio::test]
    async fn test_purchase_insufficient_funds_leaves_record_untouched() {
        let (repo, _dir) = test_repo().await;
        let service = SubscriptionService::new(repo.clone());
        repo.get_or_create(UserId(1), "Test", None);

        let result = service.purchase(
            UserId(1),
            SubscriptionKind::Tarot,
            Frequency::Daily,
            30,
            STARTING_COINS + 1,
            Utc::now(),
        );

        assert!(matches!(
            result,
            Err(SubscriptionError::InsufficientFunds { .. })
        ));
        let record = repo.get(UserId(1)).unwrap();
        assert_eq!(record.coins, STARTING_COINS);
        assert!(record.subscriptions.is_empty());
    }

    #[tokio::test]
    async fn test_purchase_deducts_and_subscribes_atomically() {
        let (repo, _dir) = test_repo().await;
        let service = SubscriptionService::new(repo.clone());
        repo.get_or_create(UserId(1), "Test", None);
        repo.update(UserId(1), |u| u.credit(10));

        let now = Utc::now();
        let subscription = service
            .purchase(UserId(1), SubscriptionKind::Tarot, Frequency::Daily, 30, 10, now)
            .unwrap();

        let record = repo.get(UserId(1)).unwrap();
        assert_eq!(record.coins, STARTING_COINS);
        assert_eq!(record.subscriptions.len(), 1);
        assert_eq!(record.subscriptions[0].id, subscription.id);
        assert_eq!(subscription.expires_at, now + Duration::days(30));
    }

    #[tokio::test]
    async fn test_sweep_expired_reports_per_user_and_is_idempotent() {
        let (repo, _dir) = test_repo().await;
        let service = SubscriptionService::new(repo.clone());
        let now = Utc::now();

        repo.get_or_create(UserId(1), "A", None);
        repo.update(UserId(1), |u| {
            u.subscribe(SubscriptionKind::Tarot, Frequency::Daily, 1, now - Duration::days(2));
            u.subscribe(SubscriptionKind::Tarot, Frequency::Weekly, 30, now);
        });
        repo.get_or_create(UserId(2), "B", None);
        repo.update(UserId(2), |u| {
            u.subscribe(SubscriptionKind::Tarot, Frequency::Daily, 30, now);
        });

        let lapsed = service.sweep_expired(now);
        assert_eq!(lapsed, vec![(UserId(1), 1)]);

        let record = repo.get(UserId(1)).unwrap();
        assert_eq!(record.subscriptions.len(), 1);
        assert_eq!(record.subscriptions[0].frequency, Frequency::Weekly);

        // Nothing left to remove on a second pass at the same instant.
        assert!(service.sweep_expired(now).is_empty());
    }
}
