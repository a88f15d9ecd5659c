use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, Local, NaiveTime, Utc, Weekday};
use teloxide::adaptors::Throttle;
use teloxide::prelude::*;

use crate::services::divination::{prompts, tarot, GenerationClient};
use crate::services::subscription::{Frequency, SubscriptionKind, SubscriptionService};
use crate::services::user::UserRecord;
use crate::storage::SessionRepository;
use crate::utils;

/// Fire times mirror the original service schedule. The sweep runs well
/// before either delivery job so a lapsed subscription never receives that
/// day's reading.
const SWEEP_TIME: (u32, u32) = (3, 0);
const DAILY_DELIVERY_TIME: (u32, u32) = (8, 0);
const WEEKLY_DELIVERY_DAY: Weekday = Weekday::Mon;
const WEEKLY_DELIVERY_TIME: (u32, u32) = (9, 0);

#[derive(Clone)]
pub struct Scheduler {
    bot: Throttle<Bot>,
    sessions: SessionRepository,
    subscriptions: SubscriptionService,
    generation: GenerationClient,
}

impl Scheduler {
    pub fn new(
        bot: Throttle<Bot>,
        sessions: SessionRepository,
        subscriptions: SubscriptionService,
        generation: GenerationClient,
    ) -> Self {
        Self {
            bot,
            sessions,
            subscriptions,
            generation,
        }
    }

    /// Spawns the three recurring jobs onto the runtime.
    pub fn start(&self) {
        let sweeper = self.clone();
        tokio::spawn(async move {
            loop {
                let wait = duration_until_daily(Local::now(), SWEEP_TIME.0, SWEEP_TIME.1);
                tokio::time::sleep(wait).await;
                sweeper.run_expiry_sweep(Utc::now()).await;
            }
        });

        let daily = self.clone();
        tokio::spawn(async move {
            loop {
                let wait = duration_until_daily(
                    Local::now(),
                    DAILY_DELIVERY_TIME.0,
                    DAILY_DELIVERY_TIME.1,
                );
                tokio::time::sleep(wait).await;
                daily.run_delivery(Frequency::Daily, Utc::now()).await;
            }
        });

        let weekly = self.clone();
        tokio::spawn(async move {
            loop {
                let wait = duration_until_weekly(
                    Local::now(),
                    WEEKLY_DELIVERY_DAY,
                    WEEKLY_DELIVERY_TIME.0,
                    WEEKLY_DELIVERY_TIME.1,
                );
                tokio::time::sleep(wait).await;
                weekly.run_delivery(Frequency::Weekly, Utc::now()).await;
            }
        });

        info!("All scheduled jobs initialized");
    }

    pub async fn run_expiry_sweep(&self, now: DateTime<Utc>) {
        info!("Starting expired subscriptions cleanup task");

        let lapsed = self.subscriptions.sweep_expired(now);
        let total: usize = lapsed.iter().map(|(_, count)| count).sum();

        for (user_id, count) in &lapsed {
            let noun = if *count == 1 {
                "subscription has"
            } else {
                "subscriptions have"
            };
            let text = format!(
                "📢 Subscription notice\n\n{} {} expired. You can renew them in \
                 the \"📅 My Subscriptions\" menu.",
                count, noun
            );
            if let Err(e) = self.bot.send_message(utils::chat_of(*user_id), text).await {
                error!(
                    "Failed to notify user {} about expired subscriptions: {}",
                    user_id, e
                );
            }
        }

        if let Err(e) = self.sessions.persist().await {
            error!("Failed to persist sessions after cleanup: {}", e);
        }

        info!("Cleaned up {} expired subscriptions", total);
    }

    pub async fn run_delivery(&self, frequency: Frequency, now: DateTime<Utc>) {
        info!("Starting {} tarot reading task", frequency);

        let mut sent = 0usize;
        for user in self.sessions.scan() {
            if !user.has_active_subscription(SubscriptionKind::Tarot, frequency, now) {
                continue;
            }
            match self.send_reading(&user, frequency).await {
                Ok(()) => sent += 1,
                Err(e) => error!(
                    "Failed to send {} tarot reading to user {}: {}",
                    frequency, user.id, e
                ),
            }
        }

        info!("{} tarot readings sent to {} subscribers", frequency, sent);
    }

    async fn send_reading(
        &self,
        user: &UserRecord,
        frequency: Frequency,
    ) -> crate::error::BotResult<()> {
        let chat_id = utils::chat_of(user.id);

        let (headline, prompt) = match frequency {
            Frequency::Daily => {
                let card = tarot::draw_card();
                (
                    format!("🔮 Your card of the day: {}", card),
                    prompts::card_of_day(card),
                )
            }
            Frequency::Weekly => {
                let cards = tarot::draw_spread(3);
                (
                    format!("🌙 Your spread for the week: {}", cards.join(", ")),
                    prompts::simple_spread(&cards),
                )
            }
        };

        let reading = self.generation.generate(&prompt).await?;

        self.bot.send_message(chat_id, headline).await?;
        for chunk in utils::chunk_text(&reading, utils::MAX_MESSAGE_LEN) {
            self.bot.send_message(chat_id, chunk).await?;
        }

        Ok(())
    }
}

/// Time until the next local HH:MM, rolling to tomorrow when already past.
pub fn duration_until_daily(now: DateTime<Local>, hour: u32, minute: u32) -> StdDuration {
    let target_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    let now_naive = now.naive_local();

    let mut target = now_naive.date().and_time(target_time);
    if target <= now_naive {
        target += Duration::days(1);
    }

    (target - now_naive)
        .to_std()
        .unwrap_or(StdDuration::from_secs(60))
}

/// Time until the next local weekday at HH:MM.
pub fn duration_until_weekly(
    now: DateTime<Local>,
    weekday: Weekday,
    hour: u32,
    minute: u32,
) -> StdDuration {
    let target_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    let now_naive = now.naive_local();

    let days_ahead = (7 + weekday.num_days_from_monday() as i64
        - now_naive.weekday().num_days_from_monday() as i64)
        % 7;
    let mut target = (now_naive.date() + Duration::days(days_ahead)).and_time(target_time);
    if target <= now_naive {
        target += Duration::days(7);
    }

    (target - now_naive)
        .to_std()
        .unwrap_or(StdDuration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_daily_later_today() {
        // 2025-06-02 is a Monday.
        let now = local(2025, 6, 2, 1, 30);
        let wait = duration_until_daily(now, 3, 0);
        assert_eq!(wait, StdDuration::from_secs(90 * 60));
    }

    #[test]
    fn test_daily_rolls_to_tomorrow() {
        let now = local(2025, 6, 2, 9, 0);
        let wait = duration_until_daily(now, 8, 0);
        assert_eq!(wait, StdDuration::from_secs(23 * 60 * 60));
    }

    #[test]
    fn test_daily_exact_time_waits_a_full_day() {
        let now = local(2025, 6, 2, 8, 0);
        let wait = duration_until_daily(now, 8, 0);
        assert_eq!(wait, StdDuration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_weekly_same_week() {
        // Monday 07:00 -> Monday 09:00 same day.
        let now = local(2025, 6, 2, 7, 0);
        let wait = duration_until_weekly(now, Weekday::Mon, 9, 0);
        assert_eq!(wait, StdDuration::from_secs(2 * 60 * 60));
    }

    #[test]
    fn test_weekly_wraps_to_next_week() {
        // Monday 10:00 -> next Monday 09:00.
        let now = local(2025, 6, 2, 10, 0);
        let wait = duration_until_weekly(now, Weekday::Mon, 9, 0);
        assert_eq!(wait, StdDuration::from_secs((7 * 24 - 1) * 60 * 60));
    }

    #[test]
    fn test_weekly_other_day() {
        // Wednesday 09:00 -> Monday 09:00 is five days out.
        let now = local(2025, 6, 4, 9, 0);
        let wait = duration_until_weekly(now, Weekday::Mon, 9, 0);
        assert_eq!(wait, StdDuration::from_secs(5 * 24 * 60 * 60));
    }
}
