//! Reminder scheduling and classification.
//!
//! Everything here is a pure function of its arguments. Dates are compared
//! at local midnight in the time zone of `now`, so the time of day of either
//! the billing instant or `now` never shifts a reminder by a day.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

use crate::models::{PerSubSetting, ReminderBadge, ReminderEvent, ReminderSettings, Subscription};

/// Look-ahead window for upcoming reminders.
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// Setting that applies to `subscription`: its stored entry, or one
/// synthesized from the global defaults. `settings` is never modified.
pub fn resolve_settings_for(subscription: &Subscription, settings: &ReminderSettings) -> PerSubSetting {
    settings
        .per_sub
        .get(&subscription.id)
        .copied()
        .unwrap_or_else(|| settings.fallback_for(subscription))
}

/// Calendar date of `instant` in the time zone of `now`.
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, now: &DateTime<Tz>) -> NaiveDate {
    instant.with_timezone(&now.timezone()).date_naive()
}

/// Whole days from `from` to `to`. Both are midnights, so the ceiling is exact.
pub fn days_between(to: NaiveDate, from: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Reminders whose trigger date falls on or before `now + horizon_days`,
/// sorted by trigger date. Ties keep the input order.
pub fn compute_upcoming<'a, Tz: TimeZone>(
    subscriptions: &'a [Subscription],
    settings: &ReminderSettings,
    now: &DateTime<Tz>,
    horizon_days: u32,
) -> Vec<ReminderEvent<'a>> {
    let today = now.date_naive();
    let horizon = today
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut events: Vec<ReminderEvent<'a>> = subscriptions
        .iter()
        .filter_map(|sub| {
            let setting = resolve_settings_for(sub, settings);
            if !setting.enabled {
                return None;
            }

            let billing_day = local_date(&sub.next_billing, now);
            let trigger_date = billing_day
                .checked_sub_days(Days::new(u64::from(setting.days)))
                .unwrap_or(NaiveDate::MIN);
            if trigger_date > horizon {
                return None;
            }

            let days_to_trigger = days_between(trigger_date, today);
            Some(ReminderEvent {
                subscription: sub,
                setting_for_sub: setting,
                billing_date: sub.next_billing,
                trigger_date,
                days_to_trigger,
                badge: ReminderBadge::from_days(days_to_trigger),
            })
        })
        .collect();

    events.sort_by_key(|e| e.trigger_date);

    tracing::debug!(
        subscriptions = subscriptions.len(),
        upcoming = events.len(),
        horizon_days = horizon_days,
        "Computed upcoming reminders"
    );

    events
}

/// Events that should fire today or are already late.
pub fn due_now<'e, 'a>(events: &'e [ReminderEvent<'a>]) -> Vec<&'e ReminderEvent<'a>> {
    events.iter().filter(|e| e.is_due()).collect()
}
