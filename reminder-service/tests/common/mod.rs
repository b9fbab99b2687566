//! Shared fixtures for reminder-service integration tests.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use reminder_service::models::{PerSubSetting, ReminderSettings, Subscription, SubscriptionStatus};

/// Fixed "now" used across tests: 2024-01-01 at 10:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn billing(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn subscription(id: &str, name: &str, price: u64, next_billing: DateTime<Utc>) -> Subscription {
    Subscription {
        id: id.to_string(),
        name: name.to_string(),
        price,
        currency: "IDR".to_string(),
        cycle: None,
        next_billing,
        reminder_days: None,
        notes: None,
        status: SubscriptionStatus::Active,
        cancelable: None,
    }
}

pub fn setting(enabled: bool, days: u32, email: bool, whatsapp: bool) -> PerSubSetting {
    PerSubSetting {
        enabled,
        days,
        email,
        whatsapp,
    }
}

/// Settings with a 3-day default and the given per-subscription entries.
pub fn settings_with(entries: &[(&str, PerSubSetting)]) -> ReminderSettings {
    let mut settings = ReminderSettings::default();
    for (id, entry) in entries {
        settings.per_sub.insert(id.to_string(), *entry);
    }
    settings
}
