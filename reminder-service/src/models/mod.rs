//! Domain models for reminder-service.

mod reminder;
mod settings;
mod subscription;

pub use reminder::{
    clamp_days, PerSubSetting, ReminderBadge, ReminderEvent, ReminderSettings, MAX_REMINDER_DAYS,
};
pub use settings::{AppSettings, Currency, Language, Profile, ThemeMode};
pub use subscription::{BillingCycle, NewSubscription, Subscription, SubscriptionStatus};
