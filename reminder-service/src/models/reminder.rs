//! Reminder settings and derived reminder events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::Subscription;

/// Upper bound accepted by the settings editors for any lead time.
pub const MAX_REMINDER_DAYS: u32 = 365;

/// Clamp user-entered lead time to `0..=365`.
pub fn clamp_days(days: i64) -> u32 {
    days.clamp(0, i64::from(MAX_REMINDER_DAYS)) as u32
}

/// Lead time from any JSON number. Fractions round to the nearest day.
fn lead_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let days = f64::deserialize(deserializer)?;
    if !days.is_finite() {
        return Err(serde::de::Error::custom("lead time must be a finite number"));
    }
    Ok(clamp_days(days.round() as i64))
}

/// Resolved reminder configuration for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSubSetting {
    pub enabled: bool,
    #[serde(deserialize_with = "lead_days")]
    pub days: u32,
    pub email: bool,
    pub whatsapp: bool,
}

/// Global reminder configuration, persisted under `reminderSettings`.
///
/// Stored per-subscription entries that cannot be read are kept aside and
/// written back unchanged on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredReminderSettings", into = "StoredReminderSettings")]
pub struct ReminderSettings {
    pub default_days: u32,
    pub default_email: bool,
    pub default_whatsapp: bool,
    pub per_sub: BTreeMap<String, PerSubSetting>,
    unreadable: BTreeMap<String, Value>,
}

/// Wire shape of `reminderSettings` with raw per-subscription entries.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredReminderSettings {
    #[serde(default = "default_days", deserialize_with = "lead_days")]
    default_days: u32,
    #[serde(default = "default_email")]
    default_email: bool,
    #[serde(rename = "defaultWhatsApp", default)]
    default_whatsapp: bool,
    #[serde(default)]
    per_sub: BTreeMap<String, Value>,
}

fn default_days() -> u32 {
    3
}

fn default_email() -> bool {
    true
}

impl From<StoredReminderSettings> for ReminderSettings {
    fn from(stored: StoredReminderSettings) -> Self {
        let mut per_sub = BTreeMap::new();
        let mut unreadable = BTreeMap::new();
        for (id, raw) in stored.per_sub {
            match PerSubSetting::deserialize(&raw) {
                Ok(setting) => {
                    per_sub.insert(id, setting);
                }
                Err(e) => {
                    tracing::warn!(
                        subscription_id = %id,
                        error = %e,
                        "Keeping unreadable reminder setting as stored"
                    );
                    unreadable.insert(id, raw);
                }
            }
        }

        Self {
            default_days: stored.default_days,
            default_email: stored.default_email,
            default_whatsapp: stored.default_whatsapp,
            per_sub,
            unreadable,
        }
    }
}

impl From<ReminderSettings> for StoredReminderSettings {
    fn from(settings: ReminderSettings) -> Self {
        let mut per_sub = settings.unreadable;
        for (id, s) in settings.per_sub {
            per_sub.insert(
                id,
                serde_json::json!({
                    "enabled": s.enabled,
                    "days": s.days,
                    "email": s.email,
                    "whatsapp": s.whatsapp,
                }),
            );
        }

        Self {
            default_days: settings.default_days,
            default_email: settings.default_email,
            default_whatsapp: settings.default_whatsapp,
            per_sub,
        }
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            default_email: default_email(),
            default_whatsapp: false,
            per_sub: BTreeMap::new(),
            unreadable: BTreeMap::new(),
        }
    }
}

impl ReminderSettings {
    /// Setting synthesized from the global defaults for `subscription`.
    pub fn fallback_for(&self, subscription: &Subscription) -> PerSubSetting {
        PerSubSetting {
            enabled: true,
            days: subscription.reminder_days.unwrap_or(self.default_days),
            email: self.default_email,
            whatsapp: self.default_whatsapp,
        }
    }

    /// Stored entries that could not be read, by subscription id.
    pub fn unreadable_entries(&self) -> &BTreeMap<String, Value> {
        &self.unreadable
    }

    /// Copy of these settings with an entry for every subscription.
    ///
    /// Existing entries are kept as they are, including entries whose
    /// subscription no longer exists. Unreadable entries are left alone.
    pub fn with_entries_for(&self, subscriptions: &[Subscription]) -> Self {
        let mut merged = self.clone();
        for sub in subscriptions {
            if !merged.per_sub.contains_key(&sub.id) && !merged.unreadable.contains_key(&sub.id) {
                let setting = self.fallback_for(sub);
                merged.per_sub.insert(sub.id.clone(), setting);
            }
        }
        merged
    }

    pub fn set_default_days(&mut self, days: i64) {
        self.default_days = clamp_days(days);
    }

    pub fn set_default_channels(&mut self, email: bool, whatsapp: bool) {
        self.default_email = email;
        self.default_whatsapp = whatsapp;
    }

    pub fn set_days(&mut self, subscription: &Subscription, days: i64) {
        self.entry_for(subscription).days = clamp_days(days);
    }

    pub fn set_enabled(&mut self, subscription: &Subscription, enabled: bool) {
        self.entry_for(subscription).enabled = enabled;
    }

    pub fn set_email(&mut self, subscription: &Subscription, email: bool) {
        self.entry_for(subscription).email = email;
    }

    pub fn set_whatsapp(&mut self, subscription: &Subscription, whatsapp: bool) {
        self.entry_for(subscription).whatsapp = whatsapp;
    }

    fn entry_for(&mut self, subscription: &Subscription) -> &mut PerSubSetting {
        let fallback = self.fallback_for(subscription);
        self.unreadable.remove(&subscription.id);
        self.per_sub
            .entry(subscription.id.clone())
            .or_insert(fallback)
    }
}

/// Display classification of a reminder by days left until it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderBadge {
    DueNow,
    Tomorrow,
    InDays(i64),
}

impl ReminderBadge {
    pub fn from_days(days_to_trigger: i64) -> Self {
        match days_to_trigger {
            d if d <= 0 => ReminderBadge::DueNow,
            1 => ReminderBadge::Tomorrow,
            d => ReminderBadge::InDays(d),
        }
    }
}

impl fmt::Display for ReminderBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderBadge::DueNow => write!(f, "Due now"),
            ReminderBadge::Tomorrow => write!(f, "Tomorrow"),
            ReminderBadge::InDays(d) => write!(f, "{} days", d),
        }
    }
}

impl Serialize for ReminderBadge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Reminder derived from a subscription and its resolved setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderEvent<'a> {
    pub subscription: &'a Subscription,
    pub setting_for_sub: PerSubSetting,
    pub billing_date: DateTime<Utc>,
    pub trigger_date: NaiveDate,
    pub days_to_trigger: i64,
    pub badge: ReminderBadge,
}

impl ReminderEvent<'_> {
    pub fn is_due(&self) -> bool {
        self.days_to_trigger <= 0
    }
}
