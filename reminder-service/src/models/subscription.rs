//! Subscription model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    Upcoming,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Upcoming => "upcoming",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "canceled" => SubscriptionStatus::Canceled,
            "upcoming" => SubscriptionStatus::Upcoming,
            _ => SubscriptionStatus::Active,
        }
    }
}

/// Billing cycle. Informational only; never used in date math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }
}

/// A recurring bill tracked by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<BillingCycle>,
    #[serde(with = "billing_date")]
    pub next_billing: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelable: Option<bool>,
}

impl Subscription {
    pub fn is_cancelable(&self) -> bool {
        self.cancelable.unwrap_or(false)
    }
}

/// Input for registering a subscription from the add form.
#[derive(Debug, Clone, Validate)]
pub struct NewSubscription {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than zero"))]
    pub price: f64,
    pub currency: String,
    pub cycle: BillingCycle,
    pub next_billing: NaiveDate,
    #[validate(range(max = 365, message = "Reminder days must be at most 365"))]
    pub reminder_days: u32,
    pub cancelable: bool,
    pub notes: Option<String>,
}

impl NewSubscription {
    /// Trim free-text fields the way the form does before validating.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    /// Build the stored record. The billing date lands on midnight UTC.
    pub fn into_subscription(self, id: Uuid) -> Subscription {
        Subscription {
            id: id.to_string(),
            name: self.name,
            price: self.price.round() as u64,
            currency: self.currency,
            cycle: Some(self.cycle),
            next_billing: self.next_billing.and_time(chrono::NaiveTime::MIN).and_utc(),
            reminder_days: Some(self.reminder_days),
            notes: self.notes,
            status: SubscriptionStatus::Active,
            cancelable: Some(self.cancelable),
        }
    }
}

/// `nextBilling` is stored as an ISO-8601 instant; bare `YYYY-MM-DD` dates
/// are accepted as midnight UTC.
mod billing_date {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
            .map_err(|_| de::Error::custom(format!("invalid billing date: {}", raw)))
    }
}
