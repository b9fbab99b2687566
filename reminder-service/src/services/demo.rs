//! Demo subscriptions for an empty store.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Subscription, SubscriptionStatus};

fn demo(
    id: &str,
    name: &str,
    price: u64,
    billing: DateTime<Utc>,
    status: SubscriptionStatus,
    cancelable: Option<bool>,
) -> Subscription {
    Subscription {
        id: id.to_string(),
        name: name.to_string(),
        price,
        currency: "IDR".to_string(),
        cycle: None,
        next_billing: billing,
        reminder_days: None,
        notes: None,
        status,
        cancelable,
    }
}

/// Five subscriptions billed relative to `now`.
pub fn sample_subscriptions(now: DateTime<Utc>) -> Vec<Subscription> {
    use SubscriptionStatus::{Active, Upcoming};

    vec![
        demo("1", "Netflix", 65000, now + Duration::days(3), Active, Some(true)),
        demo("2", "Spotify", 54990, now + Duration::days(8), Active, None),
        demo("3", "ChatGPT", 300000, now + Duration::days(1), Active, Some(true)),
        demo("4", "Domain .com", 180000, now + Duration::days(28), Upcoming, None),
        demo("5", "Figma", 150000, now - Duration::days(2), Active, None),
    ]
}
