//! Subscription list queries and the dashboard summary.

use chrono::{DateTime, Datelike, TimeZone};
use serde::Serialize;
use std::fmt;

use crate::models::{Subscription, SubscriptionStatus};
use crate::services::engine::{days_between, local_date};

/// Window used by the "upcoming" filter and the dashboard list.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

const DASHBOARD_UPCOMING_LIMIT: usize = 5;
const DASHBOARD_LATEST_LIMIT: usize = 6;

/// Whole days until the billing date, counted between local midnights.
pub fn days_until<Tz: TimeZone>(subscription: &Subscription, now: &DateTime<Tz>) -> i64 {
    days_between(local_date(&subscription.next_billing, now), now.date_naive())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Upcoming,
    Canceled,
}

impl StatusFilter {
    pub fn from_string(s: &str) -> Self {
        match s {
            "active" => StatusFilter::Active,
            "upcoming" => StatusFilter::Upcoming,
            "canceled" => StatusFilter::Canceled,
            _ => StatusFilter::All,
        }
    }

    fn matches<Tz: TimeZone>(&self, sub: &Subscription, now: &DateTime<Tz>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => sub.status == SubscriptionStatus::Active,
            StatusFilter::Canceled => sub.status == SubscriptionStatus::Canceled,
            StatusFilter::Upcoming => {
                sub.status == SubscriptionStatus::Upcoming
                    || (0..=UPCOMING_WINDOW_DAYS).contains(&days_until(sub, now))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NextAsc,
    NextDesc,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::NextAsc => "next-asc",
            SortOrder::NextDesc => "next-desc",
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
        }
    }

    /// Order selected by the next press of the sort toggle.
    pub fn next(&self) -> Self {
        match self {
            SortOrder::NextAsc => SortOrder::NextDesc,
            SortOrder::NextDesc => SortOrder::PriceAsc,
            SortOrder::PriceAsc => SortOrder::PriceDesc,
            SortOrder::PriceDesc => SortOrder::NextAsc,
        }
    }
}

/// Search, filter and sort state of the subscription list.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionQuery {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub sort: SortOrder,
}

/// Rows of the subscription list for `query`.
pub fn list_subscriptions<'a, Tz: TimeZone>(
    subscriptions: &'a [Subscription],
    query: &SubscriptionQuery,
    now: &DateTime<Tz>,
) -> Vec<&'a Subscription> {
    let needle = query
        .search
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut rows: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|s| {
            needle
                .as_ref()
                .map_or(true, |n| s.name.to_lowercase().contains(n.as_str()))
        })
        .filter(|s| query.status.matches(s, now))
        .collect();

    match query.sort {
        SortOrder::NextAsc => rows.sort_by_key(|s| s.next_billing),
        SortOrder::NextDesc => rows.sort_by(|a, b| b.next_billing.cmp(&a.next_billing)),
        SortOrder::PriceAsc => rows.sort_by_key(|s| s.price),
        SortOrder::PriceDesc => rows.sort_by(|a, b| b.price.cmp(&a.price)),
    }

    rows
}

/// Billing proximity label used on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingBadge {
    Overdue,
    Today,
    Tomorrow,
    InDays(i64),
}

impl BillingBadge {
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => BillingBadge::Overdue,
            0 => BillingBadge::Today,
            1 => BillingBadge::Tomorrow,
            d => BillingBadge::InDays(d),
        }
    }
}

impl fmt::Display for BillingBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingBadge::Overdue => write!(f, "Overdue"),
            BillingBadge::Today => write!(f, "Today"),
            BillingBadge::Tomorrow => write!(f, "Tomorrow"),
            BillingBadge::InDays(d) => write!(f, "{} days", d),
        }
    }
}

impl Serialize for BillingBadge {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBill<'a> {
    pub subscription: &'a Subscription,
    pub days_until: i64,
    pub badge: BillingBadge,
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<'a> {
    /// Sum of prices billed in the current calendar month.
    pub monthly_spend: u64,
    pub upcoming: Vec<UpcomingBill<'a>>,
    pub active_count: usize,
    /// Sum of prices of subscriptions flagged as cancelable.
    pub potential_savings: u64,
    pub latest: Vec<&'a Subscription>,
}

pub fn dashboard_summary<'a, Tz: TimeZone>(
    subscriptions: &'a [Subscription],
    now: &DateTime<Tz>,
) -> DashboardSummary<'a> {
    let today = now.date_naive();

    let monthly_spend: u64 = subscriptions
        .iter()
        .filter(|s| {
            let billing = local_date(&s.next_billing, now);
            billing.year() == today.year() && billing.month() == today.month()
        })
        .fold(0u64, |total, s| total.saturating_add(s.price));

    let mut by_billing: Vec<&Subscription> = subscriptions.iter().collect();
    by_billing.sort_by_key(|s| s.next_billing);

    let upcoming = by_billing
        .iter()
        .map(|s| (*s, days_until(s, now)))
        .filter(|(_, days)| *days <= UPCOMING_WINDOW_DAYS)
        .take(DASHBOARD_UPCOMING_LIMIT)
        .map(|(subscription, days)| UpcomingBill {
            subscription,
            days_until: days,
            badge: BillingBadge::from_days(days),
        })
        .collect();

    let active_count = subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
        .count();

    let potential_savings: u64 = subscriptions
        .iter()
        .filter(|s| s.is_cancelable())
        .fold(0u64, |total, s| total.saturating_add(s.price));

    let latest = by_billing.into_iter().take(DASHBOARD_LATEST_LIMIT).collect();

    DashboardSummary {
        monthly_spend,
        upcoming,
        active_count,
        potential_savings,
        latest,
    }
}
