pub mod catalog;
pub mod demo;
pub mod dispatch;
pub mod engine;
pub mod money;
pub mod repository;
pub mod store;

pub use catalog::{
    dashboard_summary, days_until, list_subscriptions, BillingBadge, DashboardSummary, SortOrder,
    StatusFilter, SubscriptionQuery, UpcomingBill,
};
pub use demo::sample_subscriptions;
pub use dispatch::{simulate_run, Channels, DispatchReport, SimulatedDispatch};
pub use engine::{compute_upcoming, due_now, resolve_settings_for, DEFAULT_HORIZON_DAYS};
pub use money::{format_idr, format_price};
pub use repository::Repository;
pub use store::{FallbackReason, FileStore, KeyValueStore, MemoryStore, ParsedOrDefault};
