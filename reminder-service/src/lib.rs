//! Subscription tracking with reminder scheduling.
//!
//! Subscriptions and reminder settings live as JSON blobs in a key-value
//! store. The reminder engine derives upcoming and due reminders from them
//! on every read; nothing derived is persisted.

pub mod config;
pub mod models;
pub mod services;
pub mod startup;

pub use services::engine::{compute_upcoming, due_now, resolve_settings_for};
