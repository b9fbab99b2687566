//! Application wiring for a single reminder run.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use subtrack_core::error::AppError;

use crate::config::ReminderConfig;
use crate::models::ReminderSettings;
use crate::services::{
    compute_upcoming, sample_subscriptions, simulate_run, DispatchReport, FallbackReason, FileStore,
    KeyValueStore, ParsedOrDefault, Repository,
};

/// One line of the upcoming list, detached from the loaded data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingLine {
    pub subscription_id: String,
    pub name: String,
    pub lead_days: u32,
    pub trigger_date: String,
    pub badge: String,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub upcoming: Vec<UpcomingLine>,
    pub report: DispatchReport,
}

/// Application container around a repository.
pub struct Application<S: KeyValueStore> {
    config: ReminderConfig,
    repo: Repository<S>,
}

impl Application<FileStore> {
    /// Build the application on the file store under the configured data dir.
    pub fn build(config: ReminderConfig) -> Result<Self, AppError> {
        let store = FileStore::new(&config.common.data_dir).map_err(|e| {
            tracing::error!(error = %e, data_dir = %config.common.data_dir, "Failed to open data directory");
            e
        })?;
        Ok(Self::with_store(config, store))
    }
}

impl<S: KeyValueStore> Application<S> {
    pub fn with_store(config: ReminderConfig, store: S) -> Self {
        Self {
            config,
            repo: Repository::new(store),
        }
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    /// Load, merge per-subscription settings, compute and simulate.
    ///
    /// The merged settings are saved back so every subscription keeps an
    /// entry, unless the stored settings could not be read. Other stored
    /// data is left as it was.
    pub fn run<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<RunSummary, AppError> {
        let mut subs = self.repo.load_subscriptions().into_inner();
        if subs.is_empty() && self.config.seed_demo_data {
            let demo = sample_subscriptions(now.with_timezone(&Utc));
            if self.repo.seed_subscriptions(&demo)? {
                tracing::info!(count = demo.len(), "Seeded demo subscriptions");
                subs = demo;
            }
        }

        let loaded = self.repo.load_reminder_settings();
        let settings: ReminderSettings = loaded.value().with_entries_for(&subs);
        let changed = match &loaded {
            ParsedOrDefault::Parsed(previous) => previous != &settings,
            ParsedOrDefault::Default {
                reason: FallbackReason::Missing,
                ..
            } => true,
            // Stored blob is present but unusable; keep it for the user to repair.
            ParsedOrDefault::Default { reason, .. } => {
                tracing::warn!(reason = %reason, "Stored reminder settings left as they are");
                false
            }
        };
        if changed {
            self.repo.save_reminder_settings(&settings)?;
        }

        let events = compute_upcoming(&subs, &settings, now, self.config.horizon_days);
        let upcoming = events
            .iter()
            .map(|e| UpcomingLine {
                subscription_id: e.subscription.id.clone(),
                name: e.subscription.name.clone(),
                lead_days: e.setting_for_sub.days,
                trigger_date: e.trigger_date.to_string(),
                badge: e.badge.to_string(),
            })
            .collect();
        let report = simulate_run(&events);

        tracing::info!(
            service = %self.config.service_name,
            subscriptions = subs.len(),
            upcoming = events.len(),
            due = report.dispatched.len(),
            "Reminder run finished"
        );

        Ok(RunSummary { upcoming, report })
    }
}
