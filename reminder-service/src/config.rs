use serde::Deserialize;
use std::env;
use subtrack_core::config as core_config;
use subtrack_core::error::AppError;

use crate::services::DEFAULT_HORIZON_DAYS;

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    /// Look-ahead window for upcoming reminders, in days.
    pub horizon_days: u32,
    /// Seed demo subscriptions when the store holds none.
    pub seed_demo_data: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            service_name: "reminder-service".to_string(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            seed_demo_data: false,
        }
    }
}

impl ReminderConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let horizon_raw = get_env(
            "REMINDER_HORIZON_DAYS",
            Some(&DEFAULT_HORIZON_DAYS.to_string()),
            is_prod,
        )?;
        let horizon_days = horizon_raw.parse::<u32>().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "REMINDER_HORIZON_DAYS must be a non-negative integer, got {:?}: {}",
                horizon_raw,
                e
            ))
        })?;

        let seed_raw = env::var("REMINDER_SEED_DEMO").unwrap_or_else(|_| "false".to_string());
        let seed_demo_data = seed_raw.parse::<bool>().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "REMINDER_SEED_DEMO must be true or false, got {:?}: {}",
                seed_raw,
                e
            ))
        })?;

        Ok(ReminderConfig {
            common: common_config,
            service_name: get_env("SERVICE_NAME", Some("reminder-service"), is_prod)?,
            horizon_days,
            seed_demo_data,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
