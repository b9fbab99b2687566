//! Typed access to the persisted blobs.
//!
//! Loading never fails: malformed or missing data is replaced by defaults
//! and reported through [`ParsedOrDefault`]. Saving propagates store errors.
//! Writes to different keys are independent; nothing makes them atomic.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use subtrack_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{AppSettings, NewSubscription, Profile, ReminderSettings, Subscription};
use crate::services::store::{
    read_raw, FallbackReason, KeyValueStore, ParsedOrDefault, APP_SETTINGS_KEY, PROFILE_KEY,
    REMINDER_SETTINGS_KEY, SUBS_KEY,
};

pub struct Repository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // --- subscriptions ---

    /// Stored subscriptions. Entries that do not parse are skipped.
    pub fn load_subscriptions(&self) -> ParsedOrDefault<Vec<Subscription>> {
        let items = match read_raw(&self.store, SUBS_KEY) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                return fallback(
                    SUBS_KEY,
                    Vec::new(),
                    FallbackReason::WrongShape { expected: "array" },
                )
            }
            Err(reason) => return fallback(SUBS_KEY, Vec::new(), reason),
        };

        let mut subs = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Subscription>(item) {
                Ok(sub) => subs.push(sub),
                Err(e) => tracing::warn!(
                    key = SUBS_KEY,
                    index = index,
                    error = %e,
                    "Skipping malformed subscription"
                ),
            }
        }
        ParsedOrDefault::Parsed(subs)
    }

    pub fn save_subscriptions(&mut self, subs: &[Subscription]) -> Result<(), AppError> {
        self.save(SUBS_KEY, subs)
    }

    /// Store `subs` only when no subscriptions are stored yet. Returns
    /// whether anything was written.
    pub fn seed_subscriptions(&mut self, subs: &[Subscription]) -> Result<bool, AppError> {
        let vacant = match read_raw(&self.store, SUBS_KEY) {
            Err(FallbackReason::Missing) => true,
            Ok(Value::Array(items)) => items.is_empty(),
            _ => false,
        };
        if vacant {
            self.save_subscriptions(subs)?;
        }
        Ok(vacant)
    }

    /// Validate the form, append the new subscription and return it.
    ///
    /// The stored array is appended to as raw JSON, so entries this model
    /// cannot read survive. A stored value that is not an array is left
    /// untouched and the call fails.
    pub fn add_subscription(&mut self, form: NewSubscription) -> Result<Subscription, AppError> {
        let form = form.normalized();
        form.validate()?;

        let mut items = match read_raw(&self.store, SUBS_KEY) {
            Ok(Value::Array(items)) => items,
            Err(FallbackReason::Missing) => Vec::new(),
            Ok(_) => {
                return Err(AppError::StorageError(anyhow::anyhow!(
                    "Stored {} is not an array, refusing to overwrite it",
                    SUBS_KEY
                )))
            }
            Err(reason) => {
                return Err(AppError::StorageError(anyhow::anyhow!(
                    "Stored {} is {}, refusing to overwrite it",
                    SUBS_KEY,
                    reason
                )))
            }
        };

        let sub = form.into_subscription(Uuid::new_v4());
        items.push(serde_json::to_value(&sub)?);
        self.save(SUBS_KEY, &items)?;

        tracing::info!(
            subscription_id = %sub.id,
            name = %sub.name,
            "Subscription added"
        );
        Ok(sub)
    }

    // --- reminder settings ---

    pub fn load_reminder_settings(&self) -> ParsedOrDefault<ReminderSettings> {
        self.load_object(REMINDER_SETTINGS_KEY)
    }

    pub fn save_reminder_settings(&mut self, settings: &ReminderSettings) -> Result<(), AppError> {
        self.save(REMINDER_SETTINGS_KEY, settings)
    }

    // --- profile and app settings ---

    pub fn load_profile(&self) -> ParsedOrDefault<Profile> {
        self.load_object(PROFILE_KEY)
    }

    pub fn save_profile(&mut self, profile: &Profile) -> Result<(), AppError> {
        profile.validate()?;
        self.save(PROFILE_KEY, profile)
    }

    pub fn load_app_settings(&self) -> ParsedOrDefault<AppSettings> {
        self.load_object(APP_SETTINGS_KEY)
    }

    /// Save preferences and copy the reminder defaults into the stored
    /// reminder settings, if any are stored.
    pub fn save_app_settings(&mut self, settings: &AppSettings) -> Result<(), AppError> {
        settings.validate()?;
        self.save(APP_SETTINGS_KEY, settings)?;

        if let ParsedOrDefault::Parsed(mut reminders) = self.load_reminder_settings() {
            reminders.default_days = settings.default_reminder_days;
            reminders.default_email = settings.default_email;
            reminders.default_whatsapp = settings.default_whatsapp;
            self.save_reminder_settings(&reminders)?;
            tracing::debug!("Reminder defaults synced from app settings");
        }
        Ok(())
    }

    /// Remove profile, preferences, subscriptions and reminder settings.
    pub fn clear_all(&mut self) -> Result<(), AppError> {
        for key in [PROFILE_KEY, APP_SETTINGS_KEY, SUBS_KEY, REMINDER_SETTINGS_KEY] {
            self.store.remove(key)?;
        }
        tracing::info!("Local data cleared");
        Ok(())
    }

    fn load_object<T: DeserializeOwned + Default>(&self, key: &'static str) -> ParsedOrDefault<T> {
        match read_raw(&self.store, key) {
            Ok(value @ Value::Object(_)) => match serde_json::from_value::<T>(value) {
                Ok(parsed) => ParsedOrDefault::Parsed(parsed),
                Err(e) => fallback(key, T::default(), FallbackReason::Unreadable(e.to_string())),
            },
            Ok(_) => fallback(
                key,
                T::default(),
                FallbackReason::WrongShape { expected: "object" },
            ),
            Err(reason) => fallback(key, T::default(), reason),
        }
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), AppError> {
        let json = serde_json::to_value(value)?;
        self.store.set(key, &json).map_err(|e| {
            tracing::error!(key = key, error = %e, kind = e.kind(), "Failed to persist value");
            e
        })
    }
}

fn fallback<T>(key: &str, value: T, reason: FallbackReason) -> ParsedOrDefault<T> {
    match &reason {
        FallbackReason::Missing => tracing::debug!(key = key, "No stored value, using defaults"),
        other => tracing::warn!(key = key, reason = %other, "Stored value ignored, using defaults"),
    }
    ParsedOrDefault::Default { value, reason }
}
