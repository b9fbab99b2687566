//! Persistence tests: loading with fallbacks, saving, form submission.

mod common;

use chrono::NaiveDate;
use common::{billing, setting, subscription};
use reminder_service::models::{
    AppSettings, BillingCycle, NewSubscription, Profile, ReminderSettings, SubscriptionStatus,
    ThemeMode,
};
use reminder_service::services::{
    FallbackReason, FileStore, KeyValueStore, MemoryStore, ParsedOrDefault, Repository,
};
use serde_json::json;
use subtrack_core::error::AppError;

fn netflix_form() -> NewSubscription {
    NewSubscription {
        name: "  Netflix ".to_string(),
        price: 64999.6,
        currency: "IDR".to_string(),
        cycle: BillingCycle::Monthly,
        next_billing: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        reminder_days: 3,
        cancelable: true,
        notes: Some("family plan".to_string()),
    }
}

#[test]
fn missing_data_falls_back_to_defaults() {
    let repo = Repository::new(MemoryStore::new());

    let subs = repo.load_subscriptions();
    let settings = repo.load_reminder_settings();

    assert_eq!(subs.reason(), Some(&FallbackReason::Missing));
    assert!(subs.value().is_empty());
    assert!(settings.is_default());
    assert_eq!(settings.into_inner(), ReminderSettings::default());
}

#[test]
fn non_array_subscriptions_are_ignored() {
    let mut store = MemoryStore::new();
    store.set("subs", &json!({"1": "Netflix"})).unwrap();
    let repo = Repository::new(store);

    let subs = repo.load_subscriptions();

    assert_eq!(
        subs.reason(),
        Some(&FallbackReason::WrongShape { expected: "array" })
    );
    assert!(subs.into_inner().is_empty());
}

#[test]
fn malformed_subscription_entries_are_skipped() {
    let mut store = MemoryStore::new();
    store
        .set(
            "subs",
            &json!([
                {"id": "1", "name": "Netflix", "price": 65000, "currency": "IDR",
                 "nextBilling": "2024-01-04T00:00:00.000Z", "status": "active"},
                {"id": "2", "name": "Broken", "price": "free"},
                "garbage"
            ]),
        )
        .unwrap();
    let repo = Repository::new(store);

    let subs = repo.load_subscriptions();

    assert!(!subs.is_default());
    let subs = subs.into_inner();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].name, "Netflix");
}

#[test]
fn non_object_settings_are_ignored() {
    let mut store = MemoryStore::new();
    store.set("reminderSettings", &json!([1, 2, 3])).unwrap();
    let repo = Repository::new(store);

    let settings = repo.load_reminder_settings();

    assert_eq!(
        settings.reason(),
        Some(&FallbackReason::WrongShape { expected: "object" })
    );
    assert_eq!(settings.into_inner(), ReminderSettings::default());
}

#[test]
fn settings_round_trip_through_store() {
    let mut repo = Repository::new(MemoryStore::new());
    let mut settings = ReminderSettings::default();
    settings.set_default_days(7);
    settings
        .per_sub
        .insert("1".to_string(), setting(false, 2, false, true));

    repo.save_reminder_settings(&settings).unwrap();

    let stored = repo.store().get("reminderSettings").unwrap().unwrap();
    assert_eq!(stored["defaultDays"], 7);
    assert_eq!(stored["defaultWhatsApp"], false);
    assert_eq!(stored["perSub"]["1"]["whatsapp"], true);
    assert_eq!(
        repo.load_reminder_settings(),
        ParsedOrDefault::Parsed(settings)
    );
}

#[test]
fn add_subscription_appends_validated_record() {
    let mut repo = Repository::new(MemoryStore::new());
    repo.save_subscriptions(&[subscription("old", "Spotify", 54990, billing(2024, 1, 9))])
        .unwrap();

    let created = repo.add_subscription(netflix_form()).unwrap();

    assert_eq!(created.name, "Netflix");
    assert_eq!(created.price, 65000);
    assert_eq!(created.status, SubscriptionStatus::Active);
    assert_eq!(created.next_billing, billing(2024, 1, 4));
    assert!(uuid::Uuid::parse_str(&created.id).is_ok());

    let subs = repo.load_subscriptions().into_inner();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[1], created);
}

#[test]
fn add_subscription_rejects_invalid_form() {
    let mut repo = Repository::new(MemoryStore::new());
    let mut form = netflix_form();
    form.name = " x ".to_string();
    form.price = -5.0;

    let err = repo.add_subscription(form).unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(repo.store().is_empty());
}

#[test]
fn saving_app_settings_syncs_existing_reminder_defaults() {
    let mut repo = Repository::new(MemoryStore::new());
    let mut reminders = ReminderSettings::default();
    reminders
        .per_sub
        .insert("1".to_string(), setting(true, 1, true, false));
    repo.save_reminder_settings(&reminders).unwrap();

    let prefs = AppSettings {
        theme: ThemeMode::Dark,
        default_reminder_days: 10,
        default_email: false,
        default_whatsapp: true,
        ..AppSettings::default()
    };
    repo.save_app_settings(&prefs).unwrap();

    let synced = repo.load_reminder_settings().into_inner();
    assert_eq!(synced.default_days, 10);
    assert!(!synced.default_email);
    assert!(synced.default_whatsapp);
    assert_eq!(synced.per_sub["1"], setting(true, 1, true, false));
    assert_eq!(repo.load_app_settings().into_inner(), prefs);
}

#[test]
fn saving_app_settings_without_reminder_blob_creates_none() {
    let mut repo = Repository::new(MemoryStore::new());

    repo.save_app_settings(&AppSettings::default()).unwrap();

    assert!(repo.store().get("reminderSettings").unwrap().is_none());
}

#[test]
fn invalid_profile_is_not_saved() {
    let mut repo = Repository::new(MemoryStore::new());
    let profile = Profile {
        email: "nope".to_string(),
        ..Profile::default()
    };

    assert!(repo.save_profile(&profile).is_err());
    assert!(repo.load_profile().is_default());

    repo.save_profile(&Profile::default()).unwrap();
    assert!(!repo.load_profile().is_default());
}

#[test]
fn clear_all_removes_every_blob() {
    let mut repo = Repository::new(MemoryStore::new());
    repo.save_profile(&Profile::default()).unwrap();
    repo.save_app_settings(&AppSettings::default()).unwrap();
    repo.save_reminder_settings(&ReminderSettings::default()).unwrap();
    repo.add_subscription(netflix_form()).unwrap();

    repo.clear_all().unwrap();

    assert!(repo.store().is_empty());
}

#[test]
fn corrupt_file_is_treated_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("reminderSettings.json"), "not json").unwrap();
    let repo = Repository::new(FileStore::new(dir.path()).unwrap());

    let settings = repo.load_reminder_settings();

    assert!(matches!(
        settings.reason(),
        Some(FallbackReason::Unreadable(_))
    ));
    assert_eq!(settings.into_inner(), ReminderSettings::default());
}

#[test]
fn file_store_persists_between_repositories() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut repo = Repository::new(FileStore::new(dir.path()).unwrap());
        repo.add_subscription(netflix_form()).unwrap();
    }

    let repo = Repository::new(FileStore::new(dir.path()).unwrap());
    let subs = repo.load_subscriptions().into_inner();

    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].notes.as_deref(), Some("family plan"));
}

#[test]
fn one_bad_reminder_entry_keeps_the_rest() {
    let mut store = MemoryStore::new();
    store
        .set(
            "reminderSettings",
            &json!({
                "defaultDays": 5,
                "perSub": {
                    "1": {"enabled": false, "days": 3, "email": true, "whatsapp": false},
                    "2": {"enabled": true, "days": 2.5, "email": false, "whatsapp": true},
                    "3": {"enabled": true}
                }
            }),
        )
        .unwrap();
    let mut repo = Repository::new(store);

    let settings = repo.load_reminder_settings();

    assert!(!settings.is_default());
    let settings = settings.into_inner();
    assert_eq!(settings.default_days, 5);
    assert_eq!(settings.per_sub["1"], setting(false, 3, true, false));
    assert_eq!(settings.per_sub["2"], setting(true, 3, false, true));
    assert!(!settings.per_sub.contains_key("3"));
    assert_eq!(settings.unreadable_entries()["3"], json!({"enabled": true}));

    repo.save_reminder_settings(&settings).unwrap();
    let stored = repo.store().get("reminderSettings").unwrap().unwrap();
    assert_eq!(stored["perSub"]["3"], json!({"enabled": true}));
    assert_eq!(stored["perSub"]["1"]["enabled"], false);
}

#[test]
fn add_subscription_keeps_entries_it_cannot_read() {
    let mut store = MemoryStore::new();
    let adobe = json!({"id": "2", "name": "Adobe", "price": 9.99, "currency": "USD"});
    store
        .set(
            "subs",
            &json!([
                {"id": "1", "name": "Netflix", "price": 65000, "currency": "IDR",
                 "nextBilling": "2024-01-04T00:00:00.000Z", "status": "active"},
                adobe.clone()
            ]),
        )
        .unwrap();
    let mut repo = Repository::new(store);

    repo.add_subscription(netflix_form()).unwrap();

    let stored = repo.store().get("subs").unwrap().unwrap();
    let names: Vec<&str> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Netflix", "Adobe", "Netflix"]);
    assert_eq!(stored[1], adobe);
}

#[test]
fn add_subscription_refuses_to_replace_non_array() {
    let mut store = MemoryStore::new();
    store.set("subs", &json!({"legacy": true})).unwrap();
    let mut repo = Repository::new(store);

    let err = repo.add_subscription(netflix_form()).unwrap_err();

    assert!(matches!(err, AppError::StorageError(_)));
    assert_eq!(
        repo.store().get("subs").unwrap(),
        Some(json!({"legacy": true}))
    );
}

#[test]
fn seeding_only_fills_an_empty_store() {
    let mut repo = Repository::new(MemoryStore::new());
    let demo = vec![subscription("1", "Netflix", 65000, billing(2024, 1, 4))];

    assert!(repo.seed_subscriptions(&demo).unwrap());
    assert!(!repo.seed_subscriptions(&[]).unwrap());
    assert_eq!(repo.load_subscriptions().into_inner(), demo);

    let mut store = MemoryStore::new();
    store.set("subs", &json!("not a list")).unwrap();
    let mut repo = Repository::new(store);
    assert!(!repo.seed_subscriptions(&demo).unwrap());
    assert_eq!(repo.store().get("subs").unwrap(), Some(json!("not a list")));
}
