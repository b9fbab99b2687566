//! Profile and application preferences.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Id,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    System,
    Light,
    Dark,
}

/// Currencies offered by the settings and add-subscription forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Idr,
    Usd,
    Sgd,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
            Currency::Usd => "USD",
            Currency::Sgd => "SGD",
            Currency::Eur => "EUR",
        }
    }
}

/// User profile, persisted under `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_data_url: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            email: "user@example.com".to_string(),
            avatar_data_url: None,
        }
    }
}

impl Profile {
    /// Letter shown in place of a missing avatar.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('N')
    }
}

/// Application preferences, persisted under `appSettings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub language: Language,
    pub currency: Currency,
    pub theme: ThemeMode,
    #[validate(range(max = 365, message = "Reminder days must be at most 365"))]
    pub default_reminder_days: u32,
    pub default_email: bool,
    #[serde(rename = "defaultWhatsApp")]
    pub default_whatsapp: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::Id,
            currency: Currency::Idr,
            theme: ThemeMode::Light,
            default_reminder_days: 3,
            default_email: true,
            default_whatsapp: false,
        }
    }
}
