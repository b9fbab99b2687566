//! Key-value storage for persisted JSON blobs.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use subtrack_core::error::AppError;
use thiserror::Error;

pub const SUBS_KEY: &str = "subs";
pub const REMINDER_SETTINGS_KEY: &str = "reminderSettings";
pub const PROFILE_KEY: &str = "profile";
pub const APP_SETTINGS_KEY: &str = "appSettings";

/// Storage capability injected into the repository.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, AppError>;
    fn set(&mut self, key: &str, value: &Value) -> Result<(), AppError>;
    fn remove(&mut self, key: &str) -> Result<(), AppError>;
}

/// In-process store, used by tests and as a scratch store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        fs::write(path, serde_json::to_vec_pretty(value)?)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Why a stored blob was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    #[error("no value stored")]
    Missing,

    #[error("expected {expected}")]
    WrongShape { expected: &'static str },

    #[error("unreadable: {0}")]
    Unreadable(String),
}

/// Result of loading a persisted blob: the stored value, or a default.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOrDefault<T> {
    Parsed(T),
    Default { value: T, reason: FallbackReason },
}

impl<T> ParsedOrDefault<T> {
    pub fn is_default(&self) -> bool {
        matches!(self, ParsedOrDefault::Default { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            ParsedOrDefault::Parsed(value) => value,
            ParsedOrDefault::Default { value, .. } => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            ParsedOrDefault::Parsed(value) => value,
            ParsedOrDefault::Default { value, .. } => value,
        }
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            ParsedOrDefault::Parsed(_) => None,
            ParsedOrDefault::Default { reason, .. } => Some(reason),
        }
    }
}

/// Read `key`, reporting failures as a fallback reason instead of an error.
pub fn read_raw<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Value, FallbackReason> {
    match store.get(key) {
        Ok(Some(Value::Null)) | Ok(None) => Err(FallbackReason::Missing),
        Ok(Some(value)) => Ok(value),
        Err(e) => Err(FallbackReason::Unreadable(e.to_string())),
    }
}
