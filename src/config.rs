//! Tracker settings and the host's key/value profile storage.
//!
//! Everything the tracker persists lives under one configuration group as
//! string values: the settings object, the tracked-id array and the
//! difficulty ratings.

use crate::error::Result;
use crate::tier_goal::TierGoal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Configuration group all keys belong to.
pub const CONFIG_GROUP: &str = "combatachievements";
/// JSON array of tracked achievement ids.
pub const TRACKED_KEY: &str = "trackedAchievements";
/// JSON object of id to difficulty rating.
pub const DIFFICULTY_KEY: &str = "userDifficulties";
/// JSON [`TrackerConfig`].
pub const SETTINGS_KEY: &str = "settings";

/// User-facing tracker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    pub tier_goal: TierGoal,
    /// Host-side overlay notifications; the core only stores it
    pub show_progress_notifications: bool,
    pub show_chat_messages: bool,
    /// Use the compact single-line stats labels
    pub prefer_smaller_stats_panel: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tier_goal: TierGoal::Auto,
            show_progress_notifications: true,
            show_chat_messages: true,
            prefer_smaller_stats_panel: false,
        }
    }
}

impl TrackerConfig {
    /// Load settings, falling back to defaults when missing or malformed.
    pub fn load(store: &dyn ConfigStore) -> Self {
        let Some(json) = store.get(SETTINGS_KEY) else {
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "malformed tracker settings, using defaults");
            Self::default()
        })
    }

    pub fn save(&self, store: &mut dyn ConfigStore) -> Result<()> {
        store.set(SETTINGS_KEY, serde_json::to_string(self)?)
    }
}

/// String key/value storage scoped to [`CONFIG_GROUP`] for one profile.
pub trait ConfigStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn unset(&mut self, key: &str) -> Result<()>;
}

/// In-process store, for hosts that persist elsewhere and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    values: HashMap<String, String>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn unset(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Get the ~/.catracker/ directory path.
pub fn tracker_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home_dir.join(".catracker"))
}

/// One pretty-printed JSON object per profile on disk.
///
/// Every write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileConfigStore {
    /// Open the store at `path`. A missing or invalid file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid config file, starting empty"
                );
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    /// Open ~/.catracker/combatachievements-<profile>.json.
    pub fn for_profile(profile: &str) -> io::Result<Self> {
        Ok(Self::open(
            tracker_dir()?.join(format!("{}-{}.json", CONFIG_GROUP, profile)),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn unset(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
