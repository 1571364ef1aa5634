//! Tracker configuration (`~/.carbontrack/config.json`).
//!
//! Every field has a serde default, so an empty object, a partial file or no
//! file at all all produce a working configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{EnginePolicy, FoodPolicy};
use crate::error::{ConfigError, TrackerError};
use crate::store::{JsonFileBackend, MemoryBackend, SlotBackend, SqliteBackend, DEFAULT_SLOT};
use crate::types::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Json,
    Sqlite,
    Memory,
}

/// Per-category daily budgets in kg CO₂.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyTargets {
    pub transport: f64,
    pub food: f64,
    pub energy: f64,
    pub shopping: f64,
    pub waste: f64,
    pub other: f64,
    pub total: f64,
}

impl Default for DailyTargets {
    fn default() -> Self {
        Self {
            transport: 5.0,
            food: 4.0,
            energy: 3.0,
            shopping: 1.5,
            waste: 0.5,
            other: 1.0,
            total: 15.0,
        }
    }
}

impl DailyTargets {
    pub fn for_category(&self, category: Category) -> f64 {
        match category {
            Category::Transport => self.transport,
            Category::Food => self.food,
            Category::Energy => self.energy,
            Category::Shopping => self.shopping,
            Category::Waste => self.waste,
            Category::Other => self.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    /// Where slot files / the database live. Defaults to `~/.carbontrack`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub storage: StorageKind,
    pub slot_name: String,
    pub daily_targets: DailyTargets,
    pub food_policy: FoodPolicy,
    pub share_commute_by_occupancy: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage: StorageKind::default(),
            slot_name: DEFAULT_SLOT.to_string(),
            daily_targets: DailyTargets::default(),
            food_policy: FoodPolicy::default(),
            share_commute_by_occupancy: false,
        }
    }
}

impl TrackerConfig {
    pub fn engine_policy(&self) -> EnginePolicy {
        EnginePolicy {
            food: self.food_policy,
            share_commute_by_occupancy: self.share_commute_by_occupancy,
        }
    }

    /// The configured data directory, or `~/.carbontrack`.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => state_dir(),
        }
    }
}

/// `~/.carbontrack`
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home.join(".carbontrack"))
}

/// Get the canonical config file path (`~/.carbontrack/config.json`)
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(state_dir()?.join("config.json"))
}

/// Load configuration from the canonical path; defaults if the file is absent.
pub fn load_config() -> Result<TrackerConfig, ConfigError> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<TrackerConfig, ConfigError> {
    if !path.exists() {
        log::info!("No config at {}; using defaults", path.display());
        return Ok(TrackerConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: TrackerConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Create or update the config file at `path` atomically.
///
/// Starts from the file's current contents (or defaults), applies
/// `mutator`, writes the result back and returns it.
pub fn create_or_update_config(
    path: &Path,
    mutator: impl FnOnce(&mut TrackerConfig),
) -> Result<TrackerConfig, ConfigError> {
    let mut config = load_config_from(path)?;
    mutator(&mut config);

    let content = serde_json::to_string_pretty(&config)?;
    crate::util::atomic_write_str(path, &content)
        .map_err(|e| ConfigError::Write(format!("{}: {}", path.display(), e)))?;

    Ok(config)
}

/// Build the storage backend the config asks for.
pub fn open_backend(config: &TrackerConfig) -> Result<Box<dyn SlotBackend + Send>, TrackerError> {
    let backend: Box<dyn SlotBackend + Send> = match config.storage {
        StorageKind::Memory => Box::new(MemoryBackend::default()),
        StorageKind::Json => Box::new(JsonFileBackend::new(config.resolve_data_dir()?)),
        StorageKind::Sqlite => {
            let path = config.resolve_data_dir()?.join("tracker.db");
            Box::new(SqliteBackend::open_at(path)?)
        }
    };
    Ok(backend)
}
