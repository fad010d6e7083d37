//! Club configuration schema and loader
//!
//! Loaded from `courtbook.toml`:
//!
//! ```toml
//! [schedule]
//! slots = ["09:00", "10:00", "11:00"]
//! slot_minutes = 60
//!
//! [quotas]
//! member = 1
//! instructor = 3
//!
//! [storage]
//! database = "/var/lib/courtbook/club.db"
//! ```
//!
//! Every section is optional; a missing file yields the defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::AvailabilityEngine;
use crate::models::{format_slot_time, ScheduleError, SlotSchedule, DEFAULT_SLOT_MINUTES};
use crate::permissions::QuotaTable;

/// Config file name inside the project config directory
pub const CONFIG_FILE_NAME: &str = "courtbook.toml";

/// Database file name inside the project data directory
pub const DATABASE_FILE_NAME: &str = "courtbook.db";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("Quota for {role} must be at least 1")]
    InvalidQuota { role: &'static str },
    #[error("Could not determine project directories")]
    NoProjectDirs,
}

/// `[schedule]` section as written in the file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// Slot start times, `HH:MM`
    pub slots: Vec<String>,
    pub slot_minutes: u32,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        let schedule = SlotSchedule::default();
        Self {
            slots: schedule.slots().iter().map(|t| format_slot_time(*t)).collect(),
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub database: Option<PathBuf>,
}

/// Raw file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfigToml {
    pub schedule: ScheduleSection,
    pub quotas: QuotaTable,
    pub storage: StorageSection,
}

/// Validated configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClubConfig {
    pub schedule: SlotSchedule,
    pub quotas: QuotaTable,
    pub database: Option<PathBuf>,
}

impl ClubConfig {
    /// Parse and validate TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: ClubConfigToml = toml::from_str(content)?;
        Self::try_from(raw)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "Loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Config path under the platform config directory
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Configured database path, or the platform data directory default
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(DATABASE_FILE_NAME)),
        }
    }

    /// Build the rule engine for this configuration
    pub fn engine(&self) -> AvailabilityEngine {
        AvailabilityEngine::new(self.schedule.clone(), self.quotas)
    }
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            schedule: SlotSchedule::default(),
            quotas: QuotaTable::default(),
            database: None,
        }
    }
}

impl TryFrom<ClubConfigToml> for ClubConfig {
    type Error = ConfigError;

    fn try_from(raw: ClubConfigToml) -> Result<Self, Self::Error> {
        let schedule = SlotSchedule::from_labels(&raw.schedule.slots, raw.schedule.slot_minutes)?;

        if raw.quotas.member == 0 {
            return Err(ConfigError::InvalidQuota { role: "member" });
        }
        if raw.quotas.instructor == 0 {
            return Err(ConfigError::InvalidQuota { role: "instructor" });
        }

        Ok(Self {
            schedule,
            quotas: raw.quotas,
            database: raw.storage.database,
        })
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("club", "courtbook", "courtbook").ok_or(ConfigError::NoProjectDirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_is_default() {
        let config = ClubConfig::from_toml("").unwrap();
        assert_eq!(config, ClubConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[schedule]
slots = ["08:00", "08:30", "09:00"]
slot_minutes = 30

[quotas]
member = 2
instructor = 4

[storage]
database = "/tmp/club.db"
"#;
        let config = ClubConfig::from_toml(toml).unwrap();
        assert_eq!(config.schedule.slots().len(), 3);
        assert_eq!(config.schedule.slot_minutes(), 30);
        assert_eq!(config.quotas.member, 2);
        assert_eq!(config.quotas.instructor, 4);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/club.db"));
    }

    #[test]
    fn test_partial_quotas_keep_defaults() {
        let config = ClubConfig::from_toml("[quotas]\nmember = 2\n").unwrap();
        assert_eq!(config.quotas.member, 2);
        assert_eq!(config.quotas.instructor, 3);
    }

    #[test]
    fn test_rejects_zero_quota() {
        let err = ClubConfig::from_toml("[quotas]\ninstructor = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidQuota { role: "instructor" }));
    }

    #[test]
    fn test_rejects_bad_schedule() {
        let err = ClubConfig::from_toml("[schedule]\nslots = [\"23:30\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Schedule(ScheduleError::PastMidnight(_))));
    }

    #[test]
    fn test_rejects_overlapping_slots() {
        let err = ClubConfig::from_toml("[schedule]\nslots = [\"09:00\", \"10:00\"]\nslot_minutes = 90\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Schedule(ScheduleError::Overlapping(ref slot)) if slot == "10:00"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = ClubConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ClubConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[schedule]\nslots = [\"10:00\", \"11:00\"]\n").unwrap();

        let config = ClubConfig::load(&path).unwrap();
        assert_eq!(config.schedule.slots().len(), 2);
        assert_eq!(config.engine().schedule(), &config.schedule);
    }
}
