//! Application state management

use std::path::{Path, PathBuf};

use courtbook_core::{ClubConfig, Database, Result};
use tracing::info;

/// Loaded configuration plus an open database
pub struct AppState {
    pub config: ClubConfig,
    pub db: Database,
}

impl AppState {
    /// Load config (explicit path or platform default) and open the database
    pub fn new(config_path: Option<&Path>, database_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => ClubConfig::default_path()?,
        };
        let mut config = ClubConfig::load(&config_path)?;
        if database_override.is_some() {
            config.database = database_override;
        }

        let db_path = config.database_path()?;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!(path = %db_path.display(), "Opening database");
        let db = Database::open(&db_path)?;

        Ok(Self { config, db })
    }
}
