use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::data::DataError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Path of the SQLite database holding house state.
    pub database: String,
    /// Applies pending house owner changes when the world is loaded.
    pub transfer_owner_on_restart: bool,
    /// Seconds between automatic saves, zero disables them.
    pub autosave_interval: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            database: "./assets/database.sqlite".to_string(),
            transfer_owner_on_restart: false,
            autosave_interval: 300,
        }
    }
}

impl Configuration {
    pub fn from_json(data: &str) -> Result<Self, DataError> {
        let config = serde_json::from_str(data)?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        info!("Load configuration from {}", path.display());
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}
