use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_ledger::{JournalConfig, SyncMode};
use tally_schema::{SchemaRegistry, TableDescriptor};

use crate::error::{AppError, AppResult};

/// Application configuration, usually read from `tally.toml`.
///
/// Every field has a default, so an empty file is a valid configuration.
/// Without `[[tables]]` entries the auction schema is used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Journal file holding every commit.
    pub journal_path: PathBuf,
    pub sync_mode: SyncMode,
    /// Leading key of the category tables.
    pub category_epoch: String,
    /// Inline schema; replaces the auction schema when non-empty.
    pub tables: Vec<TableDescriptor>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            journal_path: PathBuf::from("tally.journal"),
            sync_mode: SyncMode::default(),
            category_epoch: "2017".into(),
            tables: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> AppResult<Self> {
        toml::from_str(source).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    pub fn journal_config(&self) -> JournalConfig {
        JournalConfig {
            sync_mode: self.sync_mode,
        }
    }

    /// The configured schema, or the auction schema if none is given.
    pub fn registry(&self) -> AppResult<SchemaRegistry> {
        if self.tables.is_empty() {
            return Ok(SchemaRegistry::auction());
        }
        Ok(SchemaRegistry::from_descriptors(self.tables.clone())?)
    }
}
