pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use game_core::Save;

pub use error::StoreError;

/// The persistence seam: the session layer only ever loads a save on login
/// and writes one back at checkpoints (disconnect, shutdown). What sits
/// behind it (files here, a database elsewhere) is not its concern.
pub trait PlayerStore: Send + Sync {
    fn load(&self, name: &str) -> Result<Option<Save>, StoreError>;
    fn save(&self, name: &str, save: &Save) -> Result<(), StoreError>;
}

/// One pretty-printed JSON file per character under a data directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Character names become file names, so only a conservative alphabet
    /// is allowed through.
    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty()
            || !normalized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", normalized)))
    }
}

impl PlayerStore for JsonFileStore {
    fn load(&self, name: &str) -> Result<Option<Save>, StoreError> {
        let path = self.path_for(name)?;
        if !Path::new(&path).exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let save = serde_json::from_str(&content)?;
        Ok(Some(save))
    }

    fn save(&self, name: &str, save: &Save) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(save)?;
        fs::write(&path, content)?;
        tracing::debug!(name, path = %path.display(), "save written");
        Ok(())
    }
}

/// A store that remembers nothing. Useful for throwaway worlds and tests.
#[derive(Debug, Default)]
pub struct NullStore;

impl PlayerStore for NullStore {
    fn load(&self, _name: &str) -> Result<Option<Save>, StoreError> {
        Ok(None)
    }

    fn save(&self, _name: &str, _save: &Save) -> Result<(), StoreError> {
        Ok(())
    }
}
