//! Persistence for the saved city list.
//!
//! The dashboard only needs load and save of the whole list, so that is all
//! the trait offers.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf, sync::Arc};

use crate::error::StorageError;

pub trait CityStore: Send + Sync {
    /// Read the saved list; a store that was never written is empty.
    fn load(&self) -> Result<Vec<String>, StorageError>;

    /// Replace the saved list.
    fn save(&self, cities: &[String]) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize, Default)]
struct SavedDoc {
    #[serde(rename = "savedCities", default)]
    saved_cities: Vec<String>,
}

/// JSON file holding `{"savedCities": [...]}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CityStore for JsonFileStore {
    fn load(&self) -> Result<Vec<String>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let doc: SavedDoc = serde_json::from_str(&text)?;
        Ok(doc.saved_cities)
    }

    fn save(&self, cities: &[String]) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let doc = SavedDoc {
            saved_cities: cities.to_vec(),
        };
        let text = serde_json::to_string_pretty(&doc)?;
        fs::write(&self.path, text)?;
        tracing::debug!(path = %self.path.display(), count = cities.len(), "saved cities written");
        Ok(())
    }
}

/// In-process store; clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    cities: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    pub fn with_cities<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cities: Arc::new(Mutex::new(cities.into_iter().map(Into::into).collect())),
        }
    }

    /// Copy of what is currently persisted.
    pub fn snapshot(&self) -> Vec<String> {
        self.cities.lock().clone()
    }
}

impl CityStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, cities: &[String]) -> Result<(), StorageError> {
        *self.cities.lock() = cities.to_vec();
        Ok(())
    }
}
