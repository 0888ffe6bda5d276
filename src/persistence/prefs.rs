//! Flat key-value preferences, the save format for quest progress.
//!
//! Values are integers keyed by strings. Writes land in memory first and
//! only reach disk on [`KeyValueStore::save`].

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PersistenceError;

/// Minimal local-preferences interface.
pub trait KeyValueStore: Send + Sync {
    /// Read an integer, or `default` when the key is missing.
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn set_int(&mut self, key: &str, value: i32);
    fn has_key(&self, key: &str) -> bool;
    fn delete_key(&mut self, key: &str);
    /// Flush pending writes.
    fn save(&mut self) -> Result<(), PersistenceError>;
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryPrefs {
    values: BTreeMap<String, i32>,
    /// Number of successful `save` calls
    pub saves: usize,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryPrefs {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        self.saves += 1;
        Ok(())
    }
}

/// Store backed by a RON file holding a single `{ "key": value }` map.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, i32>,
}

impl FilePrefs {
    /// Open the prefs file. A missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match Self::read(&path) {
            Ok(values) => {
                info!("Loaded {} prefs from {:?}", values.len(), path);
                values
            }
            Err(PersistenceError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                info!("No prefs file at {:?}, starting fresh", path);
                BTreeMap::new()
            }
            Err(e) => {
                warn!("{}. Starting with empty prefs.", e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, i32>, PersistenceError> {
        let contents = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        ron::from_str(&contents).map_err(|e| PersistenceError::Parse {
            path: path.display().to_string(),
            details: e.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FilePrefs {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        let io_err = |source| PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let contents = ron::ser::to_string_pretty(&self.values, ron::ser::PrettyConfig::default())?;
        fs::write(&self.path, contents).map_err(io_err)
    }
}

/// The store used by the running game.
#[derive(Resource)]
pub struct Prefs(pub Box<dyn KeyValueStore>);

impl Prefs {
    pub fn memory() -> Self {
        Self(Box::new(MemoryPrefs::new()))
    }

    pub fn file(path: impl AsRef<Path>) -> Self {
        Self(Box::new(FilePrefs::open(path)))
    }
}
