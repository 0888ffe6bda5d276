//! Persistence module - the local key-value preferences store.

mod error;
mod prefs;

pub use error::PersistenceError;
pub use prefs::{FilePrefs, KeyValueStore, MemoryPrefs, Prefs};
