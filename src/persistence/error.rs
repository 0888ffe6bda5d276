//! Error types for the preferences store.

use thiserror::Error;

/// Errors that can occur when writing or reading the prefs file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory map could not be serialized.
    #[error("Failed to serialize prefs: {0}")]
    Serialize(#[from] ron::Error),

    /// The file exists but does not contain a valid prefs map.
    #[error("Parse error in '{path}': {details}")]
    Parse { path: String, details: String },
}
