//! Error types for data file loading.

use thiserror::Error;

/// Errors that can occur when loading quest, item, dialogue or scene data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A dialogue line list is empty.
    #[error("Dialogue set '{set}' has no lines")]
    EmptyDialogueSet { set: String },

    /// Two entries in one file share a name.
    #[error("Duplicate {kind} '{name}' in '{path}'")]
    Duplicate { kind: &'static str, name: String, path: String },
}

/// Read and parse a RON data file.
pub fn read_ron<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T, DataLoadError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }
    let contents = std::fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    ron::from_str(&contents).map_err(|e| DataLoadError::ParseError {
        path: display,
        details: e.to_string(),
    })
}
