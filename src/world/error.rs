//! Error types for scene data loading.

use thiserror::Error;

use crate::core::DataLoadError;

/// Errors that can occur when loading or looking up scenes.
#[derive(Debug, Error)]
pub enum SceneError {
    /// No scene registered under this name.
    #[error("Scene '{0}' is not registered")]
    UnknownScene(String),

    /// The scene file could not be loaded.
    #[error("Failed to load scene '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: DataLoadError,
    },

    /// Scenes directory is missing.
    #[error("Scenes directory not found: {0}")]
    MissingDirectory(String),

    /// Two entities in one scene share a name.
    #[error("Duplicate name '{name}' in scene '{scene}'")]
    DuplicateName { scene: String, name: String },
}
