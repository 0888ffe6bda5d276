//! Quest declarations loaded from RON.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use crate::core::{read_ron, DataLoadError, GameCommand};

pub const QUESTS_PATH: &str = "assets/data/quests.ron";

/// One quest as written in the data file.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub on_start: Vec<GameCommand>,
    #[serde(default)]
    pub on_complete: Vec<GameCommand>,
}

/// Root of assets/data/quests.ron.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestFile {
    pub quests: Vec<QuestDefinition>,
}

/// Load quest declarations. A missing file is an empty ledger.
pub fn load_quest_file(path: &Path) -> Result<QuestFile, DataLoadError> {
    match read_ron::<QuestFile>(path) {
        Ok(file) => {
            info!("Loaded {} quest definitions", file.quests.len());
            Ok(file)
        }
        Err(DataLoadError::FileNotFound(p)) => {
            warn!("Quest file not found: {}", p);
            Ok(QuestFile::default())
        }
        Err(e) => Err(e),
    }
}
