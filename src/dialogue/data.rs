//! Dialogue set definitions and loading from RON.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::core::{read_ron, DataLoadError, GameCommand};
use crate::quests::{QuestGates, QuestLedger};

pub const DIALOGUE_DIR: &str = "assets/data/dialogue";

fn default_pitch() -> f32 {
    1.0
}

/// One line of a dialogue set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
    /// Portrait image path, relative to assets/
    #[serde(default)]
    pub portrait: Option<String>,
    /// Blip sound path; falls back to the configured default blip
    #[serde(default)]
    pub blip: Option<String>,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
}

impl DialogueLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            portrait: None,
            blip: None,
            pitch: 1.0,
        }
    }
}

/// A gated, orderable bundle of dialogue lines.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialogueSet {
    pub name: String,
    pub lines: Vec<DialogueLine>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub gates: QuestGates,
    #[serde(default)]
    pub on_start: Vec<GameCommand>,
    #[serde(default)]
    pub on_end: Vec<GameCommand>,
}

impl DialogueSet {
    pub fn new(name: impl Into<String>, lines: Vec<DialogueLine>) -> Self {
        Self {
            name: name.into(),
            lines,
            priority: 0,
            gates: QuestGates::default(),
            on_start: Vec::new(),
            on_end: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_gates(mut self, gates: QuestGates) -> Self {
        self.gates = gates;
        self
    }

    pub fn can_activate(&self, ledger: &QuestLedger) -> bool {
        self.gates.is_met(ledger)
    }
}

/// Root of a speaker's dialogue file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialogueFile {
    pub sets: Vec<DialogueSet>,
}

impl DialogueFile {
    /// Reject empty sets and duplicate set names.
    pub fn validate(&self, path: &str) -> Result<(), DataLoadError> {
        let mut seen = HashSet::new();
        for set in &self.sets {
            if set.lines.is_empty() {
                return Err(DataLoadError::EmptyDialogueSet { set: set.name.clone() });
            }
            if !seen.insert(set.name.as_str()) {
                return Err(DataLoadError::Duplicate {
                    kind: "dialogue set",
                    name: set.name.clone(),
                    path: path.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// All dialogue files, keyed by file stem (the speaker id used in scenes).
#[derive(Resource, Default, Debug)]
pub struct DialogueLibrary {
    pub speakers: HashMap<String, Vec<DialogueSet>>,
}

impl DialogueLibrary {
    pub fn get(&self, speaker: &str) -> Option<&[DialogueSet]> {
        self.speakers.get(speaker).map(Vec::as_slice)
    }
}

pub fn load_dialogue_file(path: &Path) -> Result<DialogueFile, DataLoadError> {
    let file = read_ron::<DialogueFile>(path)?;
    file.validate(&path.display().to_string())?;
    Ok(file)
}

/// Load every dialogue file from assets/data/dialogue/.
pub fn load_dialogue_library(mut library: ResMut<DialogueLibrary>) {
    let dir = Path::new(DIALOGUE_DIR);
    let Ok(entries) = fs::read_dir(dir) else {
        warn!("Dialogue directory not found: {:?}", dir);
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }
        let Some(speaker) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        match load_dialogue_file(&path) {
            Ok(file) => {
                info!("Loaded {} dialogue sets for {}", file.sets.len(), speaker);
                library.speakers.insert(speaker, file.sets);
            }
            Err(e) => error!("{}", e),
        }
    }

    info!("Loaded dialogue for {} speakers", library.speakers.len());
}
