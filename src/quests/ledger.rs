//! The quest ledger: named boolean-pair progress markers.
//!
//! All lookups are by string id. Unknown ids never fail; they are logged
//! and ignored. Every effective mutation rewrites the persisted pair for
//! every quest and flushes the store.

use bevy::prelude::*;
use std::collections::HashMap;

use super::data::QuestDefinition;
use crate::core::GameCommand;
use crate::persistence::KeyValueStore;

/// A single quest and its progress.
#[derive(Debug, Clone)]
pub struct QuestRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub is_completed: bool,
    pub on_start: Vec<GameCommand>,
    pub on_complete: Vec<GameCommand>,
}

impl QuestRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            is_active: false,
            is_completed: false,
            on_start: Vec::new(),
            on_complete: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn on_start(mut self, command: GameCommand) -> Self {
        self.on_start.push(command);
        self
    }

    pub fn on_complete(mut self, command: GameCommand) -> Self {
        self.on_complete.push(command);
        self
    }
}

impl From<QuestDefinition> for QuestRecord {
    fn from(def: QuestDefinition) -> Self {
        Self {
            id: def.id,
            name: def.name,
            description: def.description,
            is_active: false,
            is_completed: false,
            on_start: def.on_start,
            on_complete: def.on_complete,
        }
    }
}

/// Outcome of a ledger mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestTransition {
    /// The quest became active; its start hooks should fire.
    Started(Vec<GameCommand>),
    /// The quest became completed; its completion hooks should fire.
    Completed(Vec<GameCommand>),
    /// Both flags were cleared.
    Reset,
    /// The quest exists but the call had no effect.
    Unchanged,
    /// No quest with that id.
    Unknown,
}

/// Persisted key for the completed flag.
pub fn completed_key(id: &str) -> String {
    format!("Quest_{}_Completed", id)
}

/// Persisted key for the active flag.
pub fn active_key(id: &str) -> String {
    format!("Quest_{}_Active", id)
}

/// All quests declared for the game, in declaration order.
#[derive(Resource, Debug, Default)]
pub struct QuestLedger {
    records: Vec<QuestRecord>,
    index: HashMap<String, usize>,
    /// Promote per-quest logs from `debug!` to `info!`.
    pub verbose: bool,
}

impl QuestLedger {
    /// Build a ledger from declarations. Duplicate ids keep the first one.
    pub fn new(records: impl IntoIterator<Item = QuestRecord>) -> Self {
        let mut ledger = Self::default();
        for record in records {
            if ledger.index.contains_key(&record.id) {
                warn!("Duplicate quest id: {}", record.id);
                continue;
            }
            ledger.index.insert(record.id.clone(), ledger.records.len());
            ledger.records.push(record);
        }
        ledger
    }

    fn log(&self, message: String) {
        if self.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }

    fn find(&self, id: &str) -> Option<&QuestRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut QuestRecord> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.records[i]),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&QuestRecord> {
        self.find(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestRecord> {
        self.records.iter()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        match self.find(id) {
            Some(quest) => quest.is_completed,
            None => {
                self.log(format!("Quest not found: {}", id));
                false
            }
        }
    }

    /// Active means started and not yet completed.
    pub fn is_active(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        match self.find(id) {
            Some(quest) => quest.is_active && !quest.is_completed,
            None => {
                self.log(format!("Quest not found: {}", id));
                false
            }
        }
    }

    pub fn start(&mut self, id: &str, store: &mut dyn KeyValueStore) -> QuestTransition {
        let Some(quest) = self.find_mut(id) else {
            warn!("Cannot start quest '{}': it does not exist", id);
            return QuestTransition::Unknown;
        };
        if quest.is_active || quest.is_completed {
            return QuestTransition::Unchanged;
        }
        quest.is_active = true;
        let hooks = quest.on_start.clone();
        let message = format!("Quest started: {}", quest.name);
        self.log(message);
        self.save(store);
        QuestTransition::Started(hooks)
    }

    pub fn complete(&mut self, id: &str, store: &mut dyn KeyValueStore) -> QuestTransition {
        let Some(quest) = self.find_mut(id) else {
            warn!("Cannot complete quest '{}': it does not exist", id);
            return QuestTransition::Unknown;
        };
        if quest.is_completed {
            return QuestTransition::Unchanged;
        }
        quest.is_completed = true;
        quest.is_active = false;
        let hooks = quest.on_complete.clone();
        let message = format!("Quest completed: {}", quest.name);
        self.log(message);
        self.save(store);
        QuestTransition::Completed(hooks)
    }

    /// Unlike start/complete, reset always persists, even if nothing changed.
    pub fn reset(&mut self, id: &str, store: &mut dyn KeyValueStore) -> QuestTransition {
        let Some(quest) = self.find_mut(id) else {
            warn!("Cannot reset quest '{}': it does not exist", id);
            return QuestTransition::Unknown;
        };
        quest.is_completed = false;
        quest.is_active = false;
        let message = format!("Quest reset: {}", quest.name);
        self.log(message);
        self.save(store);
        QuestTransition::Reset
    }

    /// Clear every record and delete its persisted keys.
    pub fn reset_all(&mut self, store: &mut dyn KeyValueStore) {
        for quest in &mut self.records {
            quest.is_completed = false;
            quest.is_active = false;
            store.delete_key(&completed_key(&quest.id));
            store.delete_key(&active_key(&quest.id));
        }
        if let Err(e) = store.save() {
            error!("Failed to save quest progress: {}", e);
        }
        self.log("All quests reset".to_string());
    }

    pub fn active_quests(&self) -> Vec<&QuestRecord> {
        self.records
            .iter()
            .filter(|q| q.is_active && !q.is_completed)
            .collect()
    }

    pub fn completed_quests(&self) -> Vec<&QuestRecord> {
        self.records.iter().filter(|q| q.is_completed).collect()
    }

    pub fn all_completed<S: AsRef<str>>(&self, ids: &[S]) -> bool {
        ids.iter().all(|id| self.is_completed(id.as_ref()))
    }

    pub fn any_completed<S: AsRef<str>>(&self, ids: &[S]) -> bool {
        ids.iter().any(|id| self.is_completed(id.as_ref()))
    }

    pub fn completed_count<S: AsRef<str>>(&self, ids: &[S]) -> usize {
        ids.iter().filter(|id| self.is_completed(id.as_ref())).count()
    }

    /// Write both flags for every quest, then flush. Best-effort.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        for quest in &self.records {
            store.set_int(&completed_key(&quest.id), quest.is_completed as i32);
            store.set_int(&active_key(&quest.id), quest.is_active as i32);
        }
        if let Err(e) = store.save() {
            error!("Failed to save quest progress: {}", e);
        }
    }

    /// Reload every quest's flags from the store. Missing keys read as 0.
    pub fn load(&mut self, store: &dyn KeyValueStore) {
        for quest in &mut self.records {
            quest.is_completed = store.get_int(&completed_key(&quest.id), 0) == 1;
            quest.is_active = store.get_int(&active_key(&quest.id), 0) == 1;
            if quest.is_completed && quest.is_active {
                warn!("Saved state for quest '{}' is both active and completed", quest.id);
                quest.is_active = false;
            }
        }
    }
}
