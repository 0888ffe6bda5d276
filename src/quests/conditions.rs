//! Quest-state gates and quest actions shared by dialogue, interactors and
//! cinematics.

use serde::Deserialize;

use super::ledger::{QuestLedger, QuestTransition};
use crate::persistence::KeyValueStore;

/// Three lists of quest ids that must hold for something to be available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuestGates {
    /// Every one of these must be completed.
    pub required_completed: Vec<String>,
    /// Every one of these must be active (started, not completed).
    pub required_active: Vec<String>,
    /// None of these may be active or completed.
    pub forbidden: Vec<String>,
}

impl QuestGates {
    pub fn is_met(&self, ledger: &QuestLedger) -> bool {
        self.required_completed.iter().all(|id| ledger.is_completed(id))
            && self.required_active.iter().all(|id| ledger.is_active(id))
            && !self
                .forbidden
                .iter()
                .any(|id| ledger.is_completed(id) || ledger.is_active(id))
    }

    /// Only the required lists; `forbidden` is ignored.
    pub fn required_met(&self, ledger: &QuestLedger) -> bool {
        self.required_completed.iter().all(|id| ledger.is_completed(id))
            && self.required_active.iter().all(|id| ledger.is_active(id))
    }

    pub fn is_empty(&self) -> bool {
        self.required_completed.is_empty() && self.required_active.is_empty() && self.forbidden.is_empty()
    }
}

/// What an action does to its quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum QuestActionKind {
    Start,
    #[default]
    Complete,
    /// Start if not started, complete if active, nothing if completed.
    Toggle,
}

/// A single quest mutation performed by an interactor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestAction {
    #[serde(default)]
    pub kind: QuestActionKind,
    pub quest: String,
}

impl QuestAction {
    pub fn start(quest: impl Into<String>) -> Self {
        Self { kind: QuestActionKind::Start, quest: quest.into() }
    }

    pub fn complete(quest: impl Into<String>) -> Self {
        Self { kind: QuestActionKind::Complete, quest: quest.into() }
    }

    pub fn toggle(quest: impl Into<String>) -> Self {
        Self { kind: QuestActionKind::Toggle, quest: quest.into() }
    }

    pub fn execute(&self, ledger: &mut QuestLedger, store: &mut dyn KeyValueStore) -> QuestTransition {
        if self.quest.is_empty() {
            return QuestTransition::Unchanged;
        }
        match self.kind {
            QuestActionKind::Start => ledger.start(&self.quest, store),
            QuestActionKind::Complete => ledger.complete(&self.quest, store),
            QuestActionKind::Toggle => {
                if ledger.is_completed(&self.quest) {
                    QuestTransition::Unchanged
                } else if ledger.is_active(&self.quest) {
                    ledger.complete(&self.quest, store)
                } else {
                    ledger.start(&self.quest, store)
                }
            }
        }
    }
}
