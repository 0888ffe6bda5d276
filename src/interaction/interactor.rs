//! Quest interactors: zones that run quest actions when the player uses them.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::GameCommand;
use crate::quests::{QuestAction, QuestGates, QuestLedger};

/// How an interactor is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum InteractionMode {
    /// On zone entry, without a prompt
    Automatic,
    /// On the interact key while in range
    #[default]
    OnInteract,
    /// On touch, for collectibles
    OnCollect,
    /// Interact key, with the prompt following quest state
    Mixed,
}

impl InteractionMode {
    pub fn fires_on_enter(self) -> bool {
        matches!(self, Self::Automatic | Self::OnCollect)
    }

    pub fn fires_on_interact(self) -> bool {
        matches!(self, Self::OnInteract | Self::Mixed)
    }

    pub fn shows_prompt(self) -> bool {
        matches!(self, Self::OnInteract | Self::Mixed)
    }
}

/// Result of trying to use an interactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    AlreadyUsed,
    ConditionsNotMet,
    /// The actions to run against the ledger
    Success(Vec<QuestAction>),
}

/// Color hint for the prompt label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTone {
    Neutral,
    InProgress,
    Completed,
}

fn default_true() -> bool {
    true
}

fn default_cooldown() -> f32 {
    0.5
}

fn default_prompt() -> String {
    "Inspeccionar".to_string()
}

#[derive(Component, Debug, Clone, Deserialize)]
pub struct QuestInteractor {
    #[serde(default)]
    pub mode: InteractionMode,
    #[serde(default)]
    pub actions: Vec<QuestAction>,
    #[serde(default)]
    pub gates: QuestGates,
    #[serde(default = "default_true")]
    pub single_use: bool,
    /// Minimum seconds between interact-key uses
    #[serde(default = "default_cooldown")]
    pub cooldown: f32,
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Replace the prompt with the first action's quest state
    #[serde(default = "default_true")]
    pub prompt_by_state: bool,
    #[serde(default)]
    pub on_success: Vec<GameCommand>,
    #[serde(default)]
    pub hide_on_complete: bool,
    /// Named prop shown after a successful use
    #[serde(default)]
    pub reveal_on_complete: Option<String>,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(skip)]
    pub used: bool,
    #[serde(skip)]
    pub last_used_at: Option<f32>,
}

impl Default for QuestInteractor {
    fn default() -> Self {
        Self::new(InteractionMode::default(), Vec::new())
    }
}

impl QuestInteractor {
    pub fn new(mode: InteractionMode, actions: Vec<QuestAction>) -> Self {
        Self {
            mode,
            actions,
            gates: QuestGates::default(),
            single_use: true,
            cooldown: default_cooldown(),
            prompt: default_prompt(),
            prompt_by_state: true,
            on_success: Vec::new(),
            hide_on_complete: false,
            reveal_on_complete: None,
            sound: None,
            used: false,
            last_used_at: None,
        }
    }

    pub fn with_gates(mut self, gates: QuestGates) -> Self {
        self.gates = gates;
        self
    }

    pub fn attempt(&mut self, ledger: &QuestLedger) -> InteractionOutcome {
        if self.single_use && self.used {
            return InteractionOutcome::AlreadyUsed;
        }
        if !self.gates.is_met(ledger) {
            return InteractionOutcome::ConditionsNotMet;
        }
        self.used = true;
        InteractionOutcome::Success(self.actions.clone())
    }

    /// Whether the interact key may fire at `now` (seconds).
    pub fn off_cooldown(&self, now: f32) -> bool {
        self.last_used_at.map_or(true, |last| now - last > self.cooldown)
    }

    pub fn should_show_prompt(&self, ledger: &QuestLedger) -> bool {
        self.mode.shows_prompt() && !(self.single_use && self.used) && self.gates.is_met(ledger)
    }

    pub fn prompt_label(&self, ledger: &QuestLedger) -> (String, PromptTone) {
        let quest = self
            .actions
            .first()
            .filter(|_| self.prompt_by_state)
            .map(|action| action.quest.as_str())
            .filter(|id| !id.is_empty());
        match quest {
            Some(id) if ledger.is_completed(id) => ("Completado".to_string(), PromptTone::Completed),
            Some(id) if ledger.is_active(id) => (format!("{} (En progreso)", self.prompt), PromptTone::InProgress),
            _ => (self.prompt.clone(), PromptTone::Neutral),
        }
    }

    pub fn reset(&mut self) {
        self.used = false;
        self.last_used_at = None;
    }
}

/// Present on interactors the player is touching.
#[derive(Component, Debug)]
pub struct InteractorInRange;

/// Prompt text for the interactor the player is next to.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct InteractionPrompt {
    pub current: Option<(String, PromptTone)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPrefs;
    use crate::quests::QuestRecord;

    fn ledger() -> QuestLedger {
        QuestLedger::new([QuestRecord::new("lamp", "Lamp"), QuestRecord::new("key", "Key")])
    }

    #[test]
    fn test_single_use_interactor_fires_once() {
        let ledger = ledger();
        let mut interactor = QuestInteractor::new(InteractionMode::OnInteract, vec![QuestAction::start("lamp")]);
        assert_eq!(
            interactor.attempt(&ledger),
            InteractionOutcome::Success(vec![QuestAction::start("lamp")])
        );
        assert_eq!(interactor.attempt(&ledger), InteractionOutcome::AlreadyUsed);

        interactor.reset();
        assert!(matches!(interactor.attempt(&ledger), InteractionOutcome::Success(_)));
    }

    #[test]
    fn test_gates_block_without_consuming() {
        let mut ledger = ledger();
        let mut store = MemoryPrefs::new();
        let mut interactor = QuestInteractor::new(InteractionMode::Automatic, vec![QuestAction::complete("lamp")])
            .with_gates(QuestGates {
                required_completed: vec!["key".to_string()],
                ..Default::default()
            });
        assert_eq!(interactor.attempt(&ledger), InteractionOutcome::ConditionsNotMet);
        assert!(!interactor.used);

        ledger.complete("key", &mut store);
        assert!(matches!(interactor.attempt(&ledger), InteractionOutcome::Success(_)));
    }

    #[test]
    fn test_repeatable_interactor_keeps_firing() {
        let ledger = ledger();
        let mut interactor = QuestInteractor {
            single_use: false,
            ..QuestInteractor::new(InteractionMode::Mixed, vec![QuestAction::toggle("lamp")])
        };
        assert!(matches!(interactor.attempt(&ledger), InteractionOutcome::Success(_)));
        assert!(matches!(interactor.attempt(&ledger), InteractionOutcome::Success(_)));
    }

    #[test]
    fn test_prompt_follows_first_quest() {
        let mut ledger = ledger();
        let mut store = MemoryPrefs::new();
        let interactor = QuestInteractor::new(InteractionMode::OnInteract, vec![QuestAction::toggle("lamp")]);

        assert_eq!(interactor.prompt_label(&ledger), ("Inspeccionar".to_string(), PromptTone::Neutral));
        ledger.start("lamp", &mut store);
        assert_eq!(
            interactor.prompt_label(&ledger),
            ("Inspeccionar (En progreso)".to_string(), PromptTone::InProgress)
        );
        ledger.complete("lamp", &mut store);
        assert_eq!(interactor.prompt_label(&ledger), ("Completado".to_string(), PromptTone::Completed));
    }

    #[test]
    fn test_custom_prompt_when_state_ignored() {
        let mut ledger = ledger();
        let mut store = MemoryPrefs::new();
        ledger.complete("lamp", &mut store);
        let interactor = QuestInteractor {
            prompt: "Leer".to_string(),
            prompt_by_state: false,
            ..QuestInteractor::new(InteractionMode::OnInteract, vec![QuestAction::start("lamp")])
        };
        assert_eq!(interactor.prompt_label(&ledger).0, "Leer");
    }

    #[test]
    fn test_cooldown_and_prompt_visibility() {
        let ledger = ledger();
        let mut interactor = QuestInteractor::new(InteractionMode::OnInteract, vec![QuestAction::start("lamp")]);
        assert!(interactor.off_cooldown(0.0));
        interactor.last_used_at = Some(1.0);
        assert!(!interactor.off_cooldown(1.25));
        assert!(interactor.off_cooldown(1.75));

        assert!(interactor.should_show_prompt(&ledger));
        interactor.used = true;
        assert!(!interactor.should_show_prompt(&ledger));
        assert!(!QuestInteractor::new(InteractionMode::Automatic, Vec::new()).should_show_prompt(&ledger));
    }

    #[test]
    fn test_interactor_from_ron() {
        let interactor: QuestInteractor = ron::from_str(
            "(mode: Mixed, actions: [(kind: Start, quest: \"lamp\")], single_use: false, reveal_on_complete: Some(\"lamp_lit\"))",
        )
        .unwrap();
        assert_eq!(interactor.mode, InteractionMode::Mixed);
        assert!(!interactor.single_use);
        assert_eq!(interactor.cooldown, 0.5);
        assert_eq!(interactor.reveal_on_complete.as_deref(), Some("lamp_lit"));
    }
}
