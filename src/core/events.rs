//! Global events used for cross-system communication.
//!
//! Events keep the gameplay plugins decoupled. A quest completing does not
//! know that a door opens because of it: the quest data lists a hook, the
//! hook is sent as a [`GameCommand`], and whichever plugin owns that kind of
//! command carries it out.

use bevy::prelude::*;
use serde::Deserialize;

/// A data-driven hook. Quests, dialogue sets, interactors and cinematic
/// effects list these in their RON definitions instead of holding callbacks.
#[derive(Event, Debug, Clone, PartialEq, Deserialize)]
pub enum GameCommand {
    StartQuest(String),
    CompleteQuest(String),
    ResetQuest(String),
    /// Play a cinematic sequence by name (cancels the current one).
    PlaySequence(String),
    /// Stop the current sequence and restore stage defaults.
    StopSequence,
    /// Open a specific dialogue set on a named speaker.
    ForceDialogue { speaker: String, set: String },
    /// Make a named prop visible.
    Show(String),
    /// Hide a named prop.
    Hide(String),
    GiveItem { item: String, amount: u32 },
    /// Fade out, swap to another scene, fade in.
    ChangeScene(String),
    /// Move the player instantly.
    Teleport(f32, f32),
    /// Roll the closing titles, then return to the menu.
    EndGame,
    /// Free-form cue for scene-specific systems.
    Cue(String),
}

/// What happened to a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestChange {
    Started,
    Completed,
    Reset,
}

/// Sent after a quest actually changed state (no-ops are not reported).
#[derive(Event, Debug, Clone)]
pub struct QuestChanged {
    pub id: String,
    pub change: QuestChange,
}

/// Sent when items are added to the inventory.
#[derive(Event, Debug, Clone)]
pub struct ItemAdded {
    pub item: String,
    /// Count after adding
    pub count: u32,
}

/// Sent when items are consumed from the inventory.
#[derive(Event, Debug, Clone)]
pub struct ItemRemoved {
    pub item: String,
    /// Count after removal (0 when the entry is gone)
    pub count: u32,
}

/// Sent when the player starts overlapping a trigger zone.
#[derive(Event, Debug, Clone, Copy)]
pub struct ZoneEntered {
    pub zone: Entity,
    pub player: Entity,
}

/// Sent when the player stops overlapping a trigger zone.
#[derive(Event, Debug, Clone, Copy)]
pub struct ZoneExited {
    pub zone: Entity,
    pub player: Entity,
}
