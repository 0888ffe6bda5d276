//! Quest module - the quest ledger, gates, actions and persistence hookup.

mod conditions;
mod data;
mod debug;
mod ledger;
mod plugin;

pub use conditions::{QuestAction, QuestActionKind, QuestGates};
pub use data::{load_quest_file, QuestDefinition, QuestFile, QUESTS_PATH};
pub use debug::{status_lines, QuestDebugPanel};
pub use ledger::{active_key, completed_key, QuestLedger, QuestRecord, QuestTransition};
pub use plugin::{record_transition, QuestPlugin};
