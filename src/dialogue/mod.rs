//! Dialogue module - gated dialogue sets, speakers, conversations.
//!
//! A speaker holds several sets. The selector picks one from the quest
//! ledger, and a conversation walks its lines with a typewriter reveal.

mod conversation;
mod data;
mod plugin;
mod selector;
mod typewriter;

pub use conversation::{ActiveConversation, Advance, Conversation, DialogueSpeaker, SpeakerInRange};
pub use data::{load_dialogue_file, DialogueFile, DialogueLibrary, DialogueLine, DialogueSet, DIALOGUE_DIR};
pub use plugin::DialoguePlugin;
pub use selector::select_dialogue_set;
pub use typewriter::{BlipSettings, Typewriter};
