//! Open conversations and the speakers that own them.

use bevy::prelude::*;

use super::data::{DialogueLine, DialogueSet};
use super::selector::select_dialogue_set;
use super::typewriter::Typewriter;
use crate::quests::QuestLedger;

/// Result of pressing interact during a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The line was still typing and is now fully shown.
    Completed,
    /// Moved on to the line at this index.
    Line(usize),
    /// The last line was dismissed.
    Ended,
}

/// A dialogue set being shown, one line at a time.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub set: DialogueSet,
    step: usize,
    typewriter: Option<Typewriter>,
    seconds_per_char: Option<f32>,
}

impl Conversation {
    /// Open on the first line. `seconds_per_char` of `None` shows lines whole.
    pub fn open(set: DialogueSet, seconds_per_char: Option<f32>) -> Self {
        let mut conversation = Self {
            set,
            step: 0,
            typewriter: None,
            seconds_per_char,
        };
        conversation.show_line();
        conversation
    }

    fn show_line(&mut self) {
        self.typewriter = match (self.seconds_per_char, self.line()) {
            (Some(speed), Some(line)) => Some(Typewriter::new(&line.text, speed)),
            _ => None,
        };
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn line(&self) -> Option<&DialogueLine> {
        self.set.lines.get(self.step)
    }

    pub fn is_typing(&self) -> bool {
        self.typewriter.as_ref().is_some_and(|tw| !tw.is_done())
    }

    /// Text currently on screen for the current line.
    pub fn visible_text(&self) -> String {
        match (&self.typewriter, self.line()) {
            (Some(tw), _) => tw.visible(),
            (None, Some(line)) => line.text.clone(),
            (None, None) => String::new(),
        }
    }

    /// Tick the typewriter, returning newly revealed characters.
    pub fn tick(&mut self, dt: f32) -> Vec<(usize, char)> {
        self.typewriter.as_mut().map(|tw| tw.tick(dt)).unwrap_or_default()
    }

    pub fn advance(&mut self) -> Advance {
        if let Some(tw) = self.typewriter.as_mut().filter(|tw| !tw.is_done()) {
            tw.finish();
            return Advance::Completed;
        }
        if self.step + 1 < self.set.lines.len() {
            self.step += 1;
            self.show_line();
            Advance::Line(self.step)
        } else {
            Advance::Ended
        }
    }
}

/// An entity players can talk to.
#[derive(Component, Debug, Clone)]
pub struct DialogueSpeaker {
    pub name: String,
    pub sets: Vec<DialogueSet>,
    pub last_shown: Option<String>,
    pub remember_last: bool,
}

impl DialogueSpeaker {
    pub fn new(name: impl Into<String>, sets: Vec<DialogueSet>) -> Self {
        Self {
            name: name.into(),
            sets,
            last_shown: None,
            remember_last: true,
        }
    }

    pub fn select(&self, ledger: &QuestLedger) -> Option<&DialogueSet> {
        let last = if self.remember_last { self.last_shown.as_deref() } else { None };
        select_dialogue_set(&self.sets, ledger, last)
    }

    pub fn has_available(&self, ledger: &QuestLedger) -> bool {
        self.select(ledger).is_some()
    }

    pub fn find(&self, name: &str) -> Option<&DialogueSet> {
        self.sets.iter().find(|s| s.name == name)
    }

    /// Record a set as shown.
    pub fn mark_shown(&mut self, name: &str) {
        if self.remember_last {
            self.last_shown = Some(name.to_string());
        }
    }

    /// Add a set unless one with the same name already exists.
    pub fn add_set(&mut self, set: DialogueSet) -> bool {
        if self.find(&set.name).is_some() {
            return false;
        }
        self.sets.push(set);
        true
    }
}

/// Marker: the player is inside this speaker's zone.
#[derive(Component, Debug)]
pub struct SpeakerInRange;

/// The conversation on screen, if any.
#[derive(Resource, Debug, Default)]
pub struct ActiveConversation {
    pub current: Option<(Entity, Conversation)>,
}

impl ActiveConversation {
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn speaker(&self) -> Option<Entity> {
        self.current.as_ref().map(|(entity, _)| *entity)
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.current.as_ref().map(|(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPrefs;
    use crate::quests::{QuestGates, QuestRecord};

    fn two_lines() -> DialogueSet {
        DialogueSet::new(
            "intro",
            vec![DialogueLine::new("Constancio", "Buenas"), DialogueLine::new("Quimi", "Hola")],
        )
    }

    #[test]
    fn test_interact_completes_typing_then_advances() {
        let mut conversation = Conversation::open(two_lines(), Some(0.5));
        conversation.tick(0.0);
        assert_eq!(conversation.visible_text(), "B");
        assert!(conversation.is_typing());

        assert_eq!(conversation.advance(), Advance::Completed);
        assert_eq!(conversation.visible_text(), "Buenas");
        assert_eq!(conversation.advance(), Advance::Line(1));
        assert_eq!(conversation.visible_text(), "");
        conversation.advance();
        assert_eq!(conversation.advance(), Advance::Ended);
    }

    #[test]
    fn test_without_typewriter_lines_show_whole() {
        let mut conversation = Conversation::open(two_lines(), None);
        assert!(!conversation.is_typing());
        assert_eq!(conversation.visible_text(), "Buenas");
        assert_eq!(conversation.advance(), Advance::Line(1));
        assert_eq!(conversation.line().map(|l| l.speaker.as_str()), Some("Quimi"));
        assert_eq!(conversation.advance(), Advance::Ended);
    }

    #[test]
    fn test_add_set_ignores_duplicate_names() {
        let mut speaker = DialogueSpeaker::new("Constancio", vec![two_lines()]);
        assert!(!speaker.add_set(two_lines()));
        assert!(speaker.add_set(DialogueSet::new("later", vec![DialogueLine::new("A", "b")])));
        assert_eq!(speaker.sets.len(), 2);
    }

    #[test]
    fn test_speaker_remembers_last_shown() {
        let ledger = QuestLedger::new([QuestRecord::new("phone", "Phone")]);
        let mut speaker = DialogueSpeaker::new(
            "Constancio",
            vec![
                two_lines().with_priority(1),
                DialogueSet::new("other", vec![DialogueLine::new("A", "b")]),
            ],
        );
        assert_eq!(speaker.select(&ledger).map(|s| s.name.as_str()), Some("intro"));
        speaker.mark_shown("other");
        assert_eq!(speaker.select(&ledger).map(|s| s.name.as_str()), Some("other"));

        speaker.remember_last = false;
        assert_eq!(speaker.select(&ledger).map(|s| s.name.as_str()), Some("intro"));
    }

    #[test]
    fn test_has_available_follows_gates() {
        let mut ledger = QuestLedger::new([QuestRecord::new("phone", "Phone")]);
        let gated = two_lines().with_gates(QuestGates {
            required_active: vec!["phone".to_string()],
            ..Default::default()
        });
        let speaker = DialogueSpeaker::new("Constancio", vec![gated]);
        assert!(!speaker.has_available(&ledger));

        let mut store = MemoryPrefs::new();
        ledger.start("phone", &mut store);
        assert!(speaker.has_available(&ledger));
    }
}
