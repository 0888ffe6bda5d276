//! UI module - menus, intro card, dialogue box, prompt and item icons.

mod hud;
mod intro;
mod plugin;

pub use hud::{
    prompt_line, tone_color, DialogueBodyText, DialogueBox, DialoguePortrait, DialogueSpeakerText, HudRoot,
    PromptText, TALK_LABEL,
};
pub use intro::{IntroCard, IntroCardUi, IntroContinueText, IntroPhase, CONTINUE_LABEL};
pub use plugin::{has_progress, MenuButton, UiPlugin};
