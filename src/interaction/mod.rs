//! Interaction module - quest interactors, telescopes and the prompt.

mod interactor;
mod plugin;
mod telescope;

pub use interactor::{
    InteractionMode, InteractionOutcome, InteractionPrompt, InteractorInRange, PromptTone, QuestInteractor,
};
pub use plugin::InteractionPlugin;
pub use telescope::{Telescope, TELESCOPE_SEQUENCE};
