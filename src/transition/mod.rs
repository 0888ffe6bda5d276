//! Transition module - fades between scenes, doors, teleporters and the
//! closing titles.

mod credits;
mod fade;
mod plugin;

pub use credits::{Credits, CreditsStage, BLACK_HOLD, DATE_HOLD, TITLE_HOLD};
pub use fade::{SceneTransition, TransitionPhase, TransitionStep};
pub use plugin::{DoorTrigger, FadeOverlay, SwapScene, Teleporter, TransitionPlugin};
