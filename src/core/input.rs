//! Shared key bindings.

use bevy::prelude::*;

/// Talk, pick up, use.
pub const INTERACT_KEY: KeyCode = KeyCode::KeyE;

/// Skip the running cinematic.
pub const SKIP_KEY: KeyCode = KeyCode::Space;

pub fn interact_pressed(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.just_pressed(INTERACT_KEY) || keyboard.just_pressed(KeyCode::Enter)
}

/// Clear the interact press so later readers this frame don't see it.
pub fn claim_interact(keyboard: &mut ButtonInput<KeyCode>) {
    keyboard.clear_just_pressed(INTERACT_KEY);
    keyboard.clear_just_pressed(KeyCode::Enter);
}

/// Consumers of the interact press, in the order they get to claim it.
///
/// A world object in range wins over a speaker, matching the prompt.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractSet {
    World,
    Dialogue,
}
