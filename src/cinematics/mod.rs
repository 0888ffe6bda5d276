//! Cinematics module - timed audiovisual effect sequences.
//!
//! [`SequencePlayer`] is a plain state machine over a [`Stage`]; the plugin
//! feeds it commands and frame time and copies the stage onto the world.

mod effect;
mod player;
mod plugin;
mod stage;

pub use effect::{
    quick_blackout, quick_fade_in, quick_fade_out, quick_shake, rgb, CinematicEffect, CinematicSequence,
    EffectKind, Rgb, LIGHTNING_PHASES,
};
pub use player::SequencePlayer;
pub use plugin::{CinematicOverlay, CinematicsPlugin, SequenceLibrary};
pub use stage::{SoundCue, Stage};
