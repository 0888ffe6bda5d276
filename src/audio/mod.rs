//! Audio module - music track, one-shot sounds, pausing.
//!
//! Gameplay code never talks to the mixer directly. It sends [`PlaySound`]
//! and [`PlayMusic`] events and sets [`MusicVolume`], and this module turns
//! them into `bevy_kira_audio` calls.

mod plugin;

pub use plugin::{
    AmbienceVolume, GameAudioPlugin, LoopTrack, MusicTrack, MusicVolume, PlayAmbience, PlayMusic, PlaySound,
};
