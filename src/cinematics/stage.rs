//! The audiovisual parameters cinematic effects drive.

use bevy::prelude::*;

/// A one-shot sound requested by an effect, drained by the plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub path: String,
    pub volume: f32,
}

/// Everything a sequence can change. Systems copy it onto the light
/// overlay, the camera, the music channel and virtual time every frame.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Stage {
    pub light_intensity: f32,
    pub light_color: Color,
    /// Multiplier on the room camera's projection scale
    pub camera_zoom: f32,
    /// World-space offset added to the room camera position
    pub camera_offset: Vec2,
    pub shake_amplitude: f32,
    pub shake_frequency: f32,
    pub overlay_color: Color,
    pub overlay_alpha: f32,
    pub music_volume: f32,
    pub music_track: Option<String>,
    pub time_scale: f32,
    pub sounds: Vec<SoundCue>,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            light_intensity: 1.0,
            light_color: Color::WHITE,
            camera_zoom: 1.0,
            camera_offset: Vec2::ZERO,
            shake_amplitude: 0.0,
            shake_frequency: 0.0,
            overlay_color: Color::BLACK,
            overlay_alpha: 0.0,
            music_volume: 1.0,
            music_track: None,
            time_scale: 1.0,
            sounds: Vec::new(),
        }
    }
}

impl Stage {
    /// Put every parameter back to `defaults`. The music track is kept.
    pub fn restore(&mut self, defaults: &Stage) {
        let track = self.music_track.take();
        *self = defaults.clone();
        self.music_track = track;
    }
}
