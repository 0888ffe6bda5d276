//! Game configuration loaded from an external RON file.
//!
//! Allows tweaking timings and tuning without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;

/// Path of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/data/config/game.ron";

/// Game configuration loaded from assets/data/config/game.ron.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Persistence
    pub prefs_path: String,
    pub reset_quests_on_start: bool,
    // Dialogue
    pub use_typewriter: bool,
    pub typewriter_speed: f32,
    pub remember_last_dialogue: bool,
    pub blip_volume: f32,
    pub chars_per_blip: usize,
    pub skip_spaces: bool,
    pub skip_punctuation: bool,
    pub pitch_variation: f32,
    pub default_blip: Option<String>,
    // Transitions
    pub fade_duration: f32,
    pub camera_switch_debounce: f32,
    pub camera_follow_speed: f32,
    pub transition_sound: Option<String>,
    // Ending
    pub ending_title: String,
    pub ending_date: String,
    pub ending_black_sound: Option<String>,
    pub ending_title_sound: Option<String>,
    pub ending_date_sound: Option<String>,
    // Player
    pub walk_speed: f32,
    pub run_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub base_step_interval: f32,
    pub footstep_sound: Option<String>,
    pub vision_radius: f32,
    // Cinematics
    pub skip_key_enabled: bool,
    pub cinematic_debug: bool,
    // Title card shown when play starts, none when unset
    pub intro_text: Option<String>,
    pub intro_image: Option<String>,
    /// Real seconds before the card can be dismissed
    pub intro_continue_delay: f32,
    // Diagnostics
    pub debug_logs: bool,
    pub quest_debug_overlay: bool,
    // First scene loaded by "New Game"
    pub start_scene: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            prefs_path: "saves/prefs.ron".to_string(),
            reset_quests_on_start: false,
            use_typewriter: true,
            typewriter_speed: 0.03,
            remember_last_dialogue: true,
            blip_volume: 0.5,
            chars_per_blip: 2,
            skip_spaces: true,
            skip_punctuation: true,
            pitch_variation: 0.05,
            default_blip: None,
            fade_duration: 0.6,
            camera_switch_debounce: 0.15,
            camera_follow_speed: 8.0,
            transition_sound: None,
            ending_title: "Vigil".to_string(),
            ending_date: "2026".to_string(),
            ending_black_sound: None,
            ending_title_sound: None,
            ending_date_sound: None,
            walk_speed: 60.0,
            run_speed: 110.0,
            acceleration: 600.0,
            deceleration: 800.0,
            base_step_interval: 0.3,
            footstep_sound: None,
            vision_radius: 80.0,
            skip_key_enabled: true,
            cinematic_debug: false,
            intro_text: None,
            intro_image: None,
            intro_continue_delay: 3.0,
            debug_logs: false,
            quest_debug_overlay: true,
            start_scene: "hall".to_string(),
        }
    }
}

impl GameConfig {
    /// Load config from the RON file, falling back to defaults.
    pub fn load() -> Self {
        match fs::read_to_string(CONFIG_PATH) {
            Ok(contents) => Self::from_ron(&contents).unwrap_or_else(|e| {
                error!("Failed to parse {}: {}. Using defaults.", CONFIG_PATH, e);
                Self::default()
            }),
            Err(e) => {
                warn!("Could not read {}: {}. Using defaults.", CONFIG_PATH, e);
                Self::default()
            }
        }
    }

    /// Parse a config document. Missing fields keep their defaults.
    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        let config = ron::from_str::<GameConfig>(contents)?;
        info!("Loaded game config from {}", CONFIG_PATH);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = GameConfig::from_ron("(typewriter_speed: 0.05, debug_logs: true)").unwrap();
        assert_eq!(config.typewriter_speed, 0.05);
        assert!(config.debug_logs);
        assert_eq!(config.fade_duration, 0.6);
        assert_eq!(config.chars_per_blip, 2);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        assert!(GameConfig::from_ron("(typewriter_speed: \"fast\")").is_err());
    }
}
