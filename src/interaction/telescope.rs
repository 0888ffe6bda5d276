//! Telescope: look through the scope, then the room changes in the dark.

use bevy::prelude::*;
use serde::Deserialize;

use crate::cinematics::{CinematicEffect, CinematicSequence, EffectKind, Stage};
use crate::core::{Easing, GameCommand};

pub const TELESCOPE_SEQUENCE: &str = "telescope";

fn default_zoom() -> f32 {
    0.4
}

fn default_view_duration() -> f32 {
    10.0
}

fn default_darkness_delay() -> f32 {
    2.0
}

fn default_light_fade_speed() -> f32 {
    2.0
}

fn default_prompt() -> String {
    "Mirar".to_string()
}

/// A telescope the player can look through with the interact key.
///
/// Viewing zooms the room camera behind a scope overlay with the music
/// silenced. Afterwards the light fades out, an eerie noise plays, the
/// `show` / `hide` props swap, and the light comes back.
#[derive(Component, Debug, Clone, PartialEq, Deserialize)]
pub struct Telescope {
    /// Multiplier on the room camera's projection scale while viewing
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    #[serde(default = "default_view_duration")]
    pub view_duration: f32,
    /// Seconds spent fully dark before the props swap
    #[serde(default = "default_darkness_delay")]
    pub darkness_delay: f32,
    /// The light fades over `1 / light_fade_speed` seconds
    #[serde(default = "default_light_fade_speed")]
    pub light_fade_speed: f32,
    /// Image under assets/ drawn over the screen while viewing
    #[serde(default)]
    pub scope_image: Option<String>,
    /// One is picked at random per viewing
    #[serde(default)]
    pub eerie_noises: Vec<String>,
    #[serde(default)]
    pub show: Vec<String>,
    #[serde(default)]
    pub hide: Vec<String>,
    /// Completed when the viewing ends
    #[serde(default)]
    pub quest: Option<String>,
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Name of the scope overlay node, set when spawned
    #[serde(skip)]
    pub overlay: String,
}

impl Default for Telescope {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            view_duration: default_view_duration(),
            darkness_delay: default_darkness_delay(),
            light_fade_speed: default_light_fade_speed(),
            scope_image: None,
            eerie_noises: Vec::new(),
            show: Vec::new(),
            hide: Vec::new(),
            quest: None,
            prompt: default_prompt(),
            overlay: String::new(),
        }
    }
}

impl Telescope {
    fn fade_duration(&self) -> f32 {
        if self.light_fade_speed > 0.0 {
            1.0 / self.light_fade_speed
        } else {
            0.0
        }
    }

    fn swaps(&self) -> Vec<GameCommand> {
        let shown = self.show.iter().cloned().map(GameCommand::Show);
        let hidden = self.hide.iter().cloned().map(GameCommand::Hide);
        shown.chain(hidden).collect()
    }

    /// The viewing as a sequence. `restore` holds the light and music
    /// levels to come back to.
    ///
    /// The completion hooks repeat the overlay and prop changes so a skipped
    /// viewing ends in the same state as a finished one.
    pub fn sequence(&self, restore: &Stage, noise: Option<&str>) -> CinematicSequence {
        let instant = |kind| CinematicEffect::new(kind, 0.0);
        let fade = self.fade_duration();

        let mut effects = vec![
            instant(EffectKind::Show(self.overlay.clone())),
            instant(EffectKind::CameraZoom { zoom: self.zoom }),
            instant(EffectKind::AudioFade { volume: 0.0 }),
            CinematicEffect::new(EffectKind::Wait, self.view_duration),
            instant(EffectKind::Hide(self.overlay.clone())),
            instant(EffectKind::CameraZoom { zoom: restore.camera_zoom }),
            CinematicEffect::new(EffectKind::FadeLight { intensity: 0.0 }, fade).with_easing(Easing::Linear),
        ];
        if let Some(path) = noise {
            effects.push(instant(EffectKind::PlaySound {
                path: path.to_string(),
                volume: 1.0,
            }));
        }
        effects.push(CinematicEffect::new(EffectKind::Wait, self.darkness_delay));
        effects.extend(self.swaps().into_iter().map(|command| instant(EffectKind::Command(command))));
        effects.push(
            CinematicEffect::new(EffectKind::FadeLight { intensity: restore.light_intensity }, fade)
                .with_easing(Easing::Linear),
        );
        effects.push(instant(EffectKind::AudioFade { volume: restore.music_volume }));

        let mut sequence = CinematicSequence::new(TELESCOPE_SEQUENCE, effects);
        sequence.on_complete.push(GameCommand::Hide(self.overlay.clone()));
        sequence.on_complete.extend(self.swaps());
        if let Some(quest) = self.quest.as_ref().filter(|q| !q.is_empty()) {
            sequence.on_complete.push(GameCommand::CompleteQuest(quest.clone()));
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cinematics::SequencePlayer;

    fn telescope() -> Telescope {
        Telescope {
            view_duration: 1.0,
            darkness_delay: 0.5,
            show: vec!["ghost".to_string()],
            hide: vec!["doll".to_string()],
            quest: Some("stars".to_string()),
            overlay: "window_scope".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_with_defaults() {
        let parsed: Telescope = ron::from_str(r#"(quest: Some("stars"), eerie_noises: ["audio/sfx/whisper.ogg"])"#).unwrap();
        assert_eq!(parsed.zoom, 0.4);
        assert_eq!(parsed.prompt, "Mirar");
        assert_eq!(parsed.eerie_noises.len(), 1);
        assert!(parsed.overlay.is_empty());
    }

    #[test]
    fn test_viewing_runs_dark_then_restores() {
        let restore = Stage {
            light_intensity: 0.6,
            music_volume: 0.8,
            ..Default::default()
        };
        let sequence = telescope().sequence(&restore, Some("audio/sfx/whisper.ogg"));
        let mut player = SequencePlayer::new(restore.clone());
        let mut stage = restore.clone();

        player.play(sequence);
        let started = player.tick(0.016, &mut stage);
        assert_eq!(started, vec![GameCommand::Show("window_scope".to_string())]);
        assert!((stage.camera_zoom - 0.4).abs() < 1e-6);
        assert_eq!(stage.music_volume, 0.0);

        let mut fired = Vec::new();
        let mut darkest = f32::MAX;
        for _ in 0..200 {
            fired.extend(player.tick(0.02, &mut stage));
            darkest = darkest.min(stage.light_intensity);
            if !player.is_playing() {
                break;
            }
        }

        assert!(!player.is_playing());
        assert_eq!(darkest, 0.0);
        assert_eq!(stage.light_intensity, 0.6);
        assert_eq!(stage.music_volume, 0.8);
        assert!((stage.camera_zoom - 1.0).abs() < 1e-6);
        assert!(fired.contains(&GameCommand::Show("ghost".to_string())));
        assert!(fired.contains(&GameCommand::Hide("doll".to_string())));
        assert_eq!(fired.last(), Some(&GameCommand::CompleteQuest("stars".to_string())));
    }
}
