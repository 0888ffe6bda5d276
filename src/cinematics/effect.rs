//! Cinematic effects, sequences, and how each effect moves the stage.

use bevy::prelude::*;
use serde::Deserialize;

use super::stage::{SoundCue, Stage};
use crate::core::{lerp, lerp_color, Easing, GameCommand};
use crate::quests::{QuestGates, QuestLedger};

/// sRGB triple as written in data files.
pub type Rgb = (f32, f32, f32);

pub fn rgb(color: Rgb) -> Color {
    Color::srgb(color.0, color.1, color.2)
}

fn black() -> Rgb {
    (0.0, 0.0, 0.0)
}

fn white() -> Rgb {
    (1.0, 1.0, 1.0)
}

fn default_flicker_speed() -> f32 {
    10.0
}

fn default_one() -> f32 {
    1.0
}

/// Seconds spent in each lightning phase: flash, dim, flash.
pub const LIGHTNING_PHASES: [f32; 3] = [0.1, 0.05, 0.1];

/// What an effect does.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum EffectKind {
    // Light
    FadeLight { intensity: f32 },
    FlickerLight {
        intensity: f32,
        #[serde(default = "default_flicker_speed")]
        speed: f32,
    },
    /// Fixed timeline, ignores `duration`.
    LightningFlash {
        intensity: f32,
        #[serde(default = "white")]
        color: Rgb,
    },
    ColorShift { color: Rgb },
    // Camera
    CameraShake {
        amplitude: f32,
        #[serde(default = "default_one")]
        frequency: f32,
    },
    CameraZoom { zoom: f32 },
    CameraMove { offset: (f32, f32) },
    // Screen
    /// Overlay alpha goes 0 -> 1.
    ScreenFade {
        #[serde(default = "black")]
        color: Rgb,
    },
    /// Overlay alpha goes 1 -> 0.
    ScreenFlash {
        #[serde(default = "black")]
        color: Rgb,
    },
    // Audio
    AudioFade { volume: f32 },
    /// Fade out over the first half, swap the track, fade in over the second.
    MusicTransition { track: String, volume: f32 },
    PlaySound {
        path: String,
        #[serde(default = "default_one")]
        volume: f32,
    },
    // Control
    TimeScale { scale: f32 },
    Wait,
    Show(String),
    Hide(String),
    ForceDialogue { speaker: String, set: String },
    /// Fire any hook. The effect's own `on_start` works too.
    Command(GameCommand),
}

impl EffectKind {
    /// Instant effects complete on the frame they start.
    pub fn is_instant(&self) -> bool {
        matches!(
            self,
            EffectKind::PlaySound { .. }
                | EffectKind::TimeScale { .. }
                | EffectKind::Show(_)
                | EffectKind::Hide(_)
                | EffectKind::ForceDialogue { .. }
                | EffectKind::Command(_)
        )
    }

    /// Seconds the effect runs given its configured duration.
    pub fn length(&self, duration: f32) -> f32 {
        match self {
            EffectKind::LightningFlash { .. } => LIGHTNING_PHASES.iter().sum(),
            _ if self.is_instant() => 0.0,
            _ => duration.max(0.0),
        }
    }
}

fn default_duration() -> f32 {
    1.0
}

/// One timed step of a sequence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CinematicEffect {
    #[serde(default)]
    pub name: String,
    pub kind: EffectKind,
    #[serde(default = "default_duration")]
    pub duration: f32,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub on_start: Vec<GameCommand>,
    #[serde(default)]
    pub on_complete: Vec<GameCommand>,
}

impl CinematicEffect {
    pub fn new(kind: EffectKind, duration: f32) -> Self {
        Self {
            name: String::new(),
            kind,
            duration,
            easing: Easing::default(),
            on_start: Vec::new(),
            on_complete: Vec::new(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Commands fired when the effect starts, besides `on_start`.
    pub fn start_commands(&self) -> Vec<GameCommand> {
        match &self.kind {
            EffectKind::Show(name) => vec![GameCommand::Show(name.clone())],
            EffectKind::Hide(name) => vec![GameCommand::Hide(name.clone())],
            EffectKind::ForceDialogue { speaker, set } if !set.is_empty() => vec![GameCommand::ForceDialogue {
                speaker: speaker.clone(),
                set: set.clone(),
            }],
            EffectKind::Command(command) => vec![command.clone()],
            _ => Vec::new(),
        }
    }

    /// Instant part of the effect, applied once on its first frame.
    pub fn begin(&self, stage: &mut Stage) {
        match &self.kind {
            EffectKind::PlaySound { path, volume } => stage.sounds.push(SoundCue {
                path: path.clone(),
                volume: *volume,
            }),
            EffectKind::TimeScale { scale } => stage.time_scale = scale.max(0.0),
            _ => {}
        }
    }

    /// Apply the effect at progress `t` (already eased) from the `start` snapshot.
    /// `elapsed` drives the lightning timeline, `clock` drives flicker.
    pub fn apply(&self, stage: &mut Stage, start: &Stage, defaults: &Stage, t: f32, elapsed: f32, clock: f32) {
        match &self.kind {
            EffectKind::FadeLight { intensity } => {
                stage.light_intensity = lerp(start.light_intensity, *intensity, t);
            }
            EffectKind::FlickerLight { intensity, speed } => {
                let factor = if t >= 1.0 {
                    1.0
                } else {
                    ((clock * speed).sin() * 0.5 + 0.5) * t
                };
                stage.light_intensity = lerp(start.light_intensity, *intensity, factor);
            }
            EffectKind::LightningFlash { intensity, color } => {
                let [flash, dim, _] = LIGHTNING_PHASES;
                if elapsed >= self.kind.length(self.duration) {
                    stage.light_intensity = start.light_intensity;
                    stage.light_color = defaults.light_color;
                } else if elapsed < flash || elapsed >= flash + dim {
                    stage.light_intensity = *intensity;
                    stage.light_color = rgb(*color);
                } else {
                    stage.light_intensity = start.light_intensity * 0.5;
                }
            }
            EffectKind::ColorShift { color } => {
                stage.light_color = lerp_color(start.light_color, rgb(*color), t);
            }
            EffectKind::CameraShake { amplitude, frequency } => {
                if t >= 1.0 {
                    stage.shake_amplitude = 0.0;
                } else {
                    stage.shake_amplitude = amplitude * t;
                    stage.shake_frequency = *frequency;
                }
            }
            EffectKind::CameraZoom { zoom } => {
                stage.camera_zoom = lerp(start.camera_zoom, *zoom, t);
            }
            EffectKind::CameraMove { offset } => {
                stage.camera_offset = start.camera_offset.lerp(Vec2::new(offset.0, offset.1), t);
            }
            EffectKind::ScreenFade { color } => {
                stage.overlay_color = rgb(*color);
                stage.overlay_alpha = t;
            }
            EffectKind::ScreenFlash { color } => {
                stage.overlay_color = rgb(*color);
                stage.overlay_alpha = 1.0 - t;
            }
            EffectKind::AudioFade { volume } => {
                stage.music_volume = lerp(start.music_volume, *volume, t);
            }
            EffectKind::MusicTransition { track, volume } => {
                if t < 0.5 {
                    stage.music_volume = lerp(start.music_volume, 0.0, t * 2.0);
                } else {
                    if stage.music_track.as_deref() != Some(track.as_str()) {
                        stage.music_track = Some(track.clone());
                    }
                    stage.music_volume = lerp(0.0, *volume, (t - 0.5) * 2.0);
                }
            }
            _ => {}
        }
    }
}

/// An ordered list of effects with quest gates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CinematicSequence {
    pub name: String,
    #[serde(default)]
    pub play_on_start: bool,
    #[serde(default)]
    pub looped: bool,
    pub effects: Vec<CinematicEffect>,
    /// Only the required lists are checked.
    #[serde(default)]
    pub gates: QuestGates,
    #[serde(default)]
    pub on_start: Vec<GameCommand>,
    #[serde(default)]
    pub on_complete: Vec<GameCommand>,
}

impl CinematicSequence {
    pub fn new(name: impl Into<String>, effects: Vec<CinematicEffect>) -> Self {
        Self {
            name: name.into(),
            play_on_start: false,
            looped: false,
            effects,
            gates: QuestGates::default(),
            on_start: Vec::new(),
            on_complete: Vec::new(),
        }
    }

    pub fn can_play(&self, ledger: &QuestLedger) -> bool {
        self.gates.required_met(ledger)
    }
}

pub fn quick_fade_out(duration: f32) -> CinematicSequence {
    CinematicSequence::new(
        "quick_fade_out",
        vec![CinematicEffect::new(EffectKind::ScreenFade { color: black() }, duration)],
    )
}

/// Starts from a black overlay.
pub fn quick_fade_in(duration: f32) -> CinematicSequence {
    CinematicSequence::new(
        "quick_fade_in",
        vec![CinematicEffect::new(EffectKind::ScreenFlash { color: black() }, duration)],
    )
}

pub fn quick_shake(amplitude: f32, duration: f32) -> CinematicSequence {
    CinematicSequence::new(
        "quick_shake",
        vec![CinematicEffect::new(
            EffectKind::CameraShake { amplitude, frequency: 10.0 },
            duration,
        )],
    )
}

pub fn quick_blackout(duration: f32) -> CinematicSequence {
    CinematicSequence::new(
        "quick_blackout",
        vec![CinematicEffect::new(EffectKind::FadeLight { intensity: 0.0 }, duration)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence() {
        let source = r#"(
            name: "storm",
            looped: true,
            gates: (required_active: ["phone"], forbidden: ["ignored"]),
            effects: [
                (kind: LightningFlash(intensity: 3.0)),
                (kind: Wait, duration: 2.0),
                (kind: ScreenFade(color: (0.0, 0.0, 0.0)), duration: 0.5, easing: Linear),
                (kind: Command(StartQuest("storm_seen"))),
            ],
        )"#;
        let sequence: CinematicSequence = ron::from_str(source).unwrap();
        assert!(sequence.looped);
        assert_eq!(sequence.effects.len(), 4);
        assert_eq!(sequence.effects[0].duration, 1.0);
        assert_eq!(sequence.effects[2].easing, Easing::Linear);
        assert_eq!(
            sequence.effects[3].start_commands(),
            vec![GameCommand::StartQuest("storm_seen".to_string())]
        );
    }

    #[test]
    fn test_forbidden_gate_is_ignored() {
        let ledger = QuestLedger::default();
        let mut sequence = CinematicSequence::new("s", vec![]);
        sequence.gates.forbidden = vec!["anything".to_string()];
        assert!(sequence.can_play(&ledger));
        sequence.gates.required_completed = vec!["missing".to_string()];
        assert!(!sequence.can_play(&ledger));
    }

    #[test]
    fn test_lightning_timeline() {
        let effect = CinematicEffect::new(EffectKind::LightningFlash { intensity: 4.0, color: white() }, 1.0);
        let defaults = Stage::default();
        let start = Stage { light_intensity: 0.6, ..Default::default() };
        let mut stage = start.clone();

        effect.apply(&mut stage, &start, &defaults, 0.0, 0.05, 0.0);
        assert_eq!(stage.light_intensity, 4.0);
        effect.apply(&mut stage, &start, &defaults, 0.0, 0.12, 0.0);
        assert_eq!(stage.light_intensity, 0.3);
        effect.apply(&mut stage, &start, &defaults, 0.0, 0.2, 0.0);
        assert_eq!(stage.light_intensity, 4.0);
        effect.apply(&mut stage, &start, &defaults, 1.0, 0.3, 0.0);
        assert_eq!(stage.light_intensity, 0.6);
    }

    #[test]
    fn test_music_transition_swaps_halfway() {
        let effect = CinematicEffect::new(
            EffectKind::MusicTransition { track: "music/storm.ogg".to_string(), volume: 0.8 },
            2.0,
        );
        let defaults = Stage::default();
        let start = Stage { music_track: Some("music/calm.ogg".to_string()), ..Default::default() };
        let mut stage = start.clone();

        effect.apply(&mut stage, &start, &defaults, 0.25, 0.0, 0.0);
        assert_eq!(stage.music_volume, 0.5);
        assert_eq!(stage.music_track.as_deref(), Some("music/calm.ogg"));

        effect.apply(&mut stage, &start, &defaults, 1.0, 0.0, 0.0);
        assert_eq!(stage.music_track.as_deref(), Some("music/storm.ogg"));
        assert_eq!(stage.music_volume, 0.8);
    }

    #[test]
    fn test_shake_ends_at_rest() {
        let effect = CinematicEffect::new(EffectKind::CameraShake { amplitude: 6.0, frequency: 10.0 }, 1.0);
        let defaults = Stage::default();
        let mut stage = Stage::default();
        effect.apply(&mut stage, &defaults, &defaults, 0.5, 0.0, 0.0);
        assert_eq!(stage.shake_amplitude, 3.0);
        effect.apply(&mut stage, &defaults, &defaults, 1.0, 0.0, 0.0);
        assert_eq!(stage.shake_amplitude, 0.0);
    }

    #[test]
    fn test_quick_helpers() {
        assert_eq!(quick_blackout(0.1).effects[0].kind, EffectKind::FadeLight { intensity: 0.0 });
        assert_eq!(quick_fade_in(1.0).effects[0].kind, EffectKind::ScreenFlash { color: black() });
        assert!(matches!(
            quick_shake(2.0, 0.5).effects[0].kind,
            EffectKind::CameraShake { frequency, .. } if frequency == 10.0
        ));
    }
}
