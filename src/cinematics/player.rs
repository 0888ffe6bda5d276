//! Frame-driven sequence playback.

use bevy::prelude::*;

use super::effect::CinematicSequence;
use super::stage::Stage;
use crate::core::GameCommand;

#[derive(Debug, Clone)]
struct Playback {
    sequence: CinematicSequence,
    index: usize,
    elapsed: f32,
    /// Stage snapshot taken on the current effect's first frame
    start: Option<Stage>,
}

/// Plays one sequence at a time against a [`Stage`].
#[derive(Resource, Debug, Clone, Default)]
pub struct SequencePlayer {
    current: Option<Playback>,
    defaults: Stage,
    clock: f32,
    pub verbose: bool,
}

impl SequencePlayer {
    /// `defaults` is what `stop` restores.
    pub fn new(defaults: Stage) -> Self {
        Self {
            current: None,
            defaults,
            clock: 0.0,
            verbose: false,
        }
    }

    pub fn defaults(&self) -> &Stage {
        &self.defaults
    }

    /// Light level `stop` goes back to. Set from each scene on load.
    pub fn set_light_defaults(&mut self, intensity: f32, color: Color) {
        self.defaults.light_intensity = intensity;
        self.defaults.light_color = color;
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|p| p.sequence.name.as_str())
    }

    /// Index of the running effect.
    pub fn current_effect(&self) -> Option<usize> {
        self.current.as_ref().map(|p| p.index)
    }

    /// Start `sequence`, abandoning the current one where it stands.
    /// Returns the sequence's start hooks.
    pub fn play(&mut self, sequence: CinematicSequence) -> Vec<GameCommand> {
        if let Some(previous) = self.current.take() {
            debug!("Sequence '{}' interrupted by '{}'", previous.sequence.name, sequence.name);
        }
        self.log(format!("Playing sequence '{}'", sequence.name));
        let hooks = sequence.on_start.clone();
        self.current = Some(Playback {
            sequence,
            index: 0,
            elapsed: 0.0,
            start: None,
        });
        hooks
    }

    /// Cancel and restore the stage defaults.
    pub fn stop(&mut self, stage: &mut Stage) {
        if let Some(playback) = self.current.take() {
            self.log(format!("Stopped sequence '{}'", playback.sequence.name));
            stage.restore(&self.defaults);
        }
    }

    /// Stop, then fire the sequence's completion hooks.
    pub fn skip(&mut self, stage: &mut Stage) -> Vec<GameCommand> {
        let hooks = self
            .current
            .as_ref()
            .map(|p| p.sequence.on_complete.clone())
            .unwrap_or_default();
        self.stop(stage);
        hooks
    }

    /// Advance by `dt` seconds. Returns every hook fired this frame.
    pub fn tick(&mut self, dt: f32, stage: &mut Stage) -> Vec<GameCommand> {
        let mut fired = Vec::new();
        self.clock += dt;
        let clock = self.clock;
        let mut restarted = false;

        loop {
            let Some(playback) = self.current.as_mut() else {
                break;
            };

            if playback.index >= playback.sequence.effects.len() {
                // At most one restart per frame
                if playback.sequence.looped && !playback.sequence.effects.is_empty() && !restarted {
                    playback.index = 0;
                    restarted = true;
                    continue;
                }
                if playback.sequence.looped {
                    break;
                }
                fired.extend(playback.sequence.on_complete.iter().cloned());
                let name = playback.sequence.name.clone();
                self.current = None;
                self.log(format!("Sequence '{}' complete", name));
                break;
            }

            let effect = &playback.sequence.effects[playback.index];

            if playback.start.is_none() {
                if self.verbose {
                    info!("  effect '{}' ({:?})", effect.name, effect.kind);
                }
                fired.extend(effect.on_start.iter().cloned());
                fired.extend(effect.start_commands());
                effect.begin(stage);
                playback.start = Some(stage.clone());
                playback.elapsed = 0.0;
            }

            let length = effect.kind.length(effect.duration);
            let Some(start) = playback.start.as_ref() else {
                break;
            };

            if effect.kind.is_instant() || playback.elapsed >= length {
                effect.apply(stage, start, &self.defaults, 1.0, length, clock);
                fired.extend(effect.on_complete.iter().cloned());
                playback.index += 1;
                playback.start = None;
                continue;
            }

            let t = effect.easing.evaluate(playback.elapsed / length);
            effect.apply(stage, start, &self.defaults, t, playback.elapsed, clock);
            playback.elapsed += dt;
            break;
        }

        fired
    }

    fn log(&self, message: String) {
        if self.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cinematics::{quick_fade_out, CinematicEffect, EffectKind};
    use crate::core::Easing;

    fn fade(intensity: f32, duration: f32) -> CinematicEffect {
        CinematicEffect::new(EffectKind::FadeLight { intensity }, duration).with_easing(Easing::Linear)
    }

    fn cue(name: &str) -> GameCommand {
        GameCommand::Cue(name.to_string())
    }

    #[test]
    fn test_effects_play_in_order_and_snap() {
        let mut sequence = CinematicSequence::new("dim", vec![fade(0.0, 1.0), fade(0.5, 1.0)]);
        sequence.on_complete = vec![cue("done")];
        let mut player = SequencePlayer::new(Stage::default());
        let mut stage = Stage::default();
        player.play(sequence);

        player.tick(0.5, &mut stage);
        // First frame applies t = 0 from the captured start
        assert_eq!(stage.light_intensity, 1.0);
        player.tick(0.25, &mut stage);
        assert_eq!(stage.light_intensity, 0.5);
        player.tick(0.25, &mut stage);
        assert_eq!(stage.light_intensity, 0.25);

        // elapsed reaches 1.0: snap to 0 and start the second effect from there
        let fired = player.tick(0.5, &mut stage);
        assert!(fired.is_empty());
        assert_eq!(player.current_effect(), Some(1));
        assert_eq!(stage.light_intensity, 0.0);

        player.tick(0.5, &mut stage);
        assert_eq!(stage.light_intensity, 0.25);
        let fired = player.tick(0.5, &mut stage);
        assert_eq!(stage.light_intensity, 0.5);
        assert_eq!(fired, vec![cue("done")]);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_instant_effects_chain_in_one_frame() {
        let sequence = CinematicSequence::new(
            "props",
            vec![
                CinematicEffect::new(EffectKind::Show("lamp".to_string()), 0.0),
                CinematicEffect::new(EffectKind::TimeScale { scale: 0.5 }, 0.0),
                CinematicEffect::new(EffectKind::Hide("door".to_string()), 0.0),
            ],
        );
        let mut player = SequencePlayer::new(Stage::default());
        let mut stage = Stage::default();
        player.play(sequence);
        let fired = player.tick(0.016, &mut stage);
        assert_eq!(
            fired,
            vec![GameCommand::Show("lamp".to_string()), GameCommand::Hide("door".to_string())]
        );
        assert_eq!(stage.time_scale, 0.5);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_play_cancels_without_restoring() {
        let mut player = SequencePlayer::new(Stage::default());
        let mut stage = Stage::default();
        player.play(CinematicSequence::new("first", vec![fade(0.0, 1.0)]));
        player.tick(0.5, &mut stage);
        player.tick(0.5, &mut stage);
        assert_eq!(stage.light_intensity, 0.5);

        player.play(quick_fade_out(1.0));
        assert_eq!(player.current_name(), Some("quick_fade_out"));
        assert_eq!(stage.light_intensity, 0.5);
    }

    #[test]
    fn test_stop_restores_defaults_and_skip_fires_completion() {
        let defaults = Stage { light_intensity: 0.8, ..Default::default() };
        let mut player = SequencePlayer::new(defaults.clone());
        let mut stage = defaults.clone();
        let mut sequence = CinematicSequence::new("long", vec![fade(0.0, 10.0)]);
        sequence.on_complete = vec![cue("skipped")];

        player.play(sequence.clone());
        player.tick(1.0, &mut stage);
        player.tick(5.0, &mut stage);
        player.stop(&mut stage);
        assert_eq!(stage.light_intensity, 0.8);
        assert!(player.skip(&mut stage).is_empty());

        player.play(sequence);
        player.tick(1.0, &mut stage);
        assert_eq!(player.skip(&mut stage), vec![cue("skipped")]);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_stop_returns_to_scene_light() {
        let mut player = SequencePlayer::new(Stage::default());
        player.set_light_defaults(0.15, Color::WHITE);
        let mut stage = Stage { light_intensity: 0.15, ..Default::default() };

        player.play(CinematicSequence::new("up", vec![fade(1.0, 2.0)]));
        player.tick(0.016, &mut stage);
        player.tick(1.0, &mut stage);
        player.tick(0.016, &mut stage);
        // Fading up from the scene level, not from 1.0
        assert!(stage.light_intensity > 0.5 && stage.light_intensity < 1.0);

        player.stop(&mut stage);
        assert_eq!(stage.light_intensity, 0.15);
        assert_eq!(player.defaults().camera_zoom, 1.0);
    }

    #[test]
    fn test_looped_sequence_restarts() {
        let mut sequence = CinematicSequence::new(
            "pulse",
            vec![CinematicEffect::new(EffectKind::Wait, 1.0).named("beat")],
        );
        sequence.looped = true;
        sequence.effects[0].on_complete = vec![cue("beat")];
        let mut player = SequencePlayer::new(Stage::default());
        let mut stage = Stage::default();
        player.play(sequence);

        let mut beats = 0;
        for _ in 0..10 {
            beats += player.tick(0.5, &mut stage).len();
        }
        assert!(beats >= 4);
        assert!(player.is_playing());
    }

    #[test]
    fn test_looped_instant_sequence_does_not_spin() {
        let mut sequence = CinematicSequence::new("spam", vec![CinematicEffect::new(EffectKind::Command(cue("x")), 0.0)]);
        sequence.looped = true;
        let mut player = SequencePlayer::new(Stage::default());
        let mut stage = Stage::default();
        player.play(sequence);
        assert_eq!(player.tick(0.016, &mut stage).len(), 2);
    }
}
