//! Timed blackout run.
//!
//! Entering the trigger zone flashes the screen white, then the vision
//! radius shrinks over `total_duration` while breathing grows louder. Running
//! out of time flashes again and puts the player back at the checkpoint;
//! reaching the end zone finishes the run for good.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::{lerp, GameCommand};

fn default_total_duration() -> f32 {
    30.0
}

fn default_min_radius() -> f32 {
    8.0
}

fn default_flash_intensity() -> f32 {
    300.0
}

fn default_flash_duration() -> f32 {
    0.5
}

/// Scene data for a collapse run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollapseRunConfig {
    #[serde(default = "default_total_duration")]
    pub total_duration: f32,
    #[serde(default = "default_min_radius")]
    pub min_radius: f32,
    #[serde(default = "default_flash_intensity")]
    pub flash_intensity: f32,
    #[serde(default = "default_flash_duration")]
    pub flash_duration: f32,
    /// Where a timed-out run sends the player
    pub checkpoint: (f32, f32),
    /// Where the finished run sends the player
    #[serde(default)]
    pub finish_point: Option<(f32, f32)>,
    #[serde(default)]
    pub run_music: Option<String>,
    #[serde(default)]
    pub end_music: Option<String>,
    #[serde(default)]
    pub breathing: Option<String>,
    #[serde(default)]
    pub explosion_sound: Option<String>,
    #[serde(default)]
    pub blackout_sound: Option<String>,
    #[serde(default)]
    pub on_start: Vec<GameCommand>,
    #[serde(default)]
    pub on_reset: Vec<GameCommand>,
    #[serde(default)]
    pub on_finish: Vec<GameCommand>,
}

impl CollapseRunConfig {
    pub fn new(checkpoint: Vec2) -> Self {
        Self {
            total_duration: default_total_duration(),
            min_radius: default_min_radius(),
            flash_intensity: default_flash_intensity(),
            flash_duration: default_flash_duration(),
            checkpoint: (checkpoint.x, checkpoint.y),
            finish_point: None,
            run_music: None,
            end_music: None,
            breathing: None,
            explosion_sound: None,
            blackout_sound: None,
            on_start: Vec::new(),
            on_reset: Vec::new(),
            on_finish: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollapsePhase {
    Idle,
    /// Flash up before the run starts
    Igniting { elapsed: f32 },
    /// Flash back down, then the timer starts
    Settling { elapsed: f32 },
    Running { remaining: f32 },
    /// Flash up on timeout, then reset
    Failing { elapsed: f32 },
    /// Flash down after a reset
    Recovering { elapsed: f32 },
    /// Flash up at the end zone
    Finishing { elapsed: f32 },
    /// One frame at full white while the world is swapped
    Swapping,
    /// Flash down after finishing
    Revealing { elapsed: f32 },
    Finished,
}

/// What the world should do after a tick. `None` fields are left alone.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollapseOutput {
    pub light: Option<f32>,
    pub vision_radius: Option<f32>,
    pub breathing_volume: Option<f32>,
    pub teleport: Option<Vec2>,
    pub music: Option<Option<String>>,
    pub ambience: Option<Option<String>>,
    pub sounds: Vec<String>,
    pub hooks: Vec<GameCommand>,
}

/// State of a collapse run in the current scene.
#[derive(Resource, Debug, Clone)]
pub struct CollapseRun {
    pub config: CollapseRunConfig,
    pub phase: CollapsePhase,
    /// Light level outside the flashes
    pub base_light: f32,
    /// Vision radius before the run, restored on reset
    pub initial_radius: f32,
}

impl CollapseRun {
    pub fn new(config: CollapseRunConfig, base_light: f32, initial_radius: f32) -> Self {
        Self {
            config,
            phase: CollapsePhase::Idle,
            base_light,
            initial_radius,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, CollapsePhase::Running { .. })
    }

    /// Trigger zone entered. Ignored unless idle.
    pub fn trigger(&mut self) -> bool {
        if self.phase != CollapsePhase::Idle {
            return false;
        }
        info!("Collapse run triggered");
        self.phase = CollapsePhase::Igniting { elapsed: 0.0 };
        true
    }

    /// End zone reached. Only counts while the run is on.
    pub fn finish(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        info!("Collapse run finished");
        self.phase = CollapsePhase::Finishing { elapsed: 0.0 };
        true
    }

    fn flash_up(&self, elapsed: f32) -> f32 {
        lerp(self.base_light, self.config.flash_intensity, self.flash_progress(elapsed))
    }

    fn flash_down(&self, elapsed: f32) -> f32 {
        lerp(self.config.flash_intensity, self.base_light, self.flash_progress(elapsed))
    }

    fn flash_progress(&self, elapsed: f32) -> f32 {
        if self.config.flash_duration <= 0.0 {
            1.0
        } else {
            (elapsed / self.config.flash_duration).min(1.0)
        }
    }

    fn checkpoint(&self) -> Vec2 {
        Vec2::new(self.config.checkpoint.0, self.config.checkpoint.1)
    }

    fn reset(&self, out: &mut CollapseOutput) {
        out.music = Some(None);
        out.ambience = Some(None);
        out.sounds.extend(self.config.blackout_sound.clone());
        out.teleport = Some(self.checkpoint());
        out.light = Some(self.base_light);
        out.vision_radius = Some(self.initial_radius);
        out.breathing_volume = Some(0.0);
        out.hooks.extend(self.config.on_reset.iter().cloned());
    }

    pub fn tick(&mut self, dt: f32) -> CollapseOutput {
        let mut out = CollapseOutput::default();
        let flash = self.config.flash_duration;

        self.phase = match self.phase {
            CollapsePhase::Idle => CollapsePhase::Idle,
            CollapsePhase::Finished => CollapsePhase::Finished,
            CollapsePhase::Igniting { elapsed } => {
                out.light = Some(self.flash_up(elapsed));
                if elapsed >= flash {
                    out.music = Some(self.config.run_music.clone());
                    out.ambience = Some(self.config.breathing.clone());
                    out.breathing_volume = Some(0.0);
                    out.sounds.extend(self.config.explosion_sound.clone());
                    out.hooks.extend(self.config.on_start.iter().cloned());
                    CollapsePhase::Settling { elapsed: 0.0 }
                } else {
                    CollapsePhase::Igniting { elapsed: elapsed + dt }
                }
            }
            CollapsePhase::Settling { elapsed } => {
                out.light = Some(self.flash_down(elapsed));
                if elapsed >= flash {
                    CollapsePhase::Running {
                        remaining: self.config.total_duration,
                    }
                } else {
                    CollapsePhase::Settling { elapsed: elapsed + dt }
                }
            }
            CollapsePhase::Running { remaining } => {
                let remaining = remaining - dt;
                let progress = if self.config.total_duration > 0.0 {
                    (remaining / self.config.total_duration).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                out.vision_radius = Some(lerp(self.config.min_radius, self.initial_radius, progress));
                out.breathing_volume = Some(lerp(1.0, 0.0, progress));
                if remaining <= 0.0 {
                    warn!("Collapse run timed out");
                    CollapsePhase::Failing { elapsed: 0.0 }
                } else {
                    CollapsePhase::Running { remaining }
                }
            }
            CollapsePhase::Failing { elapsed } => {
                out.light = Some(self.flash_up(elapsed));
                if elapsed >= flash {
                    self.reset(&mut out);
                    out.light = Some(self.config.flash_intensity);
                    CollapsePhase::Recovering { elapsed: 0.0 }
                } else {
                    CollapsePhase::Failing { elapsed: elapsed + dt }
                }
            }
            CollapsePhase::Recovering { elapsed } => {
                out.light = Some(self.flash_down(elapsed));
                if elapsed >= flash {
                    CollapsePhase::Idle
                } else {
                    CollapsePhase::Recovering { elapsed: elapsed + dt }
                }
            }
            CollapsePhase::Finishing { elapsed } => {
                out.light = Some(self.flash_up(elapsed));
                if elapsed >= flash {
                    let target = self
                        .config
                        .finish_point
                        .map(|(x, y)| Vec2::new(x, y))
                        .unwrap_or_else(|| self.checkpoint());
                    out.teleport = Some(target);
                    out.vision_radius = Some(self.initial_radius);
                    out.breathing_volume = Some(0.0);
                    out.ambience = Some(None);
                    out.music = Some(self.config.end_music.clone());
                    out.sounds.extend(self.config.explosion_sound.clone());
                    out.hooks.extend(self.config.on_finish.iter().cloned());
                    CollapsePhase::Swapping
                } else {
                    CollapsePhase::Finishing { elapsed: elapsed + dt }
                }
            }
            CollapsePhase::Swapping => {
                out.light = Some(self.config.flash_intensity);
                CollapsePhase::Revealing { elapsed: 0.0 }
            }
            CollapsePhase::Revealing { elapsed } => {
                out.light = Some(self.flash_down(elapsed));
                if elapsed >= flash {
                    CollapsePhase::Finished
                } else {
                    CollapsePhase::Revealing { elapsed: elapsed + dt }
                }
            }
        };

        out
    }
}

/// Zone that starts the run.
#[derive(Component, Debug)]
pub struct CollapseTrigger;

/// Zone that finishes the run.
#[derive(Component, Debug)]
pub struct CollapseEnd;

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> CollapseRun {
        let mut config = CollapseRunConfig::new(Vec2::new(10.0, 20.0));
        config.total_duration = 4.0;
        config.flash_duration = 0.5;
        config.finish_point = Some((100.0, 0.0));
        config.on_finish = vec![GameCommand::Show("rubble".to_string())];
        CollapseRun::new(config, 1.0, 80.0)
    }

    /// Tick until the phase changes kind, collecting outputs.
    fn tick_until(run: &mut CollapseRun, dt: f32, done: impl Fn(&CollapsePhase) -> bool) -> Vec<CollapseOutput> {
        let mut outputs = Vec::new();
        for _ in 0..1000 {
            outputs.push(run.tick(dt));
            if done(&run.phase) {
                break;
            }
        }
        outputs
    }

    #[test]
    fn test_trigger_flashes_then_runs() {
        let mut run = run();
        assert!(run.trigger());
        assert!(!run.trigger());

        let outputs = tick_until(&mut run, 0.125, |p| matches!(p, CollapsePhase::Running { .. }));
        let peak = outputs.iter().filter_map(|o| o.light).fold(0.0, f32::max);
        assert_eq!(peak, 300.0);
        assert_eq!(outputs.last().and_then(|o| o.light), Some(1.0));
        assert!(run.is_running());
    }

    #[test]
    fn test_radius_shrinks_and_breathing_rises() {
        let mut run = run();
        run.phase = CollapsePhase::Running { remaining: 4.0 };
        let out = run.tick(2.0);
        assert_eq!(out.vision_radius, Some(lerp(8.0, 80.0, 0.5)));
        assert_eq!(out.breathing_volume, Some(0.5));
    }

    #[test]
    fn test_timeout_resets_to_checkpoint_and_rearms() {
        let mut run = run();
        run.phase = CollapsePhase::Running { remaining: 0.5 };
        let outputs = tick_until(&mut run, 0.25, |p| *p == CollapsePhase::Idle);
        let teleport = outputs.iter().find_map(|o| o.teleport);
        assert_eq!(teleport, Some(Vec2::new(10.0, 20.0)));
        assert!(outputs.iter().any(|o| o.vision_radius == Some(80.0)));
        assert!(run.trigger());
    }

    #[test]
    fn test_finish_moves_player_and_fires_hooks_once() {
        let mut run = run();
        assert!(!run.finish());
        run.phase = CollapsePhase::Running { remaining: 3.0 };
        assert!(run.finish());

        let outputs = tick_until(&mut run, 0.25, |p| *p == CollapsePhase::Finished);
        assert_eq!(outputs.iter().find_map(|o| o.teleport), Some(Vec2::new(100.0, 0.0)));
        let hooks: Vec<_> = outputs.iter().flat_map(|o| o.hooks.clone()).collect();
        assert_eq!(hooks, vec![GameCommand::Show("rubble".to_string())]);
        assert!(!run.trigger());
    }
}
