//! Fade-out, swap, fade-in between scenes.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    Idle,
    FadingOut { elapsed: f32 },
    /// The new scene is being spawned this frame
    Swapping,
    /// One frame for the new scene to settle
    Settling,
    FadingIn { elapsed: f32 },
}

/// What the world should do after a tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionStep {
    /// Fade overlay opacity
    pub alpha: f32,
    /// Scene to load now
    pub swap: Option<String>,
    pub finished: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct SceneTransition {
    pub phase: TransitionPhase,
    pub fade_duration: f32,
    pending: Option<String>,
}

impl Default for SceneTransition {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl SceneTransition {
    pub fn new(fade_duration: f32) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            fade_duration,
            pending: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    /// Start a transition to `scene`. Ignored while one is running.
    pub fn request(&mut self, scene: impl Into<String>) -> bool {
        let scene = scene.into();
        if self.is_active() {
            warn!("Transition to '{}' ignored, one is already running", scene);
            return false;
        }
        info!("Transition to scene '{}'", scene);
        self.pending = Some(scene);
        self.phase = TransitionPhase::FadingOut { elapsed: 0.0 };
        true
    }

    fn progress(&self, elapsed: f32) -> f32 {
        if self.fade_duration <= 0.0 {
            1.0
        } else {
            (elapsed / self.fade_duration).min(1.0)
        }
    }

    pub fn tick(&mut self, dt: f32) -> TransitionStep {
        let mut step = TransitionStep::default();
        self.phase = match self.phase {
            TransitionPhase::Idle => TransitionPhase::Idle,
            TransitionPhase::FadingOut { elapsed } => {
                let elapsed = elapsed + dt;
                step.alpha = self.progress(elapsed);
                if step.alpha >= 1.0 {
                    TransitionPhase::Swapping
                } else {
                    TransitionPhase::FadingOut { elapsed }
                }
            }
            TransitionPhase::Swapping => {
                step.alpha = 1.0;
                step.swap = self.pending.take();
                TransitionPhase::Settling
            }
            TransitionPhase::Settling => {
                step.alpha = 1.0;
                TransitionPhase::FadingIn { elapsed: 0.0 }
            }
            TransitionPhase::FadingIn { elapsed } => {
                let elapsed = elapsed + dt;
                step.alpha = 1.0 - self.progress(elapsed);
                if step.alpha <= 0.0 {
                    step.finished = true;
                    TransitionPhase::Idle
                } else {
                    TransitionPhase::FadingIn { elapsed }
                }
            }
        };
        step
    }
}
