//! Player-related components.

use bevy::prelude::*;

use crate::core::GameConfig;

/// Marker component for the player entity.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Which way the character sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

/// One of the three frames per facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Idle,
    Move1,
    Move2,
}

/// Number of steps in a walk cycle: idle, move1, idle, move2.
pub const STEP_CYCLE: u8 = 4;

/// Movement tuning, read from the game config.
#[derive(Resource, Debug, Clone)]
pub struct PlayerSettings {
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Speed gained per second
    pub acceleration: f32,
    /// Speed lost per second
    pub deceleration: f32,
    /// Seconds per step at walking speed
    pub base_step_interval: f32,
    pub footstep_sound: Option<String>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl PlayerSettings {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            run_speed: config.run_speed,
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            base_step_interval: config.base_step_interval,
            footstep_sound: config.footstep_sound.clone(),
        }
    }
}

/// Tracks player movement and the walk cycle.
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerMotion {
    pub speed: f32,
    /// Raw input direction this frame (not normalized)
    pub input: Vec2,
    pub facing: Facing,
    pub step_index: u8,
    pub step_timer: f32,
}

/// Images for every facing, `[idle, move1, move2]` each.
#[derive(Component, Debug, Clone, Default)]
pub struct DirectionSprites {
    pub front: [Handle<Image>; 3],
    pub back: [Handle<Image>; 3],
    pub left: [Handle<Image>; 3],
    pub right: [Handle<Image>; 3],
}

impl DirectionSprites {
    pub fn get(&self, facing: Facing, frame: Frame) -> &Handle<Image> {
        let set = match facing {
            Facing::Front => &self.front,
            Facing::Back => &self.back,
            Facing::Left => &self.left,
            Facing::Right => &self.right,
        };
        match frame {
            Frame::Idle => &set[0],
            Frame::Move1 => &set[1],
            Frame::Move2 => &set[2],
        }
    }
}

/// Draw order from height: lower on screen draws in front.
#[derive(Component, Debug, Clone, Copy)]
pub struct YSort {
    pub multiplier: f32,
    pub offset: f32,
}

impl Default for YSort {
    fn default() -> Self {
        Self {
            multiplier: 0.001,
            offset: 0.0,
        }
    }
}

impl YSort {
    pub fn z_for(&self, y: f32) -> f32 {
        -y * self.multiplier + self.offset
    }
}
