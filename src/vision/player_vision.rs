//! The circle of vision around the player.

use bevy::prelude::*;

use crate::core::approach;

/// Radius of the transparent hole in the mask image, as a fraction of its width.
pub const MASK_HOLE_FRACTION: f32 = 0.125;

#[derive(Component, Debug, Clone)]
pub struct PlayerVision {
    pub base_radius: f32,
    pub current_radius: f32,
    /// Fraction of the remaining gap closed per second
    pub transition_speed: f32,
    pub enabled: bool,
}

impl Default for PlayerVision {
    fn default() -> Self {
        Self::new(80.0)
    }
}

impl PlayerVision {
    pub fn new(radius: f32) -> Self {
        Self {
            base_radius: radius,
            current_radius: radius,
            transition_speed: 3.0,
            enabled: true,
        }
    }

    pub fn set_radius(&mut self, radius: f32, instant: bool) {
        self.base_radius = radius.max(0.0);
        if instant {
            self.current_radius = self.base_radius;
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.current_radius = approach(self.current_radius, self.base_radius, self.transition_speed, dt);
    }

    /// Sprite size that puts the mask's hole edge at the current radius.
    pub fn mask_size(&self) -> Vec2 {
        Vec2::splat(self.current_radius / MASK_HOLE_FRACTION)
    }
}

/// Dark sprite with a transparent hole, child of the player.
#[derive(Component)]
pub struct VisionMask;

pub fn update_player_vision(
    time: Res<Time>,
    mut visions: Query<(&mut PlayerVision, &Children)>,
    mut masks: Query<(&mut Sprite, &mut Visibility), With<VisionMask>>,
) {
    for (mut vision, children) in &mut visions {
        vision.update(time.delta_secs());
        for &child in children.iter() {
            let Ok((mut sprite, mut visibility)) = masks.get_mut(child) else {
                continue;
            };
            sprite.custom_size = Some(vision.mask_size());
            let wanted = if vision.enabled { Visibility::Inherited } else { Visibility::Hidden };
            if *visibility != wanted {
                *visibility = wanted;
            }
        }
    }
}
