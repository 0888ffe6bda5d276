use bevy::prelude::*;

use crate::core::{ZoneEntered, ZoneExited};

/// Wall sprite that turns translucent while the player stands behind it.
/// The wall entity doubles as the zone that covers the hidden area.
#[derive(Component, Debug, Clone)]
pub struct SeeThroughWall {
    pub faded_alpha: f32,
    /// Seconds for a full fade between opaque and faded
    pub fade_time: f32,
    pub inside: bool,
}

impl Default for SeeThroughWall {
    fn default() -> Self {
        Self {
            faded_alpha: 0.3,
            fade_time: 0.5,
            inside: false,
        }
    }
}

impl SeeThroughWall {
    pub fn target_alpha(&self) -> f32 {
        if self.inside {
            self.faded_alpha
        } else {
            1.0
        }
    }

    /// Step `alpha` linearly toward the target.
    pub fn step(&self, alpha: f32, dt: f32) -> f32 {
        let target = self.target_alpha();
        if self.fade_time <= 0.0 {
            return target;
        }
        let max_delta = (1.0 - self.faded_alpha).abs().max(f32::EPSILON) * dt / self.fade_time;
        let delta = (target - alpha).clamp(-max_delta, max_delta);
        alpha + delta
    }
}

pub fn track_wall_occupancy(
    mut entered: EventReader<ZoneEntered>,
    mut exited: EventReader<ZoneExited>,
    mut walls: Query<&mut SeeThroughWall>,
) {
    for event in entered.read() {
        if let Ok(mut wall) = walls.get_mut(event.zone) {
            wall.inside = true;
        }
    }
    for event in exited.read() {
        if let Ok(mut wall) = walls.get_mut(event.zone) {
            wall.inside = false;
        }
    }
}

pub fn fade_walls(time: Res<Time>, mut walls: Query<(&SeeThroughWall, &mut Sprite)>) {
    let dt = time.delta_secs();
    for (wall, mut sprite) in &mut walls {
        let alpha = sprite.color.alpha();
        if alpha == wall.target_alpha() {
            continue;
        }
        sprite.color.set_alpha(wall.step(alpha, dt));
    }
}
