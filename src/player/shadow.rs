//! Shadows that follow the player.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use serde::Deserialize;

use super::components::{DirectionSprites, Player, PlayerMotion};

/// Child of the player drawn from its own sprite set, always on the
/// player's facing and walk frame.
#[derive(Component, Debug, Clone)]
pub struct PlayerShadow {
    pub sprites: DirectionSprites,
}

fn default_direction() -> (f32, f32) {
    (-1.0, 1.0)
}

fn default_max_distance() -> f32 {
    48.0
}

/// Copy of the player's sprite thrown along `direction` until it meets a
/// solid collider or runs out at `max_distance`.
#[derive(Component, Debug, Clone, PartialEq, Deserialize)]
pub struct WallShadow {
    #[serde(default = "default_direction")]
    pub direction: (f32, f32),
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// Moves the ray start off the player so it doesn't begin inside a wall
    #[serde(default)]
    pub origin_offset: (f32, f32),
    #[serde(default)]
    pub visual_offset: (f32, f32),
}

impl Default for WallShadow {
    fn default() -> Self {
        Self {
            direction: default_direction(),
            max_distance: default_max_distance(),
            origin_offset: (0.0, 0.0),
            visual_offset: (0.0, 0.0),
        }
    }
}

impl WallShadow {
    pub fn ray_origin(&self, player: Vec2) -> Vec2 {
        player + Vec2::new(self.origin_offset.0, self.origin_offset.1)
    }

    pub fn ray_direction(&self) -> Vec2 {
        Vec2::new(self.direction.0, self.direction.1).normalize_or_zero()
    }

    /// Shadow position for a player at `player`, given the distance to the
    /// first wall along the ray.
    pub fn target(&self, player: Vec2, hit: Option<f32>) -> Vec2 {
        let distance = hit.map_or(self.max_distance, |d| d.clamp(0.0, self.max_distance));
        self.ray_origin(player)
            + self.ray_direction() * distance
            + Vec2::new(self.visual_offset.0, self.visual_offset.1)
    }
}

pub fn mirror_player_shadow(
    players: Query<&PlayerMotion, With<Player>>,
    mut shadows: Query<(&PlayerShadow, &Parent, &mut Sprite)>,
) {
    for (shadow, parent, mut sprite) in &mut shadows {
        let Ok(motion) = players.get(parent.get()) else {
            continue;
        };
        let image = shadow.sprites.get(motion.facing, motion.frame());
        if sprite.image != *image {
            sprite.image = image.clone();
        }
    }
}

#[allow(clippy::type_complexity)]
pub fn cast_wall_shadow(
    rapier_context: Query<&RapierContext>,
    players: Query<(Entity, &Transform, &Sprite), (With<Player>, Without<WallShadow>)>,
    mut shadows: Query<(&WallShadow, &mut Transform, &mut Sprite), Without<Player>>,
) {
    let Ok((player, player_transform, player_sprite)) = players.get_single() else {
        return;
    };
    let position = player_transform.translation.truncate();
    let context = rapier_context.get_single().ok();

    for (shadow, mut transform, mut sprite) in &mut shadows {
        if sprite.image != player_sprite.image {
            sprite.image = player_sprite.image.clone();
        }
        sprite.flip_x = player_sprite.flip_x;

        let hit = context.and_then(|context| {
            context
                .cast_ray(
                    shadow.ray_origin(position),
                    shadow.ray_direction(),
                    shadow.max_distance,
                    true,
                    QueryFilter::default().exclude_collider(player).exclude_sensors(),
                )
                .map(|(_, distance)| distance)
        });
        let target = shadow.target(position, hit);
        transform.translation.x = target.x;
        transform.translation.y = target.y;
    }
}
