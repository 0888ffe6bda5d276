//! Player module - player entity, top-down movement, sprite direction and shadows.

mod components;
mod movement;
mod plugin;
mod shadow;

pub use components::*;
pub use movement::{facing_for, footstep_pitch, read_direction, spawn_player};
pub use plugin::PlayerPlugin;
pub use shadow::{cast_wall_shadow, mirror_player_shadow, PlayerShadow, WallShadow};
