//! Player plugin - movement, walk cycle, and draw order.

use bevy::prelude::*;

use super::components::*;
use super::movement;
use crate::core::GameConfig;

/// Player plugin - handles player movement and animation.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // Set up movement systems
        movement::setup_movement_systems(app);

        let settings = app
            .world()
            .get_resource::<GameConfig>()
            .map(PlayerSettings::from_config)
            .unwrap_or_default();
        app.insert_resource(settings);
    }
}
