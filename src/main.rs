//! Vigil - Entry Point
//!
//! A top-down narrative exploration game.
//!
//! Controls:
//! - WASD / arrows: Move
//! - Shift: Run
//! - E: Interact / advance dialogue
//! - Space: Skip cutscene
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier2d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins. Kira replaces bevy's own audio.
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Vigil".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest())
                .disable::<bevy::audio::AudioPlugin>(),
        )
        .add_plugins(AudioPlugin)

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(16.0))

        // Our game plugin
        .add_plugins(vigil::VigilPlugin)

        .run();
}
