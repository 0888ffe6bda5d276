//! Vigil - a top-down 2D narrative exploration game in Bevy.
//!
//! The player walks a dark house room to room, talks to its residents and
//! pushes a small set of quests forward. Quest state gates dialogue,
//! interactions and cutscenes, and hooks in the data files turn quest
//! changes into scene changes.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, config, hook queue
//! - **Quests**: Quest ledger, gates, actions, debug overlay
//! - **Persistence**: Key-value preferences store
//! - **Audio**: Music, ambience and one-shot sounds
//! - **Dialogue**: Gated dialogue sets, conversations, typewriter
//! - **Cinematics**: Timed audiovisual effect sequences
//! - **Vision**: Global light, vision circle, collapse run, see-through walls
//! - **Interaction**: Quest interactors and their prompt
//! - **Inventory**: Items, pickups, repairs
//! - **Camera**: Room camera switching and the eased main camera
//! - **Transition**: Scene fades, doors, teleporters, closing titles
//! - **Player**: Top-down movement and direction sprites
//! - **World**: Scenes, zones, named props
//! - **UI**: Menus, HUD, dialogue box

pub mod audio;
pub mod camera;
pub mod cinematics;
pub mod core;
pub mod dialogue;
pub mod interaction;
pub mod inventory;
pub mod persistence;
pub mod player;
pub mod quests;
pub mod transition;
pub mod ui;
pub mod vision;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct VigilPlugin;

impl Plugin for VigilPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first, it loads the config)
            .add_plugins(core::CorePlugin)

            // Quest ledger and its prefs store
            .add_plugins(quests::QuestPlugin)

            // Sound
            .add_plugins(audio::GameAudioPlugin)

            // Narrative systems
            .add_plugins((
                dialogue::DialoguePlugin,
                cinematics::CinematicsPlugin,
                vision::VisionPlugin,
                interaction::InteractionPlugin,
                inventory::InventoryPlugin,
            ))

            // Camera and scene flow
            .add_plugins((camera::CameraPlugin, transition::TransitionPlugin))

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
