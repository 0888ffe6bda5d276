//! Core plugin that sets up game states, events, config and pausing.

use bevy::prelude::*;

use super::config::GameConfig;
use super::events::*;
use super::hooks::{flush_hook_queue, HookQueue};
use super::input::InteractSet;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, etc.)
/// - Global events (GameCommand, QuestChanged, ZoneEntered, etc.)
/// - The game config resource
/// - Pause / resume of virtual time
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(GameConfig::load());
        }

        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            // Register global events
            .add_event::<GameCommand>()
            .add_event::<QuestChanged>()
            .add_event::<ItemAdded>()
            .add_event::<ItemRemoved>()
            .add_event::<ZoneEntered>()
            .add_event::<ZoneExited>()
            .init_resource::<HookQueue>()
            .init_resource::<ControlLocks>()
            .configure_sets(Update, (InteractSet::World, InteractSet::Dialogue).chain())
            .add_systems(PostUpdate, flush_hook_queue)
            .add_systems(PostUpdate, sync_play_state.run_if(in_state(GameState::InGame)))

            // Data loaders run at Startup, so Loading only lasts one frame
            .add_systems(OnEnter(GameState::Loading), transition_to_main_menu)

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            )
            .add_systems(OnEnter(GameState::Paused), pause_virtual_time)
            .add_systems(OnExit(GameState::Paused), resume_virtual_time);
    }
}

fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}

fn pause_virtual_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

/// The intro card keeps the world frozen through a pause.
fn resume_virtual_time(mut time: ResMut<Time<Virtual>>, locks: Res<ControlLocks>) {
    if !locks.intro {
        time.unpause();
    }
}
