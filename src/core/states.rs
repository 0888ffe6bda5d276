//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! player movement only runs while exploring, and the dialogue box only
//! reacts to input while a conversation is open.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` to read data files
/// - Move to `MainMenu` when loading completes
/// - Enter `InGame` when the player starts/continues
/// - `Paused` freezes virtual time and audio but keeps the world visible
/// - `Ending` plays the closing titles and returns to the menu
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Title screen
    MainMenu,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Closing titles
    Ending,
}

/// Sub-states for gameplay - only active when GameState::InGame.
///
/// Anything other than `Exploring` takes input away from the player.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// Normal gameplay - movement and interaction
    #[default]
    Exploring,
    /// A conversation is open
    Dialogue,
    /// A cinematic sequence holds control
    Cutscene,
    /// Fading between scenes
    Transition,
    /// The title card is up and the world is frozen
    Intro,
}

/// Which gameplay owners currently hold player control.
///
/// Each owner sets its own flag; `sync_play_state` derives the `PlayState`
/// from all of them so a pause/resume cannot lose it.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ControlLocks {
    pub dialogue: bool,
    pub cutscene: bool,
    pub transition: bool,
    pub intro: bool,
}

impl ControlLocks {
    /// Intro beats transition, transition beats dialogue, dialogue beats cutscene.
    pub fn play_state(&self) -> PlayState {
        if self.intro {
            PlayState::Intro
        } else if self.transition {
            PlayState::Transition
        } else if self.dialogue {
            PlayState::Dialogue
        } else if self.cutscene {
            PlayState::Cutscene
        } else {
            PlayState::Exploring
        }
    }
}

pub fn sync_play_state(
    locks: Res<ControlLocks>,
    state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    let wanted = locks.play_state();
    if *state.get() != wanted {
        next_state.set(wanted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_priority() {
        let mut locks = ControlLocks::default();
        assert_eq!(locks.play_state(), PlayState::Exploring);
        locks.cutscene = true;
        assert_eq!(locks.play_state(), PlayState::Cutscene);
        locks.dialogue = true;
        assert_eq!(locks.play_state(), PlayState::Dialogue);
        locks.transition = true;
        assert_eq!(locks.play_state(), PlayState::Transition);
        locks.intro = true;
        assert_eq!(locks.play_state(), PlayState::Intro);
    }
}
