//! Cinematics plugin - command handling, ticking, and applying the stage.

use bevy::prelude::*;

use super::effect::CinematicSequence;
use super::player::SequencePlayer;
use super::stage::Stage;
use crate::audio::{MusicVolume, PlayMusic, PlaySound};
use crate::core::{ControlLocks, GameCommand, GameConfig, GameState, HookQueue, SKIP_KEY};
use crate::quests::QuestLedger;
use crate::vision::GlobalLight;

/// Sequences available in the loaded scene.
#[derive(Resource, Debug, Default)]
pub struct SequenceLibrary {
    pub sequences: Vec<CinematicSequence>,
}

impl SequenceLibrary {
    pub fn get(&self, name: &str) -> Option<&CinematicSequence> {
        self.sequences.iter().find(|s| s.name == name)
    }
}

/// Full-screen node tinted by `Stage::overlay_color` / `overlay_alpha`.
#[derive(Component)]
pub struct CinematicOverlay;

pub struct CinematicsPlugin;

impl Plugin for CinematicsPlugin {
    fn build(&self, app: &mut App) {
        let verbose = app
            .world()
            .get_resource::<GameConfig>()
            .is_some_and(|c| c.cinematic_debug || c.debug_logs);
        let mut player = SequencePlayer::new(Stage::default());
        player.verbose = verbose;

        app.init_resource::<Stage>()
            .insert_resource(player)
            .init_resource::<SequenceLibrary>()
            .init_resource::<GlobalLight>()
            .init_resource::<MusicVolume>()
            .add_event::<PlaySound>()
            .add_event::<PlayMusic>()
            .add_systems(Startup, spawn_overlay)
            .add_systems(
                Update,
                (
                    autoplay_sequences.run_if(resource_changed::<SequenceLibrary>),
                    handle_sequence_commands,
                    skip_sequence,
                    tick_sequence,
                    sync_cutscene_lock,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(PostUpdate, (apply_stage, update_overlay))
            .add_systems(OnEnter(GameState::MainMenu), reset_stage);
    }
}

fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::NONE),
        GlobalZIndex(50),
        CinematicOverlay,
        Name::new("Cinematic Overlay"),
    ));
}

fn play_named(
    name: &str,
    library: &SequenceLibrary,
    ledger: &QuestLedger,
    player: &mut SequencePlayer,
    hooks: &mut HookQueue,
) {
    let Some(sequence) = library.get(name) else {
        error!("Sequence '{}' not found", name);
        return;
    };
    if !sequence.can_play(ledger) {
        if player.verbose {
            warn!("Sequence '{}' does not meet its conditions", name);
        }
        return;
    }
    hooks.extend(player.play(sequence.clone()));
}

fn autoplay_sequences(
    library: Res<SequenceLibrary>,
    ledger: Res<QuestLedger>,
    mut player: ResMut<SequencePlayer>,
    mut hooks: ResMut<HookQueue>,
) {
    let names: Vec<String> = library
        .sequences
        .iter()
        .filter(|s| s.play_on_start)
        .map(|s| s.name.clone())
        .collect();
    for name in names {
        play_named(&name, &library, &ledger, &mut player, &mut hooks);
    }
}

fn handle_sequence_commands(
    mut events: EventReader<GameCommand>,
    library: Res<SequenceLibrary>,
    ledger: Res<QuestLedger>,
    mut player: ResMut<SequencePlayer>,
    mut stage: ResMut<Stage>,
    mut hooks: ResMut<HookQueue>,
) {
    for event in events.read() {
        match event {
            GameCommand::PlaySequence(name) => play_named(name, &library, &ledger, &mut player, &mut hooks),
            GameCommand::StopSequence => player.stop(&mut stage),
            _ => {}
        }
    }
}

fn skip_sequence(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    mut player: ResMut<SequencePlayer>,
    mut stage: ResMut<Stage>,
    mut hooks: ResMut<HookQueue>,
) {
    if !config.skip_key_enabled || config.cinematic_debug || !player.is_playing() {
        return;
    }
    if keyboard.just_pressed(SKIP_KEY) {
        info!("Skipping sequence {:?}", player.current_name());
        hooks.extend(player.skip(&mut stage));
    }
}

fn tick_sequence(
    time: Res<Time>,
    mut player: ResMut<SequencePlayer>,
    mut stage: ResMut<Stage>,
    mut hooks: ResMut<HookQueue>,
) {
    if !player.is_playing() {
        return;
    }
    hooks.extend(player.tick(time.delta_secs(), &mut stage));
}

fn sync_cutscene_lock(player: Res<SequencePlayer>, mut locks: ResMut<ControlLocks>) {
    let playing = player.is_playing();
    if locks.cutscene != playing {
        locks.cutscene = playing;
    }
}

/// Push stage values to the light, music channel and virtual clock.
///
/// The light is only written when the stage light itself moved, so other
/// writers of `GlobalLight` keep their value while a sequence runs.
fn apply_stage(
    mut stage: ResMut<Stage>,
    mut light: ResMut<GlobalLight>,
    mut music_volume: ResMut<MusicVolume>,
    mut music: EventWriter<PlayMusic>,
    mut sounds: EventWriter<PlaySound>,
    mut time: ResMut<Time<Virtual>>,
    mut last_track: Local<Option<String>>,
    mut last_light: Local<Option<(f32, Color)>>,
) {
    if !stage.is_changed() {
        return;
    }

    if !stage.sounds.is_empty() {
        let cues = std::mem::take(&mut stage.bypass_change_detection().sounds);
        sounds.send_batch(cues.into_iter().map(|cue| PlaySound::new(cue.path).with_volume(cue.volume)));
    }

    let stage_light = (stage.light_intensity, stage.light_color);
    if *last_light != Some(stage_light) {
        *last_light = Some(stage_light);
        if light.intensity != stage_light.0 || light.color != stage_light.1 {
            light.intensity = stage_light.0;
            light.color = stage_light.1;
        }
    }
    if music_volume.0 != stage.music_volume {
        music_volume.0 = stage.music_volume;
    }
    if stage.music_track.is_some() && *last_track != stage.music_track {
        *last_track = stage.music_track.clone();
        music.send(PlayMusic { path: stage.music_track.clone() });
    }
    if time.relative_speed() != stage.time_scale {
        time.set_relative_speed(stage.time_scale);
    }
}

fn update_overlay(stage: Res<Stage>, mut overlay: Query<&mut BackgroundColor, With<CinematicOverlay>>) {
    if !stage.is_changed() {
        return;
    }
    for mut background in &mut overlay {
        background.0 = stage.overlay_color.with_alpha(stage.overlay_alpha.clamp(0.0, 1.0));
    }
}

fn reset_stage(mut player: ResMut<SequencePlayer>, mut stage: ResMut<Stage>) {
    player.stop(&mut stage);
    let defaults = player.defaults().clone();
    stage.restore(&defaults);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cinematics::{CinematicEffect, EffectKind};
    use crate::core::{CorePlugin, PlayState};
    use crate::persistence::Prefs;
    use crate::quests::QuestRecord;
    use bevy::state::app::StatesPlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(GameConfig::default())
            .insert_resource(Prefs::memory())
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(QuestLedger::new([QuestRecord::new("phone", "Phone")]))
            .add_plugins((CorePlugin, CinematicsPlugin));
        app.world_mut().resource_mut::<SequenceLibrary>().sequences = vec![
            CinematicSequence::new(
                "storm",
                vec![
                    CinematicEffect::new(EffectKind::TimeScale { scale: 0.5 }, 0.0),
                    CinematicEffect::new(EffectKind::Wait, 60.0),
                ],
            ),
            CinematicSequence {
                gates: crate::quests::QuestGates {
                    required_completed: vec!["phone".to_string()],
                    ..Default::default()
                },
                ..CinematicSequence::new("locked", vec![CinematicEffect::new(EffectKind::Wait, 1.0)])
            },
        ];
        app.update();
        app.world_mut().resource_mut::<NextState<GameState>>().set(GameState::InGame);
        app.update();
        app
    }

    #[test]
    fn test_play_command_takes_control() {
        let mut app = test_app();
        app.world_mut().send_event(GameCommand::PlaySequence("storm".to_string()));
        app.update();
        app.update();

        assert_eq!(app.world().resource::<SequencePlayer>().current_name(), Some("storm"));
        assert_eq!(*app.world().resource::<State<PlayState>>().get(), PlayState::Cutscene);
        assert_eq!(app.world().resource::<Time<Virtual>>().relative_speed(), 0.5);
    }

    #[test]
    fn test_gated_sequence_does_not_play() {
        let mut app = test_app();
        app.world_mut().send_event(GameCommand::PlaySequence("locked".to_string()));
        app.update();
        assert!(!app.world().resource::<SequencePlayer>().is_playing());
    }

    #[test]
    fn test_stop_restores_time_scale() {
        let mut app = test_app();
        app.world_mut().send_event(GameCommand::PlaySequence("storm".to_string()));
        app.update();
        app.world_mut().send_event(GameCommand::StopSequence);
        app.update();
        app.update();

        assert!(!app.world().resource::<SequencePlayer>().is_playing());
        assert_eq!(app.world().resource::<Time<Virtual>>().relative_speed(), 1.0);
        assert_eq!(*app.world().resource::<State<PlayState>>().get(), PlayState::Exploring);
    }

    #[test]
    fn test_skip_key_skips() {
        let mut app = test_app();
        app.world_mut().send_event(GameCommand::PlaySequence("storm".to_string()));
        app.update();
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(SKIP_KEY);
        app.update();
        assert!(!app.world().resource::<SequencePlayer>().is_playing());
    }
}
