//! Transition plugin - scene fades, doors, teleporters and the closing titles.

use bevy::prelude::*;
use serde::Deserialize;

use super::credits::{Credits, CreditsDate, CreditsRoot, CreditsStage, CreditsTitle};
use super::fade::SceneTransition;
use crate::audio::PlaySound;
use crate::core::{ControlLocks, GameCommand, GameConfig, GameState, ZoneEntered};
use crate::player::Player;

/// Zone that fades to another scene.
#[derive(Component, Debug, Clone, Deserialize)]
pub struct DoorTrigger {
    pub scene: String,
}

/// Zone that moves the player instantly.
#[derive(Component, Debug, Clone, Deserialize)]
pub struct Teleporter {
    pub destination: (f32, f32),
}

/// Sent on the black frame of a transition. The world swaps scenes on it.
#[derive(Event, Debug, Clone)]
pub struct SwapScene {
    pub scene: String,
}

#[derive(Component)]
pub struct FadeOverlay;

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        let fade = app
            .world()
            .get_resource::<GameConfig>()
            .map_or(0.6, |c| c.fade_duration);

        app.insert_resource(SceneTransition::new(fade))
            .add_event::<SwapScene>()
            .add_event::<PlaySound>()
            .add_systems(Startup, spawn_fade_overlay)
            .add_systems(
                Update,
                (
                    handle_transition_commands,
                    door_zone_events,
                    teleporter_zone_events,
                    tick_transition,
                    sync_transition_lock,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnEnter(GameState::MainMenu), reset_transition)
            .add_systems(OnEnter(GameState::Ending), (reset_transition, spawn_credits))
            .add_systems(Update, tick_credits.run_if(in_state(GameState::Ending)))
            .add_systems(OnExit(GameState::Ending), despawn_credits);
    }
}

fn spawn_fade_overlay(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::BLACK.with_alpha(0.0)),
        GlobalZIndex(60),
        FadeOverlay,
        Name::new("Fade Overlay"),
    ));
}

fn request_transition(transition: &mut SceneTransition, scene: &str, config: &GameConfig, sounds: &mut EventWriter<PlaySound>) {
    if transition.request(scene) {
        if let Some(sound) = &config.transition_sound {
            sounds.send(PlaySound::new(sound.clone()));
        }
    }
}

fn move_player(players: &mut Query<&mut Transform, With<Player>>, target: Vec2) {
    for mut transform in players.iter_mut() {
        transform.translation.x = target.x;
        transform.translation.y = target.y;
    }
}

fn handle_transition_commands(
    mut events: EventReader<GameCommand>,
    config: Res<GameConfig>,
    mut transition: ResMut<SceneTransition>,
    mut players: Query<&mut Transform, With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut sounds: EventWriter<PlaySound>,
) {
    for event in events.read() {
        match event {
            GameCommand::ChangeScene(scene) => request_transition(&mut transition, scene, &config, &mut sounds),
            GameCommand::Teleport(x, y) => move_player(&mut players, Vec2::new(*x, *y)),
            GameCommand::EndGame => {
                info!("Rolling the closing titles");
                next_state.set(GameState::Ending);
            }
            _ => {}
        }
    }
}

fn door_zone_events(
    mut entered: EventReader<ZoneEntered>,
    doors: Query<&DoorTrigger>,
    config: Res<GameConfig>,
    mut transition: ResMut<SceneTransition>,
    mut sounds: EventWriter<PlaySound>,
) {
    for event in entered.read() {
        if let Ok(door) = doors.get(event.zone) {
            request_transition(&mut transition, &door.scene, &config, &mut sounds);
        }
    }
}

fn teleporter_zone_events(
    mut entered: EventReader<ZoneEntered>,
    teleporters: Query<&Teleporter>,
    mut players: Query<&mut Transform, With<Player>>,
) {
    for event in entered.read() {
        let Ok(teleporter) = teleporters.get(event.zone) else {
            continue;
        };
        let (x, y) = teleporter.destination;
        if let Ok(mut transform) = players.get_mut(event.player) {
            transform.translation.x = x;
            transform.translation.y = y;
        }
    }
}

/// Fades run on real time so cutscene time scaling or a pause cannot stall them.
fn tick_transition(
    time: Res<Time<Real>>,
    mut transition: ResMut<SceneTransition>,
    mut overlay: Query<&mut BackgroundColor, With<FadeOverlay>>,
    mut swaps: EventWriter<SwapScene>,
) {
    if !transition.is_active() {
        return;
    }
    let step = transition.tick(time.delta_secs());
    for mut background in &mut overlay {
        background.0 = Color::BLACK.with_alpha(step.alpha);
    }
    if let Some(scene) = step.swap {
        swaps.send(SwapScene { scene });
    }
    if step.finished {
        debug!("Transition finished");
    }
}

fn sync_transition_lock(transition: Res<SceneTransition>, mut locks: ResMut<ControlLocks>) {
    let active = transition.is_active();
    if locks.transition != active {
        locks.transition = active;
    }
}

fn reset_transition(
    mut transition: ResMut<SceneTransition>,
    mut locks: ResMut<ControlLocks>,
    mut overlay: Query<&mut BackgroundColor, With<FadeOverlay>>,
) {
    let fade = transition.fade_duration;
    *transition = SceneTransition::new(fade);
    locks.transition = false;
    for mut background in &mut overlay {
        background.0 = Color::BLACK.with_alpha(0.0);
    }
}

fn spawn_credits(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(Credits::default());
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::BLACK),
            GlobalZIndex(70),
            CreditsRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(config.ending_title.clone()),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Visibility::Hidden,
                CreditsTitle,
            ));
            parent.spawn((
                Text::new(config.ending_date.clone()),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
                Visibility::Hidden,
                CreditsDate,
            ));
        });
}

#[allow(clippy::type_complexity)]
fn tick_credits(
    time: Res<Time<Real>>,
    config: Res<GameConfig>,
    credits: Option<ResMut<Credits>>,
    mut titles: Query<&mut Visibility, (With<CreditsTitle>, Without<CreditsDate>)>,
    mut dates: Query<&mut Visibility, (With<CreditsDate>, Without<CreditsTitle>)>,
    mut sounds: EventWriter<PlaySound>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut credits) = credits else {
        return;
    };
    let Some(stage) = credits.tick(time.delta_secs()) else {
        return;
    };
    let sound = match stage {
        CreditsStage::Black => config.ending_black_sound.as_ref(),
        CreditsStage::Title => {
            for mut visibility in &mut titles {
                *visibility = Visibility::Inherited;
            }
            config.ending_title_sound.as_ref()
        }
        CreditsStage::Date => {
            for mut visibility in &mut dates {
                *visibility = Visibility::Inherited;
            }
            config.ending_date_sound.as_ref()
        }
        CreditsStage::Done => {
            next_state.set(GameState::MainMenu);
            None
        }
    };
    if let Some(sound) = sound {
        sounds.send(PlaySound::new(sound.clone()));
    }
}

fn despawn_credits(mut commands: Commands, roots: Query<Entity, With<CreditsRoot>>) {
    for entity in &roots {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<Credits>();
}
