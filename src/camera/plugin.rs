//! Camera plugin - the main 2D camera, room switching and cinematic offsets.

use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::PrimaryWindow;
use rand::thread_rng;

use super::rig::{CameraRig, CameraShake};
use super::switcher::{CameraZone, RoomCamera, RoomCameraSwitcher, SwitchOutcome};
use crate::cinematics::Stage;
use crate::core::{GameCommand, GameConfig, GameState, ZoneEntered};
use crate::player::Player;
use crate::transition::SwapScene;

const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// Marker for the one camera that renders the world.
#[derive(Component)]
pub struct MainCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        let debounce = app
            .world()
            .get_resource::<GameConfig>()
            .map_or(0.15, |c| c.camera_switch_debounce);

        app.insert_resource(RoomCameraSwitcher::new(debounce))
            .add_event::<SwapScene>()
            .add_systems(Startup, spawn_main_camera)
            .add_systems(
                Update,
                (camera_zone_events, snap_on_teleport).run_if(in_state(GameState::InGame)),
            )
            .add_systems(PostUpdate, follow_camera)
            .add_systems(OnEnter(GameState::MainMenu), reset_switcher);
    }
}

fn spawn_main_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MainCamera,
        CameraRig::default(),
        CameraShake::default(),
        Name::new("Main Camera"),
    ));
}

fn camera_zone_events(
    mut entered: EventReader<ZoneEntered>,
    zones: Query<&CameraZone>,
    rooms: Query<&RoomCamera>,
    time: Res<Time<Real>>,
    mut switcher: ResMut<RoomCameraSwitcher>,
) {
    for event in entered.read() {
        let Ok(zone) = zones.get(event.zone) else {
            continue;
        };
        let exists = rooms.iter().any(|r| r.room == zone.room);
        if switcher.request(&zone.room, time.elapsed_secs(), exists) == SwitchOutcome::Switched {
            info!("Room camera: {}", zone.room);
        }
    }
}

fn snap_on_teleport(
    mut game_commands: EventReader<GameCommand>,
    mut swaps: EventReader<SwapScene>,
    mut switcher: ResMut<RoomCameraSwitcher>,
    mut rigs: Query<&mut CameraRig, With<MainCamera>>,
) {
    let teleported = game_commands
        .read()
        .filter(|c| matches!(c, GameCommand::Teleport(..)))
        .count()
        > 0;
    // The old scene's rooms are gone after a swap
    let swapped = swaps.read().count() > 0;
    if swapped {
        switcher.reset();
    }
    if teleported || swapped {
        for mut rig in &mut rigs {
            rig.snap = true;
        }
    }
}

#[allow(clippy::type_complexity)]
fn follow_camera(
    time: Res<Time>,
    config: Res<GameConfig>,
    switcher: Res<RoomCameraSwitcher>,
    stage: Option<Res<Stage>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    rooms: Query<(&RoomCamera, &Transform), Without<MainCamera>>,
    players: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut cameras: Query<
        (&mut Transform, &mut CameraRig, &mut CameraShake, Option<&mut OrthographicProjection>),
        With<MainCamera>,
    >,
) {
    let aspect = windows
        .get_single()
        .ok()
        .filter(|w| w.height() > 0.0)
        .map_or(DEFAULT_ASPECT, |w| w.width() / w.height());

    let room = switcher
        .active
        .as_deref()
        .and_then(|active| rooms.iter().find(|(r, _)| r.room == active));
    let dt = time.delta_secs();

    for (mut transform, mut rig, mut shake, projection) in &mut cameras {
        match room {
            Some((room, anchor)) => {
                let size = room.fit_size(aspect);
                rig.follow(anchor.translation.truncate(), size, config.camera_follow_speed, dt);
            }
            None => {
                if let Ok(player) = players.get_single() {
                    let size = rig.size;
                    rig.follow(player.translation.truncate(), size, config.camera_follow_speed, dt);
                }
            }
        }

        let (offset, zoom, amplitude, frequency) = stage.as_ref().map_or((Vec2::ZERO, 1.0, 0.0, 0.0), |s| {
            (s.camera_offset, s.camera_zoom, s.shake_amplitude, s.shake_frequency)
        });
        let jitter = shake.update(amplitude, frequency, dt, &mut thread_rng());

        let position = rig.center + offset + jitter;
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        if let Some(mut projection) = projection {
            let viewport_height = 2.0 * rig.size / zoom.max(0.01);
            let unchanged = matches!(
                projection.scaling_mode,
                ScalingMode::FixedVertical { viewport_height: current } if current == viewport_height
            );
            if !unchanged {
                projection.scaling_mode = ScalingMode::FixedVertical { viewport_height };
            }
        }
    }
}

fn reset_switcher(mut switcher: ResMut<RoomCameraSwitcher>) {
    switcher.reset();
}
