use bevy::prelude::*;

use crate::audio::{AmbienceVolume, PlayAmbience, PlayMusic, PlaySound};
use crate::core::{GameCommand, GameState, HookQueue, ZoneEntered};

use super::collapse::{CollapseEnd, CollapsePhase, CollapseRun, CollapseTrigger};
use super::light::{spawn_light_overlay, update_light_overlay, GlobalLight};
use super::player_vision::{update_player_vision, PlayerVision};
use super::wall::{fade_walls, track_wall_occupancy};

pub struct VisionPlugin;

impl Plugin for VisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GlobalLight>()
            .init_resource::<AmbienceVolume>()
            .add_event::<PlaySound>()
            .add_event::<PlayMusic>()
            .add_event::<PlayAmbience>()
            .add_systems(Startup, spawn_light_overlay)
            .add_systems(
                Update,
                (
                    (collapse_zone_events, tick_collapse).chain(),
                    update_player_vision,
                    (track_wall_occupancy, fade_walls).chain(),
                )
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(Last, update_light_overlay)
            .add_systems(OnEnter(GameState::MainMenu), reset_light);
    }
}

fn collapse_zone_events(
    mut entered: EventReader<ZoneEntered>,
    triggers: Query<(), With<CollapseTrigger>>,
    ends: Query<(), With<CollapseEnd>>,
    visions: Query<&PlayerVision>,
    light: Res<GlobalLight>,
    run: Option<ResMut<CollapseRun>>,
) {
    let Some(mut run) = run else {
        entered.clear();
        return;
    };
    for event in entered.read() {
        if triggers.contains(event.zone) {
            if let Ok(vision) = visions.get(event.player) {
                run.initial_radius = vision.base_radius;
            }
            run.base_light = light.intensity;
            run.trigger();
        } else if ends.contains(event.zone) {
            run.finish();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn tick_collapse(
    time: Res<Time>,
    run: Option<ResMut<CollapseRun>>,
    mut light: ResMut<GlobalLight>,
    mut visions: Query<&mut PlayerVision>,
    mut breathing: ResMut<AmbienceVolume>,
    mut hooks: ResMut<HookQueue>,
    mut sounds: EventWriter<PlaySound>,
    mut music: EventWriter<PlayMusic>,
    mut ambience: EventWriter<PlayAmbience>,
) {
    let Some(mut run) = run else {
        return;
    };
    if matches!(run.phase, CollapsePhase::Idle | CollapsePhase::Finished) {
        return;
    }

    let out = run.tick(time.delta_secs());

    if let Some(intensity) = out.light {
        light.intensity = intensity;
    }
    if let Some(radius) = out.vision_radius {
        for mut vision in &mut visions {
            vision.set_radius(radius, true);
        }
    }
    if let Some(volume) = out.breathing_volume {
        breathing.0 = volume;
    }
    if let Some(path) = out.music {
        music.send(PlayMusic { path });
    }
    if let Some(path) = out.ambience {
        ambience.send(PlayAmbience { path });
    }
    sounds.send_batch(out.sounds.into_iter().map(PlaySound::new));
    if let Some(target) = out.teleport {
        hooks.push(GameCommand::Teleport(target.x, target.y));
    }
    hooks.extend(out.hooks);
}

fn reset_light(mut light: ResMut<GlobalLight>) {
    *light = GlobalLight::default();
}
