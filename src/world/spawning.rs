//! Entity spawning functions for scene construction.

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::data::{Placement, PlayerDef, SceneDefinition};
use super::zones::Zone;
use crate::camera::{CameraZone, RoomCamera};
use crate::core::GameConfig;
use crate::dialogue::{DialogueLibrary, DialogueSpeaker};
use crate::interaction::Telescope;
use crate::player::{spawn_player, DirectionSprites, PlayerShadow, YSort};
use crate::transition::{DoorTrigger, Teleporter};
use crate::vision::{CollapseEnd, CollapseTrigger, PlayerVision, SeeThroughWall};

/// Marker for every entity owned by the loaded scene.
#[derive(Component)]
pub struct SceneEntity;

/// What spawning needs from the world.
pub struct SpawnContext<'a> {
    pub assets: Option<&'a AssetServer>,
    pub library: &'a DialogueLibrary,
    pub config: &'a GameConfig,
}

impl SpawnContext<'_> {
    /// Headless apps have no asset server and get placeholder handles.
    pub fn image(&self, path: &str) -> Handle<Image> {
        self.assets.map(|a| a.load(path.to_string())).unwrap_or_default()
    }

    /// Loads `{front,back,left,right}_{0,1,2}.png` from `dir`.
    fn direction_sprites(&self, dir: &str) -> DirectionSprites {
        let set = |facing: &str| [0, 1, 2].map(|i| self.image(&format!("{}/{}_{}.png", dir, facing, i)));
        DirectionSprites {
            front: set("front"),
            back: set("back"),
            left: set("left"),
            right: set("right"),
        }
    }
}

fn spawn_placed<'a>(commands: &'a mut Commands, at: &Placement, ctx: &SpawnContext) -> EntityCommands<'a> {
    let visibility = if at.hidden { Visibility::Hidden } else { Visibility::Inherited };
    let mut entity = commands.spawn((
        Transform::from_translation(at.center().extend(0.0)),
        visibility,
        SceneEntity,
    ));
    if let Some(name) = &at.name {
        entity.insert(Name::new(name.clone()));
    }
    if let Some(path) = &at.sprite {
        entity.insert((Sprite::from_image(ctx.image(path)), YSort::default()));
    }
    entity
}

/// Spawn a sensor zone. Hidden zones stay inactive until shown.
fn spawn_zone<'a>(commands: &'a mut Commands, at: &Placement, ctx: &SpawnContext) -> EntityCommands<'a> {
    let half = at.half_extents();
    let mut entity = spawn_placed(commands, at, ctx);
    entity.insert((Collider::cuboid(half.x, half.y), Sensor));
    if at.hidden {
        entity.insert(ColliderDisabled);
    } else {
        entity.insert(Zone);
    }
    entity
}

fn spawn_solid<'a>(commands: &'a mut Commands, at: &Placement, ctx: &SpawnContext) -> EntityCommands<'a> {
    let half = at.half_extents();
    let mut entity = spawn_placed(commands, at, ctx);
    entity.insert((RigidBody::Fixed, Collider::cuboid(half.x, half.y)));
    if at.hidden {
        entity.insert(ColliderDisabled);
    }
    entity
}

fn spawn_shadows(commands: &mut Commands, player: Entity, def: &PlayerDef, ctx: &SpawnContext) {
    if let Some(dir) = &def.shadow {
        let sprites = ctx.direction_sprites(dir);
        let image = sprites.front[0].clone();
        commands.entity(player).with_children(|parent| {
            parent.spawn((
                Sprite::from_image(image),
                // Just behind the player
                Transform::from_xyz(def.shadow_offset.0, def.shadow_offset.1, -0.01),
                PlayerShadow { sprites },
                Name::new("Player Shadow"),
            ));
        });
    }
    if let Some(wall) = &def.wall_shadow {
        commands.spawn((
            Sprite {
                color: Color::srgba(0.0, 0.0, 0.0, 0.45),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 5.0),
            Visibility::default(),
            wall.clone(),
            SceneEntity,
            Name::new("Wall Shadow"),
        ));
    }
}

/// Spawn every entity in a scene. Returns the player.
pub fn spawn_scene(commands: &mut Commands, scene: &SceneDefinition, ctx: &SpawnContext) -> Entity {
    for room in &scene.rooms {
        commands.spawn((
            RoomCamera {
                room: room.name.clone(),
                width: room.size.0,
                height: room.size.1,
            },
            Transform::from_xyz(room.position.0, room.position.1, 0.0),
            SceneEntity,
            Name::new(format!("Room {}", room.name)),
        ));
    }

    for def in &scene.camera_zones {
        spawn_zone(commands, &def.at, ctx).insert(CameraZone { room: def.room.clone() });
    }

    for def in &scene.speakers {
        let sets = match ctx.library.get(&def.speaker) {
            Some(sets) => sets.to_vec(),
            None => {
                warn!("Speaker '{}' has no dialogue file", def.speaker);
                Vec::new()
            }
        };
        let mut speaker = DialogueSpeaker::new(def.speaker.clone(), sets);
        speaker.remember_last = def.remember_last.unwrap_or(ctx.config.remember_last_dialogue);
        spawn_zone(commands, &def.at, ctx).insert(speaker);
    }

    for def in &scene.pickups {
        spawn_zone(commands, &def.at, ctx).insert(def.pickup.clone());
    }

    for def in &scene.repairs {
        spawn_zone(commands, &def.at, ctx).insert(def.repair.clone());
    }

    for def in &scene.interactors {
        spawn_zone(commands, &def.at, ctx).insert(def.interactor.clone());
    }

    for def in &scene.telescopes {
        let overlay = def.overlay_name();
        let telescope = Telescope {
            overlay: overlay.clone(),
            ..def.telescope.clone()
        };
        spawn_zone(commands, &def.at, ctx).insert(telescope);

        let mut scope = commands.spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            // Over the light, under the cinematic overlay
            GlobalZIndex(45),
            Visibility::Hidden,
            SceneEntity,
            Name::new(overlay),
        ));
        match &def.telescope.scope_image {
            Some(path) => scope.insert(ImageNode::new(ctx.image(path))),
            None => scope.insert(BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6))),
        };
    }

    for def in &scene.doors {
        spawn_zone(commands, &def.at, ctx).insert(DoorTrigger { scene: def.scene.clone() });
    }

    for def in &scene.teleporters {
        spawn_zone(commands, &def.at, ctx).insert(Teleporter { destination: def.destination });
    }

    for def in &scene.props {
        let mut entity = if def.solid {
            spawn_solid(commands, &def.at, ctx)
        } else {
            spawn_placed(commands, &def.at, ctx)
        };
        if !def.y_sort {
            entity.remove::<YSort>();
        }
    }

    for def in &scene.walls {
        spawn_zone(commands, &def.at, ctx)
            .insert(SeeThroughWall {
                faded_alpha: def.faded_alpha,
                fade_time: def.fade_time,
                inside: false,
            })
            .remove::<YSort>()
            // Above everything the wall covers
            .insert(Transform::from_translation(def.at.center().extend(10.0)));
    }

    for at in &scene.colliders {
        spawn_solid(commands, at, ctx);
    }

    if let Some(collapse) = &scene.collapse {
        spawn_zone(commands, &collapse.trigger, ctx).insert(CollapseTrigger);
        spawn_zone(commands, &collapse.end, ctx).insert(CollapseEnd);
    }

    let radius = scene.player.vision_radius.unwrap_or(ctx.config.vision_radius);
    let mask = scene.player.vision_mask.as_deref().map(|path| ctx.image(path));
    let player = spawn_player(
        commands,
        scene.spawn_point(),
        ctx.direction_sprites(&scene.player.sprites),
        PlayerVision::new(radius),
        mask,
    );
    commands.entity(player).insert(SceneEntity);
    spawn_shadows(commands, player, &scene.player, ctx);

    info!("Spawned scene '{}'", scene.name);
    player
}
