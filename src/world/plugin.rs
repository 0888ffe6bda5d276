//! World plugin - scene loading, swapping, zones and named props.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::data::{load_scene_registry, CurrentScene, SceneRegistry};
use super::error::SceneError;
use super::spawning::{spawn_scene, SceneEntity, SpawnContext};
use super::zones::{emit_zone_events, Zone};
use crate::audio::{PlayAmbience, PlayMusic};
use crate::cinematics::{SequenceLibrary, SequencePlayer, Stage};
use crate::core::{GameCommand, GameConfig, GameState};
use crate::dialogue::{DialogueLibrary, SpeakerInRange};
use crate::interaction::InteractorInRange;
use crate::inventory::RepairInRange;
use crate::transition::SwapScene;
use crate::vision::{CollapseRun, GlobalLight};

/// World plugin - handles scene loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SceneRegistry>() {
            app.add_systems(Startup, load_scene_registry);
        }
        let start = app
            .world()
            .get_resource::<GameConfig>()
            .map_or_else(|| GameConfig::default().start_scene, |c| c.start_scene.clone());

        app.insert_resource(CurrentScene::new(start))
            .init_resource::<DialogueLibrary>()
            .init_resource::<SequenceLibrary>()
            .init_resource::<Stage>()
            .init_resource::<SequencePlayer>()
            .init_resource::<GlobalLight>()
            .add_event::<CollisionEvent>()
            .add_event::<SwapScene>()
            .add_event::<PlayMusic>()
            .add_event::<PlayAmbience>()
            .add_systems(OnEnter(GameState::InGame), enter_scene)
            .add_systems(PreUpdate, emit_zone_events.run_if(in_state(GameState::InGame)))
            .add_systems(
                Update,
                (swap_scene, toggle_named).chain().run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnEnter(GameState::MainMenu), leave_scene)
            .add_systems(OnEnter(GameState::Ending), leave_scene);
    }
}

/// Everything needed to tear down and build a scene.
#[derive(SystemParam)]
struct SceneLoader<'w, 's> {
    commands: Commands<'w, 's>,
    registry: Res<'w, SceneRegistry>,
    library: Res<'w, DialogueLibrary>,
    config: Res<'w, GameConfig>,
    assets: Option<Res<'w, AssetServer>>,
    current: ResMut<'w, CurrentScene>,
    sequences: ResMut<'w, SequenceLibrary>,
    stage: ResMut<'w, Stage>,
    player: ResMut<'w, SequencePlayer>,
    light: ResMut<'w, GlobalLight>,
    music: EventWriter<'w, PlayMusic>,
    ambience: EventWriter<'w, PlayAmbience>,
    loaded: Query<'w, 's, Entity, With<SceneEntity>>,
}

impl SceneLoader<'_, '_> {
    fn unload(&mut self) {
        for entity in &self.loaded {
            self.commands.entity(entity).despawn_recursive();
        }
        self.commands.remove_resource::<CollapseRun>();
        if !self.sequences.sequences.is_empty() {
            self.sequences.sequences.clear();
        }
        self.current.spawned = false;
    }

    fn load(&mut self, name: &str) -> Result<(), SceneError> {
        let scene = self.registry.get(name)?;
        let ctx = SpawnContext {
            assets: self.assets.as_deref(),
            library: &self.library,
            config: &self.config,
        };
        spawn_scene(&mut self.commands, scene, &ctx);

        self.light.intensity = scene.light.unwrap_or(1.0);
        // Sequences fade from and restore to the scene's own light
        let (intensity, color) = (self.light.intensity, self.light.color);
        self.player.set_light_defaults(intensity, color);
        self.stage.light_intensity = intensity;
        self.stage.light_color = color;
        self.sequences.sequences = scene.sequences.clone();
        if let Some(collapse) = &scene.collapse {
            let radius = scene.player.vision_radius.unwrap_or(self.config.vision_radius);
            self.commands
                .insert_resource(CollapseRun::new(collapse.run.clone(), self.light.intensity, radius));
        }
        if scene.music.is_some() {
            self.music.send(PlayMusic { path: scene.music.clone() });
        }
        if scene.ambience.is_some() {
            self.ambience.send(PlayAmbience { path: scene.ambience.clone() });
        }

        self.current.name = name.to_string();
        self.current.spawned = true;
        Ok(())
    }
}

/// Pausing leaves and re-enters `InGame`, so only spawn when nothing is loaded.
fn enter_scene(mut loader: SceneLoader) {
    if loader.current.spawned {
        return;
    }
    let name = loader.current.name.clone();
    if let Err(e) = loader.load(&name) {
        error!("{}", e);
    }
}

fn swap_scene(mut swaps: EventReader<SwapScene>, mut loader: SceneLoader) {
    let Some(swap) = swaps.read().last().cloned() else {
        return;
    };
    // An unknown target keeps the current scene
    if let Err(e) = loader.registry.get(&swap.scene) {
        error!("{}", e);
        return;
    }
    loader.unload();
    if let Err(e) = loader.load(&swap.scene) {
        error!("{}", e);
    }
}

fn leave_scene(mut loader: SceneLoader) {
    loader.unload();
    let start = loader.config.start_scene.clone();
    loader.current.name = start;
}

/// `Show` / `Hide` hooks target scene entities by name.
#[allow(clippy::type_complexity)]
fn toggle_named(
    mut commands: Commands,
    mut events: EventReader<GameCommand>,
    mut named: Query<(Entity, &Name, &mut Visibility, Has<Collider>, Has<Sensor>), With<SceneEntity>>,
) {
    for event in events.read() {
        let (target, show) = match event {
            GameCommand::Show(name) => (name, true),
            GameCommand::Hide(name) => (name, false),
            _ => continue,
        };
        let mut found = false;
        for (entity, name, mut visibility, has_collider, is_sensor) in &mut named {
            if name.as_str() != target {
                continue;
            }
            found = true;
            let mut entity = commands.entity(entity);
            if show {
                *visibility = Visibility::Inherited;
                if has_collider {
                    entity.remove::<ColliderDisabled>();
                }
                if is_sensor {
                    entity.insert(Zone);
                }
            } else {
                *visibility = Visibility::Hidden;
                if has_collider {
                    entity.insert(ColliderDisabled);
                }
                entity.remove::<(Zone, SpeakerInRange, InteractorInRange, RepairInRange)>();
            }
        }
        if !found {
            warn!("No scene entity named '{}'", target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cinematics::CinematicsPlugin;
    use crate::core::{CorePlugin, ZoneEntered};
    use crate::interaction::Telescope;
    use crate::player::{Player, PlayerShadow, WallShadow};
    use crate::quests::QuestLedger;
    use crate::transition::DoorTrigger;
    use crate::world::SceneDefinition;
    use bevy::state::app::StatesPlugin;
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

    const HALL: &str = r#"(
        name: "hall",
        spawn: (0.0, -40.0),
        player: (shadow: Some("sprites/player_shadow"), wall_shadow: Some((max_distance: 32.0))),
        light: Some(0.5),
        doors: [(at: (name: Some("basement_door"), position: (0.0, 90.0), hidden: true), scene: "basement")],
        props: [(at: (name: Some("lamp"), position: (10.0, 10.0)), solid: true)],
        telescopes: [(at: (name: Some("window"), position: (60.0, 0.0)), telescope: ())],
    )"#;

    const BASEMENT: &str = r#"(
        name: "basement",
        spawn: (100.0, 0.0),
        collapse: Some((
            trigger: (position: (0.0, 0.0)),
            end: (position: (200.0, 0.0)),
            run: (checkpoint: (100.0, 0.0)),
        )),
    )"#;

    const CELLAR: &str = r#"(
        name: "cellar",
        spawn: (0.0, 0.0),
        light: Some(0.15),
        sequences: [
            (name: "hold", play_on_start: true, effects: [(kind: Wait, duration: 60.0)]),
        ],
    )"#;

    fn registry(sources: &[&str]) -> SceneRegistry {
        let mut registry = SceneRegistry::default();
        for source in sources {
            let scene: SceneDefinition = ron::from_str(source).unwrap();
            registry.insert(scene).unwrap();
        }
        registry
    }

    fn enter_game(app: &mut App) {
        app.update();
        app.world_mut().resource_mut::<NextState<GameState>>().set(GameState::InGame);
        app.update();
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(GameConfig::default())
            .insert_resource(registry(&[HALL, BASEMENT]))
            .init_resource::<ButtonInput<KeyCode>>()
            .add_plugins((CorePlugin, WorldPlugin));
        enter_game(&mut app);
        app
    }

    fn cinematic_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(GameConfig::default())
            .insert_resource(registry(&[HALL, CELLAR]))
            .insert_resource(QuestLedger::default())
            .init_resource::<ButtonInput<KeyCode>>()
            .add_plugins((CorePlugin, CinematicsPlugin, WorldPlugin));
        enter_game(&mut app);
        app
    }


    fn player(app: &mut App) -> (Entity, Vec2) {
        let mut query = app.world_mut().query_filtered::<(Entity, &Transform), With<Player>>();
        let (entity, transform) = query.single(app.world());
        (entity, transform.translation.truncate())
    }

    fn named(app: &mut App, target: &str) -> Entity {
        let mut query = app.world_mut().query::<(Entity, &Name)>();
        query
            .iter(app.world())
            .find(|(_, name)| name.as_str() == target)
            .map(|(entity, _)| entity)
            .unwrap()
    }

    #[test]
    fn test_entering_game_spawns_start_scene() {
        let mut app = test_app();
        assert_eq!(player(&mut app).1, Vec2::new(0.0, -40.0));
        assert_eq!(app.world().resource::<GlobalLight>().intensity, 0.5);
        assert!(app.world().resource::<CurrentScene>().spawned);

        let door = named(&mut app, "basement_door");
        assert_eq!(app.world().get::<Visibility>(door), Some(&Visibility::Hidden));
        assert!(app.world().get::<Zone>(door).is_none());
        assert!(app.world().get::<DoorTrigger>(door).is_some());

        let mut shadows = app.world_mut().query_filtered::<&Parent, With<PlayerShadow>>();
        let (player, _) = player(&mut app);
        assert_eq!(shadows.single(app.world()).get(), player);
        let mut walls = app.world_mut().query::<&WallShadow>();
        assert_eq!(walls.single(app.world()).max_distance, 32.0);
    }

    #[test]
    fn test_telescope_spawns_with_hidden_overlay() {
        let mut app = test_app();
        let window = named(&mut app, "window");
        let telescope = app.world().get::<Telescope>(window).cloned().unwrap();
        assert_eq!(telescope.overlay, "window_scope");

        let scope = named(&mut app, "window_scope");
        assert_eq!(app.world().get::<Visibility>(scope), Some(&Visibility::Hidden));
        assert!(app.world().get::<Node>(scope).is_some());
        assert!(app.world().get::<SceneEntity>(scope).is_some());
    }

    #[test]
    fn test_show_and_hide_by_name() {
        let mut app = test_app();
        app.world_mut().send_event(GameCommand::Show("basement_door".to_string()));
        app.update();

        let door = named(&mut app, "basement_door");
        assert_eq!(app.world().get::<Visibility>(door), Some(&Visibility::Inherited));
        assert!(app.world().get::<Zone>(door).is_some());
        assert!(app.world().get::<ColliderDisabled>(door).is_none());

        app.world_mut().send_event(GameCommand::Hide("lamp".to_string()));
        app.update();
        let lamp = named(&mut app, "lamp");
        assert_eq!(app.world().get::<Visibility>(lamp), Some(&Visibility::Hidden));
        assert!(app.world().get::<ColliderDisabled>(lamp).is_some());
    }

    #[test]
    fn test_swap_replaces_scene() {
        let mut app = test_app();
        let (old_player, _) = player(&mut app);
        app.world_mut().send_event(SwapScene { scene: "basement".to_string() });
        app.update();

        assert!(app.world().get_entity(old_player).is_err());
        assert_eq!(player(&mut app).1, Vec2::new(100.0, 0.0));
        assert_eq!(app.world().resource::<CurrentScene>().name, "basement");
        assert!(app.world().get_resource::<CollapseRun>().is_some());
        assert_eq!(app.world().resource::<GlobalLight>().intensity, 1.0);
    }

    #[test]
    fn test_sequences_keep_the_scene_light() {
        let mut app = cinematic_app();
        app.world_mut().send_event(SwapScene { scene: "cellar".to_string() });
        app.update();
        app.update();
        app.update();

        assert_eq!(app.world().resource::<SequencePlayer>().current_name(), Some("hold"));
        assert_eq!(app.world().resource::<SequencePlayer>().defaults().light_intensity, 0.15);
        assert_eq!(app.world().resource::<GlobalLight>().intensity, 0.15);

        app.world_mut().send_event(GameCommand::StopSequence);
        app.update();
        app.update();
        assert!(!app.world().resource::<SequencePlayer>().is_playing());
        assert_eq!(app.world().resource::<GlobalLight>().intensity, 0.15);
    }

    #[test]
    fn test_swap_to_unknown_scene_keeps_current() {
        let mut app = test_app();
        let (before, _) = player(&mut app);
        app.world_mut().send_event(SwapScene { scene: "attic".to_string() });
        app.update();
        assert_eq!(player(&mut app).0, before);
        assert_eq!(app.world().resource::<CurrentScene>().name, "hall");
    }

    #[test]
    fn test_leaving_to_menu_unloads() {
        let mut app = test_app();
        app.world_mut().resource_mut::<NextState<GameState>>().set(GameState::MainMenu);
        app.update();

        let mut query = app.world_mut().query_filtered::<Entity, With<SceneEntity>>();
        assert_eq!(query.iter(app.world()).count(), 0);
        assert!(!app.world().resource::<CurrentScene>().spawned);
    }

    #[test]
    fn test_sensor_collision_becomes_zone_event() {
        let mut app = test_app();
        let (player, _) = player(&mut app);
        let zone = app.world_mut().spawn(Zone).id();
        let rock = app.world_mut().spawn_empty().id();
        app.world_mut()
            .send_event(CollisionEvent::Started(player, zone, CollisionEventFlags::SENSOR));
        app.world_mut()
            .send_event(CollisionEvent::Started(player, rock, CollisionEventFlags::empty()));
        app.update();

        let events = app.world().resource::<Events<ZoneEntered>>();
        let entered: Vec<(Entity, Entity)> = events.get_cursor().read(events).map(|e| (e.zone, e.player)).collect();
        assert_eq!(entered, vec![(zone, player)]);
    }
}
