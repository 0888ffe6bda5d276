//! Inventory plugin - pickups, repairs, `GiveItem` and the item HUD.

use bevy::prelude::*;

use super::pickup::{ItemPickup, RepairInRange, RepairSpot, Repaired};
use super::registry::{load_item_registry, ItemRegistry};
use super::store::Inventory;
use crate::audio::PlaySound;
use crate::core::{
    claim_interact, interact_pressed, ControlLocks, GameCommand, GameState, HookQueue, InteractSet, ItemAdded,
    ItemRemoved, PlayState, ZoneEntered, ZoneExited,
};
use crate::world::Zone;

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Inventory>()
            .init_resource::<ItemRegistry>()
            .add_event::<PlaySound>()
            .add_systems(Startup, load_item_registry)
            .add_systems(
                Update,
                (
                    pickup_zone_events,
                    repair_zone_events,
                    repair_on_interact.in_set(InteractSet::World),
                    give_item_commands,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(PostUpdate, refresh_item_hud)
            .add_systems(OnEnter(GameState::MainMenu), clear_inventory);
    }
}

/// HUD node shown while the player holds `item`.
#[derive(Component, Debug, Clone)]
pub struct ItemHud {
    pub item: String,
}

fn add_items(inventory: &mut Inventory, added: &mut EventWriter<ItemAdded>, item: &str, amount: u32) {
    let count = inventory.add(item, amount);
    info!("Got {} x{} (now {})", item, amount, count);
    added.send(ItemAdded { item: item.to_string(), count });
}

fn pickup_zone_events(
    mut commands: Commands,
    mut entered: EventReader<ZoneEntered>,
    pickups: Query<&ItemPickup, With<Zone>>,
    mut inventory: ResMut<Inventory>,
    mut added: EventWriter<ItemAdded>,
    mut sounds: EventWriter<PlaySound>,
) {
    for event in entered.read() {
        let Ok(pickup) = pickups.get(event.zone) else {
            continue;
        };
        add_items(&mut inventory, &mut added, &pickup.item, pickup.amount);
        if let Some(sound) = &pickup.sound {
            sounds.send(PlaySound::new(sound.clone()));
        }
        commands.entity(event.zone).insert(Visibility::Hidden).remove::<Zone>();
    }
}

#[allow(clippy::too_many_arguments)]
fn repair(
    commands: &mut Commands,
    entity: Entity,
    spot: &RepairSpot,
    inventory: &mut Inventory,
    registry: &ItemRegistry,
    removed: &mut EventWriter<ItemRemoved>,
    sounds: &mut EventWriter<PlaySound>,
    hooks: &mut HookQueue,
    asset_server: Option<&AssetServer>,
) -> bool {
    if !spot.try_repair(inventory, registry) {
        debug!("Repair needs {} x{}", spot.required_item, spot.amount);
        return false;
    }
    info!("Repaired with {}", spot.required_item);
    removed.send(ItemRemoved {
        item: spot.required_item.clone(),
        count: inventory.count(&spot.required_item),
    });
    if let Some(sound) = &spot.sound {
        sounds.send(PlaySound::new(sound.clone()));
    }
    hooks.extend(spot.on_repaired.iter().cloned());

    let mut entity = commands.entity(entity);
    entity.insert(Repaired).remove::<(Zone, RepairInRange)>();
    if let (Some(path), Some(asset_server)) = (&spot.repaired_sprite, asset_server) {
        let image = asset_server.load(path.clone());
        entity.insert(Sprite::from_image(image));
    }
    true
}

#[allow(clippy::too_many_arguments)]
fn repair_zone_events(
    mut commands: Commands,
    mut entered: EventReader<ZoneEntered>,
    mut exited: EventReader<ZoneExited>,
    spots: Query<&RepairSpot, Without<Repaired>>,
    mut inventory: ResMut<Inventory>,
    registry: Res<ItemRegistry>,
    mut removed: EventWriter<ItemRemoved>,
    mut sounds: EventWriter<PlaySound>,
    mut hooks: ResMut<HookQueue>,
    asset_server: Option<Res<AssetServer>>,
) {
    for event in entered.read() {
        let Ok(spot) = spots.get(event.zone) else {
            continue;
        };
        commands.entity(event.zone).insert(RepairInRange);
        if spot.auto_use {
            repair(
                &mut commands,
                event.zone,
                spot,
                &mut inventory,
                &registry,
                &mut removed,
                &mut sounds,
                &mut hooks,
                asset_server.as_deref(),
            );
        }
    }
    for event in exited.read() {
        if spots.contains(event.zone) {
            commands.entity(event.zone).remove::<RepairInRange>();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn repair_on_interact(
    mut commands: Commands,
    mut keyboard: ResMut<ButtonInput<KeyCode>>,
    play_state: Res<State<PlayState>>,
    locks: Res<ControlLocks>,
    spots: Query<(Entity, &RepairSpot), (With<RepairInRange>, Without<Repaired>)>,
    mut inventory: ResMut<Inventory>,
    registry: Res<ItemRegistry>,
    mut removed: EventWriter<ItemRemoved>,
    mut sounds: EventWriter<PlaySound>,
    mut hooks: ResMut<HookQueue>,
    asset_server: Option<Res<AssetServer>>,
) {
    if *play_state.get() != PlayState::Exploring || locks.play_state() != PlayState::Exploring {
        return;
    }
    if !interact_pressed(&keyboard) {
        return;
    }
    let mut repaired = false;
    for (entity, spot) in &spots {
        repaired |= repair(
            &mut commands,
            entity,
            spot,
            &mut inventory,
            &registry,
            &mut removed,
            &mut sounds,
            &mut hooks,
            asset_server.as_deref(),
        );
    }
    if repaired {
        claim_interact(&mut keyboard);
    }
}

fn give_item_commands(
    mut events: EventReader<GameCommand>,
    mut inventory: ResMut<Inventory>,
    mut added: EventWriter<ItemAdded>,
) {
    for event in events.read() {
        if let GameCommand::GiveItem { item, amount } = event {
            add_items(&mut inventory, &mut added, item, *amount);
        }
    }
}

fn refresh_item_hud(
    inventory: Res<Inventory>,
    mut huds: Query<(Ref<ItemHud>, &mut Visibility)>,
) {
    for (hud, mut visibility) in &mut huds {
        if !inventory.is_changed() && !hud.is_added() {
            continue;
        }
        let wanted = if inventory.count(&hud.item) > 0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

fn clear_inventory(mut inventory: ResMut<Inventory>) {
    if !inventory.is_empty() {
        inventory.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CorePlugin, GameConfig};
    use bevy::state::app::StatesPlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(GameConfig::default())
            .init_resource::<ButtonInput<KeyCode>>()
            .add_plugins((CorePlugin, InventoryPlugin));
        app.update();
        app.world_mut().resource_mut::<NextState<GameState>>().set(GameState::InGame);
        app.update();
        app
    }

    fn enter_zone(app: &mut App, zone: Entity) {
        let player = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(ZoneEntered { zone, player });
        app.update();
    }

    #[test]
    fn test_pickup_adds_item_and_hides() {
        let mut app = test_app();
        let hud = app
            .world_mut()
            .spawn((ItemHud { item: "wood".to_string() }, Visibility::Hidden))
            .id();
        let pickup = app
            .world_mut()
            .spawn((Zone, ItemPickup::new("wood"), Visibility::Inherited))
            .id();

        enter_zone(&mut app, pickup);
        assert_eq!(app.world().resource::<Inventory>().count("wood"), 1);
        assert_eq!(app.world().get::<Visibility>(pickup), Some(&Visibility::Hidden));
        assert!(app.world().get::<Zone>(pickup).is_none());
        assert_eq!(app.world().get::<Visibility>(hud), Some(&Visibility::Inherited));

        // A second overlap of the disabled pickup gives nothing
        enter_zone(&mut app, pickup);
        assert_eq!(app.world().resource::<Inventory>().count("wood"), 1);
    }

    #[test]
    fn test_auto_repair_spends_item_once() {
        let mut app = test_app();
        app.world_mut().resource_mut::<Inventory>().add("wood", 2);
        let spot = app
            .world_mut()
            .spawn((Zone, RepairSpot { auto_use: true, ..RepairSpot::new("wood") }))
            .id();

        enter_zone(&mut app, spot);
        assert!(app.world().get::<Repaired>(spot).is_some());
        assert_eq!(app.world().resource::<Inventory>().count("wood"), 1);

        enter_zone(&mut app, spot);
        assert_eq!(app.world().resource::<Inventory>().count("wood"), 1);
    }

    #[test]
    fn test_repair_without_item_stays_broken() {
        let mut app = test_app();
        let spot = app
            .world_mut()
            .spawn((Zone, RepairSpot { auto_use: true, ..RepairSpot::new("wood") }))
            .id();
        enter_zone(&mut app, spot);
        assert!(app.world().get::<Repaired>(spot).is_none());
    }

    #[test]
    fn test_give_item_command() {
        let mut app = test_app();
        app.world_mut().send_event(GameCommand::GiveItem { item: "key".to_string(), amount: 2 });
        app.update();
        assert_eq!(app.world().resource::<Inventory>().count("key"), 2);
    }
}
