//! Trigger zones: sensor overlaps translated into zone events.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::{ZoneEntered, ZoneExited};
use crate::player::Player;

/// An active trigger area. Removing it switches the trigger off.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Zone;

/// Order a collision pair as `(zone, player)`, if it is one.
pub fn zone_pair(
    a: Entity,
    b: Entity,
    is_zone: impl Fn(Entity) -> bool,
    is_player: impl Fn(Entity) -> bool,
) -> Option<(Entity, Entity)> {
    if is_zone(a) && is_player(b) {
        Some((a, b))
    } else if is_zone(b) && is_player(a) {
        Some((b, a))
    } else {
        None
    }
}

pub fn emit_zone_events(
    mut collisions: EventReader<CollisionEvent>,
    zones: Query<(), With<Zone>>,
    players: Query<(), With<Player>>,
    mut entered: EventWriter<ZoneEntered>,
    mut exited: EventWriter<ZoneExited>,
) {
    let is_zone = |e: Entity| zones.contains(e);
    let is_player = |e: Entity| players.contains(e);

    for collision in collisions.read() {
        match collision {
            CollisionEvent::Started(a, b, _) => {
                if let Some((zone, player)) = zone_pair(*a, *b, is_zone, is_player) {
                    entered.send(ZoneEntered { zone, player });
                }
            }
            CollisionEvent::Stopped(a, b, _) => {
                if let Some((zone, player)) = zone_pair(*a, *b, is_zone, is_player) {
                    exited.send(ZoneExited { zone, player });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_order_does_not_matter() {
        let zone = Entity::from_raw(1);
        let player = Entity::from_raw(2);
        let wall = Entity::from_raw(3);
        let is_zone = |e: Entity| e == zone;
        let is_player = |e: Entity| e == player;

        assert_eq!(zone_pair(zone, player, is_zone, is_player), Some((zone, player)));
        assert_eq!(zone_pair(player, zone, is_zone, is_player), Some((zone, player)));
        assert_eq!(zone_pair(player, wall, is_zone, is_player), None);
        assert_eq!(zone_pair(zone, wall, is_zone, is_player), None);
    }
}
