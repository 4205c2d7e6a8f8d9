//! Pickup plugin - spawning and collection through sensor contacts.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use crate::combat::{CombatSet, Dead, Health, MeleeAttack};
use crate::core::{PickupCollected, PickupKind, PickupTuning};
use crate::player::{Player, PlayerStats};
use crate::rendering::YSort;
use crate::world::LevelEntity;

const PICKUP_SIZE: Vec2 = Vec2::new(0.4, 0.3);

/// Pickup plugin - handles meat and bone collection.
pub struct PickupPlugin;

impl Plugin for PickupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, collect_pickups.in_set(CombatSet::Action));
    }
}

/// Spawn a pickup sensor at `position`.
pub fn spawn_pickup(commands: &mut Commands, tuning: &PickupTuning, kind: PickupKind, position: Vec2) -> Entity {
    let pickup = Pickup::from_tuning(kind, tuning);

    commands
        .spawn((
            Name::new(format!("{:?}", kind)),
            pickup,
            LevelEntity,
            Sprite::from_color(pickup.color(), PICKUP_SIZE),
            Transform::from_translation(position.extend(0.0)),
            YSort {
                foot_offset: PICKUP_SIZE.y * 0.5,
            },
            Collider::ball(tuning.trigger_radius),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

/// Apply pickups the player walked into.
fn collect_pickups(
    mut commands: Commands,
    mut collision_events: EventReader<CollisionEvent>,
    pickup_query: Query<(&Pickup, &Transform)>,
    mut player_query: Query<(&mut Health, &mut MeleeAttack, &mut PlayerStats), (With<Player>, Without<Dead>)>,
    mut collected_events: EventWriter<PickupCollected>,
) {
    let mut consumed = Vec::new();

    for event in collision_events.read() {
        let CollisionEvent::Started(a, b, _) = *event else {
            continue;
        };

        // Either collider may be the pickup
        let (pickup_entity, player_entity) = if pickup_query.contains(a) {
            (a, b)
        } else if pickup_query.contains(b) {
            (b, a)
        } else {
            continue;
        };

        if consumed.contains(&pickup_entity) {
            continue;
        }

        let Ok((mut health, mut attack, mut stats)) = player_query.get_mut(player_entity) else {
            continue;
        };
        let Ok((pickup, transform)) = pickup_query.get(pickup_entity) else {
            continue;
        };

        if pickup.apply(&mut health, &mut attack, &mut stats) == PickupOutcome::Consumed {
            collected_events.send(PickupCollected {
                kind: pickup.kind(),
                position: transform.translation.truncate(),
            });
            commands.entity(pickup_entity).despawn_recursive();
            consumed.push(pickup_entity);
        }
    }
}
