//! Entity spawning functions for level construction.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::data::LevelDefinition;
use super::LevelEntity;
use crate::core::PickupTuning;
use crate::enemies::{spawn_enemy, EnemyRegistry, SpawnRole};
use crate::pickups::spawn_pickup;

const WALL_COLOR: Color = Color::srgb(0.27, 0.25, 0.3);
const FLOOR_COLOR: Color = Color::srgb(0.16, 0.15, 0.17);
/// Floor and walls draw below every y-sorted sprite
const FLOOR_Z: f32 = -10.0;
const WALL_Z: f32 = -5.0;

/// Spawn floor tiles and solid walls.
pub fn spawn_tiles(commands: &mut Commands, level: &LevelDefinition) {
    let tile = Vec2::splat(level.tile_size);

    for &(x, y) in &level.floors {
        commands.spawn((
            Sprite::from_color(FLOOR_COLOR, tile),
            Transform::from_translation(level.grid_to_world(x, y).extend(FLOOR_Z)),
            LevelEntity,
        ));
    }

    for &(x, y) in &level.walls {
        commands.spawn((
            Sprite::from_color(WALL_COLOR, tile),
            Transform::from_translation(level.grid_to_world(x, y).extend(WALL_Z)),
            RigidBody::Fixed,
            Collider::cuboid(tile.x / 2.0, tile.y / 2.0),
            LevelEntity,
        ));
    }
}

/// Spawn the regular enemies placed in the layout. Returns how many were
/// spawned.
pub fn spawn_level_enemies(commands: &mut Commands, level: &LevelDefinition, registry: &EnemyRegistry) -> usize {
    let mut spawned = 0;

    for spawn in &level.enemies {
        let Some(definition) = registry.get(&spawn.kind) else {
            warn!("Unknown enemy kind in level layout: {}", spawn.kind);
            continue;
        };

        let position = level.grid_to_world(spawn.grid_pos.0, spawn.grid_pos.1);
        let enemy = spawn_enemy(commands, &spawn.kind, definition, position, SpawnRole::Regular);
        commands.entity(enemy).insert(LevelEntity);
        spawned += 1;
    }

    spawned
}

/// Spawn the pickups placed in the layout.
pub fn spawn_level_pickups(commands: &mut Commands, level: &LevelDefinition, tuning: &PickupTuning) {
    for &((x, y), kind) in &level.pickups {
        spawn_pickup(commands, tuning, kind, level.grid_to_world(x, y));
    }
}

/// Spawn the level boss at its spawn point. Returns `None` (with a warning)
/// when the level has no boss or it cannot be built.
pub fn spawn_level_boss(commands: &mut Commands, level: &LevelDefinition, registry: &EnemyRegistry) -> Option<Entity> {
    let Some(kind) = level.boss.as_deref() else {
        warn!("Boss spawn skipped: level '{}' has no boss", level.name);
        return None;
    };
    let Some(spawn_point) = level.boss_spawn else {
        warn!("Boss spawn skipped: level '{}' has no boss spawn point", level.name);
        return None;
    };
    let Some(definition) = registry.get(kind) else {
        warn!("Boss spawn skipped: unknown enemy kind '{}'", kind);
        return None;
    };

    let position = level.grid_to_world(spawn_point.0, spawn_point.1);
    let boss = spawn_enemy(commands, kind, definition, position, SpawnRole::Boss);
    commands.entity(boss).insert(LevelEntity);
    info!("Boss spawned at {:?}", position);
    Some(boss)
}
