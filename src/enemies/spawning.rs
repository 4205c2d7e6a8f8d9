//! Enemy spawning.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::boss::BossPhases;
use super::components::{AnimationFlags, BodyTint, Boss, Enemy, EnemyKind, EnemyState};
use super::data::EnemyDefinition;
use super::roster::RosterMember;
use crate::combat::{AttackCooldown, Facing, Health};
use crate::rendering::YSort;

/// How a spawned enemy takes part in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRole {
    /// Counted by the roster
    Regular,
    /// Counted by the roster, spawned at half health
    Minion,
    /// Never counted; carries the phase controller
    Boss,
}

/// Max health for a role. Minions get half, at least 1.
pub fn role_max_health(definition: &EnemyDefinition, role: SpawnRole) -> i32 {
    match role {
        SpawnRole::Minion => (definition.max_health / 2).max(1),
        SpawnRole::Regular | SpawnRole::Boss => definition.max_health.max(1),
    }
}

/// Spawn a single enemy from its definition.
pub fn spawn_enemy(
    commands: &mut Commands,
    kind: &str,
    definition: &EnemyDefinition,
    position: Vec2,
    role: SpawnRole,
) -> Entity {
    let color = definition.color();
    let size = Vec2::new(definition.size.0, definition.size.1);

    let mut entity = commands.spawn((
        Name::new(definition.name.clone()),
        Enemy,
        EnemyKind(kind.to_string()),
        EnemyState::default(),
        AnimationFlags::default(),
        definition.to_stats(),
        definition.to_attack(),
        AttackCooldown::default(),
        Health::new(role_max_health(definition, role)),
        Facing(-1.0),
        BodyTint(color),
        Sprite::from_color(color, size),
        Transform::from_translation(position.extend(0.0)),
        YSort { foot_offset: size.y * 0.5 },
    ));

    entity.insert((
        RigidBody::Dynamic,
        Collider::ball(definition.collider_radius),
        LockedAxes::ROTATION_LOCKED,
        GravityScale(0.0),
        Velocity::zero(),
        Damping { linear_damping: 0.0, angular_damping: 0.0 },
    ));

    match role {
        SpawnRole::Regular | SpawnRole::Minion => {
            entity.insert(RosterMember);
        }
        SpawnRole::Boss => {
            let config = definition.boss.clone().unwrap_or_else(|| {
                warn!("Boss '{}' has no phase settings, using defaults", definition.name);
                Default::default()
            });
            entity.insert((Boss, BossPhases::new(config)));
        }
    }

    info!("Spawned {} at {:?} ({:?})", definition.name, position, role);
    entity.id()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(max_health: i32) -> EnemyDefinition {
        ron::from_str(&format!(
            r#"(
                name: "Skeleton",
                max_health: {max_health},
                damage: 1,
                move_speed: 2.0,
                detection_range: 5.0,
                attack_range: 0.9,
                attack_cooldown: 1.5,
                weapon_range: 0.5,
                attack_reach: 0.5,
                swing_duration: 0.5,
                swing_hit_fraction: 0.6,
                knockback_force: 5.0,
                stun_time: 0.2,
                size: (0.8, 1.0),
                color: (0.85, 0.85, 0.8),
                collider_radius: 0.35,
            )"#
        ))
        .expect("parse")
    }

    #[test]
    fn minions_get_half_health_but_at_least_one() {
        assert_eq!(role_max_health(&definition(6), SpawnRole::Minion), 3);
        assert_eq!(role_max_health(&definition(3), SpawnRole::Minion), 1);
        assert_eq!(role_max_health(&definition(1), SpawnRole::Minion), 1);
        assert_eq!(role_max_health(&definition(6), SpawnRole::Regular), 6);
    }
}
