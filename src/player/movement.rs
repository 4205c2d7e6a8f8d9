//! Top-down player movement and sprite feedback.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use crate::combat::{AttackCooldown, CombatSet, Dead, Facing, Health, Knockback, MeleeAttack, Stagger, Swing};
use crate::core::PlayerTuning;
use crate::rendering::YSort;

const PLAYER_SIZE: Vec2 = Vec2::new(0.8, 1.0);
const PLAYER_COLOR: Color = Color::srgb(0.35, 0.6, 0.95);

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(
        Update,
        (player_movement, stop_walking_while_disabled).in_set(CombatSet::Input),
    )
        .add_systems(Update, animate_player.in_set(CombatSet::Feedback));
}

/// Unit direction from WASD state. Opposite keys cancel.
pub fn input_direction(up: bool, down: bool, left: bool, right: bool) -> Vec2 {
    let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
    Vec2::new(axis(left, right), axis(down, up)).normalize_or_zero()
}

/// Handle WASD movement. A staggered player keeps its knockback velocity.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut player_query: Query<
        (&PlayerStats, &mut Velocity, &mut Facing, &mut Walking),
        (With<Player>, Without<Dead>, Without<Stagger>),
    >,
) {
    let Ok((stats, mut velocity, mut facing, mut walking)) = player_query.get_single_mut() else {
        return;
    };

    let direction = input_direction(
        keyboard.pressed(KeyCode::KeyW),
        keyboard.pressed(KeyCode::KeyS),
        keyboard.pressed(KeyCode::KeyA),
        keyboard.pressed(KeyCode::KeyD),
    );

    if direction.x != 0.0 && (direction.x < 0.0) != facing.is_left() {
        facing.face(direction.x);
    }

    velocity.linvel = direction * stats.move_speed;
    walking.set_if_neq(Walking(velocity.linvel.length() > 0.1));
}

/// Flip the sprite to the facing side and flash it while hit or swinging.
/// A staggered or dead player is not walking, whatever its velocity says.
fn stop_walking_while_disabled(
    mut player_query: Query<&mut Walking, (With<Player>, Or<(With<Stagger>, With<Dead>)>)>,
) {
    for mut walking in player_query.iter_mut() {
        walking.set_if_neq(Walking(false));
    }
}

fn animate_player(
    mut player_query: Query<(&Facing, &mut Sprite, Has<Stagger>, Has<Swing>), With<Player>>,
) {
    let Ok((facing, mut sprite, staggered, swinging)) = player_query.get_single_mut() else {
        return;
    };

    sprite.flip_x = facing.is_left();
    let base = PLAYER_COLOR.to_srgba();
    sprite.color = if staggered {
        base.mix(&Srgba::RED, 0.5).into()
    } else if swinging {
        base.mix(&Srgba::WHITE, 0.3).into()
    } else {
        PLAYER_COLOR
    };
}

/// Spawn the player entity.
pub fn spawn_player(commands: &mut Commands, position: Vec2, tuning: &PlayerTuning) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerStats {
                move_speed: tuning.speed,
            },
            Walking::default(),
            Health::new(tuning.max_health.max(1)),
            Facing::default(),
            MeleeAttack {
                damage: tuning.damage,
                weapon_range: tuning.weapon_range,
                reach: tuning.attack_reach,
                cooldown: tuning.attack_cooldown,
                swing_duration: tuning.swing_duration,
                hit_fraction: tuning.swing_hit_fraction,
                knockback: Knockback {
                    force: tuning.knockback_force,
                    knockback_time: tuning.knockback_time,
                    stun_time: tuning.stun_time,
                },
            },
            AttackCooldown::default(),
            Sprite::from_color(PLAYER_COLOR, PLAYER_SIZE),
            Transform::from_translation(position.extend(0.0)),
            YSort {
                foot_offset: PLAYER_SIZE.y * 0.5,
            },
        ))
        .insert((
            // Rapier physics components
            RigidBody::Dynamic,
            Collider::ball(tuning.collider_radius),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(0.0),
            Velocity::zero(),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_input_is_normalized() {
        let direction = input_direction(true, false, false, true);
        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!(direction.x > 0.0 && direction.y > 0.0);
    }

    #[test]
    fn knockback_stops_the_walk() {
        let mut app = App::new();
        app.add_systems(Update, stop_walking_while_disabled);

        let knockback = Knockback {
            force: 8.0,
            knockback_time: 0.2,
            stun_time: 0.3,
        };
        let staggered = app
            .world_mut()
            .spawn((Player, Walking(true), Stagger::new(&knockback)))
            .id();
        let dead = app.world_mut().spawn((Player, Walking(true), Dead)).id();
        let free = app.world_mut().spawn((Player, Walking(true))).id();

        app.update();

        assert_eq!(app.world().get::<Walking>(staggered), Some(&Walking(false)));
        assert_eq!(app.world().get::<Walking>(dead), Some(&Walking(false)));
        assert_eq!(app.world().get::<Walking>(free), Some(&Walking(true)));
    }

    #[test]
    fn opposite_keys_cancel() {
        assert_eq!(input_direction(true, true, false, false), Vec2::ZERO);
        assert_eq!(input_direction(false, false, true, true), Vec2::ZERO);
        assert_eq!(input_direction(false, false, true, false), Vec2::NEG_X);
    }
}
