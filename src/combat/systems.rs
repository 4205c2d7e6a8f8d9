//! Combat systems - swings, hit detection, damage and knockback.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use crate::audio::SfxCue;
use crate::core::{gameplay_running, FlowControl, FlowEvent, GameFlow, PlayState};
use crate::enemies::Enemy;
use crate::player::Player;

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Input,
    Action,
    Damage,
    /// AI and death reactions to this frame's combat
    Reaction,
    Feedback,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        // Events
        .add_event::<SwingHit>()
        .add_event::<SwingFinished>()
        .add_event::<StaggerEnded>()

        // System ordering
        .configure_sets(
            Update,
            (
                CombatSet::Input,
                CombatSet::Action,
                CombatSet::Damage,
                CombatSet::Reaction,
                CombatSet::Feedback,
            )
                .chain()
                .run_if(in_state(PlayState::Running))
                .run_if(gameplay_running),
        )

        // Input systems
        .add_systems(Update, player_attack_input.in_set(CombatSet::Input))

        // Action systems
        .add_systems(
            Update,
            (update_cooldowns, advance_swings, update_staggers).in_set(CombatSet::Action),
        )

        // Damage systems
        .add_systems(
            Update,
            (
                resolve_player_hits,
                resolve_enemy_hits,
                apply_damage,
                handle_player_death,
            )
                .chain()
                .in_set(CombatSet::Damage),
        );
}

/// Start a swing on left click when the cooldown allows it.
fn player_attack_input(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    mut query: Query<(Entity, &MeleeAttack, &mut AttackCooldown), (With<Player>, Without<Dead>, Without<Swing>)>,
    mut sfx: EventWriter<SfxCue>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    let Ok((entity, attack, mut cooldown)) = query.get_single_mut() else {
        return;
    };

    if !cooldown.is_ready() {
        return;
    }

    cooldown.start(attack.cooldown);
    commands.entity(entity).insert(Swing::from_attack(attack));
    sfx.send(SfxCue::PlayerAttack);
}

/// Count attack cooldowns down.
fn update_cooldowns(time: Res<Time>, mut query: Query<&mut AttackCooldown>) {
    for mut cooldown in query.iter_mut() {
        cooldown.tick(time.delta_secs());
    }
}

/// Advance swing animations and fire their hit frame / end signals.
fn advance_swings(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Swing)>,
    mut hit_events: EventWriter<SwingHit>,
    mut finished_events: EventWriter<SwingFinished>,
) {
    for (entity, mut swing) in query.iter_mut() {
        let progress = swing.advance(time.delta());

        if progress.hit {
            hit_events.send(SwingHit { attacker: entity });
        }

        if progress.finished {
            commands.entity(entity).remove::<Swing>();
            finished_events.send(SwingFinished { attacker: entity });
        }
    }
}

/// Tick knockback slides and lockouts.
fn update_staggers(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Stagger, Option<&mut Velocity>)>,
    mut ended_events: EventWriter<StaggerEnded>,
) {
    for (entity, mut stagger, velocity) in query.iter_mut() {
        match stagger.advance(time.delta()) {
            StaggerStep::Sliding | StaggerStep::Stunned => {}
            StaggerStep::SlideEnded => {
                if let Some(mut velocity) = velocity {
                    velocity.linvel = Vec2::ZERO;
                }
            }
            StaggerStep::Finished => {
                if let Some(mut velocity) = velocity {
                    velocity.linvel = Vec2::ZERO;
                }
                commands.entity(entity).remove::<Stagger>();
                ended_events.send(StaggerEnded { entity });
            }
        }
    }
}

/// First collider overlapping a circle that passes `accept`.
fn first_overlap(
    context: &RapierContext,
    center: Vec2,
    radius: f32,
    exclude: Entity,
    mut accept: impl FnMut(Entity) -> bool,
) -> Option<Entity> {
    let shape = Collider::ball(radius);
    let mut found = None;

    context.intersections_with_shape(
        center,
        0.0,
        &shape,
        QueryFilter::default().exclude_collider(exclude),
        |hit_entity| {
            if accept(hit_entity) {
                found = Some(hit_entity);
                false // Stop at the first valid target
            } else {
                true
            }
        },
    );

    found
}

/// Player swing hit frame: damage the first enemy inside the weapon circle.
fn resolve_player_hits(
    mut hit_events: EventReader<SwingHit>,
    player_query: Query<(&Transform, &Facing, &MeleeAttack), With<Player>>,
    enemy_query: Query<(), (With<Enemy>, Without<Dead>)>,
    rapier_context: Query<&RapierContext>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok(context) = rapier_context.get_single() else {
        return;
    };

    for event in hit_events.read() {
        let Ok((transform, facing, attack)) = player_query.get(event.attacker) else {
            continue;
        };

        let origin = transform.translation.truncate();
        let point = attack.attack_point(origin, *facing);

        let Some(target) = first_overlap(context, point, attack.weapon_range, event.attacker, |e| {
            enemy_query.contains(e)
        }) else {
            continue;
        };

        damage_events.send(DamageEvent {
            target,
            source: event.attacker,
            amount: attack.damage,
            origin,
            knockback: Some(attack.knockback),
        });
    }
}

/// Enemy swing hit frame: damage the player if still inside the weapon circle.
fn resolve_enemy_hits(
    mut hit_events: EventReader<SwingHit>,
    enemy_query: Query<(&Transform, &Facing, &MeleeAttack), (With<Enemy>, Without<Dead>)>,
    player_query: Query<(), (With<Player>, Without<Dead>)>,
    rapier_context: Query<&RapierContext>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok(context) = rapier_context.get_single() else {
        return;
    };

    for event in hit_events.read() {
        let Ok((transform, facing, attack)) = enemy_query.get(event.attacker) else {
            continue;
        };

        let origin = transform.translation.truncate();
        let point = attack.attack_point(origin, *facing);

        let Some(target) = first_overlap(context, point, attack.weapon_range, event.attacker, |e| {
            player_query.contains(e)
        }) else {
            continue;
        };

        debug!("Player hit by enemy attack");
        damage_events.send(DamageEvent {
            target,
            source: event.attacker,
            amount: attack.damage,
            origin,
            knockback: Some(attack.knockback),
        });
    }
}

/// Apply damage to entities, start knockback and report deaths.
fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<(&mut Health, &Transform, Option<&mut Velocity>), Without<Dead>>,
    mut death_events: EventWriter<DeathEvent>,
    mut sfx: EventWriter<SfxCue>,
) {
    for event in damage_events.read() {
        let Ok((mut health, transform, velocity)) = health_query.get_mut(event.target) else {
            continue;
        };
        sfx.send(SfxCue::Hit);

        match health.take_damage(event.amount) {
            HealthChange::Died => {
                commands.entity(event.target).insert(Dead);
                if let Some(mut velocity) = velocity {
                    velocity.linvel = Vec2::ZERO;
                }
                death_events.send(DeathEvent { entity: event.target });
            }
            HealthChange::Ignored => {}
            HealthChange::Changed | HealthChange::Unchanged => {
                let Some(knockback) = event.knockback else {
                    continue;
                };

                let direction = (transform.translation.truncate() - event.origin).normalize_or_zero();
                if let Some(mut velocity) = velocity {
                    velocity.linvel = direction * knockback.force;
                }
                commands.entity(event.target).insert(Stagger::new(&knockback));
                debug!("Knockback applied with force: {}", knockback.force);
            }
        }
    }
}

/// Player death ends the level.
fn handle_player_death(
    mut death_events: EventReader<DeathEvent>,
    mut player_query: Query<&mut Visibility, With<Player>>,
    mut flow: ResMut<GameFlow>,
    mut flow_events: EventWriter<FlowEvent>,
) {
    for event in death_events.read() {
        let Ok(mut visibility) = player_query.get_mut(event.entity) else {
            continue;
        };

        *visibility = Visibility::Hidden;
        flow.request_game_over(&mut flow_events);
    }
}
