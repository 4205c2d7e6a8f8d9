//! Enemy AI: a pure transition function plus the systems that feed it.
//!
//! Systems turn the world into [`AiSignal`]s, [`transition`] decides the next
//! [`EnemyState`] and the side effects, and [`apply_transition`] performs them.

use bevy::ecs::query::QueryData;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{AnimFlag, AnimationFlags, Boss, Enemy, EnemyKind, EnemyState, EnemyStats};
use super::data::EnemyRegistry;
use crate::audio::SfxCue;
use crate::combat::{
    AttackCooldown, Dead, DeathEvent, Facing, MeleeAttack, Stagger, StaggerEnded, Swing, SwingFinished,
};
use crate::core::{BossDefeated, GameConfig};
use crate::pickups::spawn_pickup;
use crate::player::Player;

/// Distances the decision logic compares against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiRanges {
    pub detection: f32,
    pub attack: f32,
}

impl From<&EnemyStats> for AiRanges {
    fn from(stats: &EnemyStats) -> Self {
        Self {
            detection: stats.detection_range,
            attack: stats.attack_range,
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiSignal {
    /// Per-frame poll
    Tick { distance: f32, cooldown_ready: bool },
    /// The attack swing ended
    AttackFinished { distance: f32 },
    /// Knocked back by a hit
    Hit,
    /// Knockback lockout is over
    StunOver,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiEffect {
    SetAnimFlag { flag: AnimFlag, on: bool },
    /// Start a swing and restart the cooldown
    BeginAttack,
    StopMoving,
}

/// Result of one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: EnemyState,
    pub effects: Vec<AiEffect>,
}

impl Transition {
    fn stay(state: EnemyState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }

    fn change(from: EnemyState, to: EnemyState) -> Self {
        if from == to {
            return Self::stay(from);
        }

        let mut effects = vec![
            AiEffect::SetAnimFlag { flag: from.anim_flag(), on: false },
            AiEffect::SetAnimFlag { flag: to.anim_flag(), on: true },
        ];
        match to {
            EnemyState::Attacking => effects.push(AiEffect::BeginAttack),
            EnemyState::Idle | EnemyState::Knockback => effects.push(AiEffect::StopMoving),
            EnemyState::Chasing => {}
        }

        Self { next: to, effects }
    }

    pub fn changed(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// Decide the next state for `signal`.
pub fn transition(state: EnemyState, signal: AiSignal, ranges: AiRanges) -> Transition {
    use EnemyState::*;

    match (state, signal) {
        (_, AiSignal::Hit) => Transition::change(state, Knockback),

        (Knockback, AiSignal::StunOver) => Transition::change(Knockback, Idle),

        (Idle, AiSignal::Tick { distance, .. }) if distance <= ranges.detection => {
            Transition::change(Idle, Chasing)
        }

        (Chasing, AiSignal::Tick { distance, cooldown_ready }) => {
            if distance <= ranges.attack && cooldown_ready {
                Transition::change(Chasing, Attacking)
            } else if distance > ranges.detection {
                Transition::change(Chasing, Idle)
            } else {
                Transition::stay(Chasing)
            }
        }

        (Attacking, AiSignal::AttackFinished { distance }) => {
            if distance <= ranges.detection {
                Transition::change(Attacking, Chasing)
            } else {
                Transition::change(Attacking, Idle)
            }
        }

        _ => Transition::stay(state),
    }
}

/// Everything a transition may touch on an enemy.
#[derive(QueryData)]
#[query_data(mutable)]
pub struct EnemyAi {
    entity: Entity,
    transform: &'static Transform,
    stats: &'static EnemyStats,
    state: &'static mut EnemyState,
    flags: &'static mut AnimationFlags,
    velocity: &'static mut Velocity,
    cooldown: &'static mut AttackCooldown,
    attack: &'static MeleeAttack,
    staggered: Has<Stagger>,
}

impl EnemyAiItem<'_> {
    fn position(&self) -> Vec2 {
        self.transform.translation.truncate()
    }

    fn ranges(&self) -> AiRanges {
        AiRanges::from(self.stats)
    }
}

/// Perform a transition's effects and store the new state.
fn apply_transition(commands: &mut Commands, enemy: &mut EnemyAiItem, result: Transition) {
    for effect in &result.effects {
        match *effect {
            AiEffect::SetAnimFlag { flag, on } => enemy.flags.set(flag, on),
            AiEffect::BeginAttack => {
                enemy.cooldown.start(enemy.attack.cooldown);
                enemy.velocity.linvel = Vec2::ZERO;
                commands.entity(enemy.entity).insert(Swing::from_attack(enemy.attack));
            }
            AiEffect::StopMoving => {
                // A fresh knockback owns the velocity until its slide ends
                if !enemy.staggered {
                    enemy.velocity.linvel = Vec2::ZERO;
                }
            }
        }
    }

    if result.changed() {
        debug!("Enemy {:?}: {:?} -> {:?}", enemy.entity, *enemy.state, result.next);
    }
    *enemy.state = result.next;
}

/// Player position, or `None` when there is nothing to chase.
fn living_player(player_query: &Query<(&Transform, Has<Dead>), (With<Player>, Without<Enemy>)>) -> Option<Vec2> {
    let Ok((transform, dead)) = player_query.get_single() else {
        return None;
    };
    (!dead).then(|| transform.translation.truncate())
}

fn distance_to(player: Option<Vec2>, position: Vec2) -> f32 {
    player.map_or(f32::INFINITY, |p| p.distance(position))
}

/// Per-frame detection and attack decisions.
pub fn enemy_perception(
    mut commands: Commands,
    player_query: Query<(&Transform, Has<Dead>), (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<EnemyAi, (With<Enemy>, Without<Dead>)>,
    mut sfx: EventWriter<SfxCue>,
) {
    let player = living_player(&player_query);

    for mut enemy in enemy_query.iter_mut() {
        let signal = AiSignal::Tick {
            distance: distance_to(player, enemy.position()),
            cooldown_ready: enemy.cooldown.is_ready(),
        };
        let result = transition(*enemy.state, signal, enemy.ranges());
        if result.effects.contains(&AiEffect::BeginAttack) {
            sfx.send(SfxCue::EnemyAttack);
        }
        apply_transition(&mut commands, &mut enemy, result);
    }
}

/// Move chasing enemies toward the player and face them.
pub fn chase_player(
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (&Transform, &EnemyStats, &EnemyState, &mut Velocity, &mut Facing),
        (With<Enemy>, Without<Dead>, Without<Stagger>),
    >,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (transform, stats, state, mut velocity, mut facing) in enemy_query.iter_mut() {
        if *state != EnemyState::Chasing {
            continue;
        }

        let delta = player_pos - transform.translation.truncate();
        facing.face(delta.x);
        velocity.linvel = delta.normalize_or_zero() * stats.move_speed;
    }
}

/// Re-evaluate distance when an enemy's swing ends.
pub fn enemy_attack_finished(
    mut commands: Commands,
    mut finished_events: EventReader<SwingFinished>,
    player_query: Query<(&Transform, Has<Dead>), (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<EnemyAi, (With<Enemy>, Without<Dead>)>,
) {
    let player = living_player(&player_query);

    for event in finished_events.read() {
        let Ok(mut enemy) = enemy_query.get_mut(event.attacker) else {
            continue;
        };

        let signal = AiSignal::AttackFinished {
            distance: distance_to(player, enemy.position()),
        };
        let result = transition(*enemy.state, signal, enemy.ranges());
        apply_transition(&mut commands, &mut enemy, result);
    }
}

/// Enter knockback when a hit starts a stagger. Any swing in progress is
/// cancelled.
pub fn enemy_hit_reaction(
    mut commands: Commands,
    mut enemy_query: Query<EnemyAi, (With<Enemy>, Without<Dead>, Added<Stagger>)>,
) {
    for mut enemy in enemy_query.iter_mut() {
        commands.entity(enemy.entity).remove::<Swing>();
        let result = transition(*enemy.state, AiSignal::Hit, enemy.ranges());
        apply_transition(&mut commands, &mut enemy, result);
    }
}

/// Return to idle when the knockback lockout ends.
pub fn enemy_stun_over(
    mut commands: Commands,
    mut ended_events: EventReader<StaggerEnded>,
    mut enemy_query: Query<EnemyAi, (With<Enemy>, Without<Dead>)>,
) {
    for event in ended_events.read() {
        let Ok(mut enemy) = enemy_query.get_mut(event.entity) else {
            continue;
        };

        let result = transition(*enemy.state, AiSignal::StunOver, enemy.ranges());
        apply_transition(&mut commands, &mut enemy, result);
    }
}

/// Drop loot and despawn enemies that died this frame. Despawning removes the
/// roster membership, which counts the enemy down.
pub fn handle_enemy_deaths(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    config: Res<GameConfig>,
    registry: Res<EnemyRegistry>,
    enemy_query: Query<(&Transform, &EnemyKind, Has<Boss>), With<Enemy>>,
    mut boss_events: EventWriter<BossDefeated>,
) {
    let mut rng = rand::thread_rng();

    for event in death_events.read() {
        let Ok((transform, kind, is_boss)) = enemy_query.get(event.entity) else {
            continue;
        };

        let position = transform.translation.truncate();
        info!("{} died", kind.0);

        if let Some(definition) = registry.get(&kind.0) {
            for (pickup, offset) in definition.loot.roll(&mut rng) {
                spawn_pickup(&mut commands, &config.pickups, pickup, position + offset);
                info!("{} dropped {:?}", kind.0, pickup);
            }
        }

        if is_boss {
            info!("Boss defeated");
            boss_events.send(BossDefeated { boss: event.entity });
        }

        commands.entity(event.entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGES: AiRanges = AiRanges {
        detection: 5.0,
        attack: 1.0,
    };

    fn tick(distance: f32, cooldown_ready: bool) -> AiSignal {
        AiSignal::Tick { distance, cooldown_ready }
    }

    fn flag_pair(from: AnimFlag, to: AnimFlag) -> [AiEffect; 2] {
        [
            AiEffect::SetAnimFlag { flag: from, on: false },
            AiEffect::SetAnimFlag { flag: to, on: true },
        ]
    }

    #[test]
    fn idle_starts_chasing_inside_detection_radius() {
        let result = transition(EnemyState::Idle, tick(4.0, true), RANGES);
        assert_eq!(result.next, EnemyState::Chasing);
        assert_eq!(result.effects, flag_pair(AnimFlag::Idle, AnimFlag::Chasing).to_vec());

        let result = transition(EnemyState::Idle, tick(6.0, true), RANGES);
        assert_eq!(result, Transition::stay(EnemyState::Idle));
    }

    #[test]
    fn chasing_attacks_only_when_in_range_and_ready() {
        let result = transition(EnemyState::Chasing, tick(0.8, true), RANGES);
        assert_eq!(result.next, EnemyState::Attacking);
        assert_eq!(result.effects.last(), Some(&AiEffect::BeginAttack));

        let result = transition(EnemyState::Chasing, tick(0.8, false), RANGES);
        assert_eq!(result.next, EnemyState::Chasing);
        assert!(!result.changed());
    }

    #[test]
    fn chasing_gives_up_outside_detection_radius() {
        let result = transition(EnemyState::Chasing, tick(5.5, true), RANGES);
        assert_eq!(result.next, EnemyState::Idle);
        assert_eq!(result.effects.last(), Some(&AiEffect::StopMoving));
    }

    #[test]
    fn attacking_ignores_ticks_until_the_swing_ends() {
        let result = transition(EnemyState::Attacking, tick(10.0, true), RANGES);
        assert_eq!(result, Transition::stay(EnemyState::Attacking));

        let near = transition(EnemyState::Attacking, AiSignal::AttackFinished { distance: 2.0 }, RANGES);
        assert_eq!(near.next, EnemyState::Chasing);

        let far = transition(EnemyState::Attacking, AiSignal::AttackFinished { distance: 9.0 }, RANGES);
        assert_eq!(far.next, EnemyState::Idle);
    }

    #[test]
    fn any_state_is_knocked_back_and_stun_returns_to_idle() {
        for state in [EnemyState::Idle, EnemyState::Chasing, EnemyState::Attacking] {
            let result = transition(state, AiSignal::Hit, RANGES);
            assert_eq!(result.next, EnemyState::Knockback);
            let mut expected = flag_pair(state.anim_flag(), AnimFlag::Knockback).to_vec();
            expected.push(AiEffect::StopMoving);
            assert_eq!(result.effects, expected);
        }

        let result = transition(EnemyState::Knockback, AiSignal::StunOver, RANGES);
        assert_eq!(result.next, EnemyState::Idle);
    }

    #[test]
    fn knockback_ignores_everything_but_stun_over() {
        assert!(!transition(EnemyState::Knockback, tick(0.1, true), RANGES).changed());
        assert!(!transition(EnemyState::Knockback, AiSignal::Hit, RANGES).changed());
        assert!(!transition(EnemyState::Idle, AiSignal::StunOver, RANGES).changed());
    }

    #[test]
    fn every_change_emits_exactly_one_flag_pair() {
        let states = [
            EnemyState::Idle,
            EnemyState::Chasing,
            EnemyState::Attacking,
            EnemyState::Knockback,
        ];
        let signals = [
            tick(0.5, true),
            tick(3.0, false),
            tick(50.0, true),
            AiSignal::AttackFinished { distance: 0.5 },
            AiSignal::AttackFinished { distance: 50.0 },
            AiSignal::Hit,
            AiSignal::StunOver,
        ];

        for state in states {
            for signal in signals {
                let result = transition(state, signal, RANGES);
                let flag_effects: Vec<_> = result
                    .effects
                    .iter()
                    .filter(|e| matches!(e, AiEffect::SetAnimFlag { .. }))
                    .collect();
                if result.next == state {
                    assert!(flag_effects.is_empty());
                } else {
                    assert_eq!(flag_effects.len(), 2);
                }
            }
        }
    }
}
