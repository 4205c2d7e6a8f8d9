//! Boss phases and minion summoning.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::PI;

use super::components::{BodyTint, Enemy, EnemyStats};
use super::data::{BossConfig, EnemyRegistry};
use super::spawning::{spawn_enemy, SpawnRole};
use crate::combat::{Dead, Health, MeleeAttack};
use crate::world::LevelEntity;

/// A phase boundary crossed during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseShift {
    Phase2,
    Phase3,
}

/// Health-gated phase ladder. Each phase is entered at most once and at most
/// one phase change happens per update.
#[derive(Component, Debug, Clone)]
pub struct BossPhases {
    pub config: BossConfig,
    phase: u8,
    entered_phase2: bool,
    entered_phase3: bool,
    /// Seconds until the next periodic summon, counting from phase 2
    next_summon: f32,
}

impl BossPhases {
    pub fn new(config: BossConfig) -> Self {
        Self {
            config,
            phase: 1,
            entered_phase2: false,
            entered_phase3: false,
            next_summon: 0.0,
        }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Check the ladder against health in percent (0-100).
    pub fn update(&mut self, health_percent: f32) -> Option<PhaseShift> {
        if !self.entered_phase2 && health_percent <= self.config.phase2_threshold {
            self.entered_phase2 = true;
            self.phase = 2;
            self.next_summon = self.config.summon_cooldown;
            Some(PhaseShift::Phase2)
        } else if self.entered_phase2 && !self.entered_phase3 && health_percent <= self.config.phase3_threshold {
            self.entered_phase3 = true;
            self.phase = 3;
            self.next_summon = self.config.summon_cooldown * 0.5;
            Some(PhaseShift::Phase3)
        } else {
            None
        }
    }

    /// Advance the summon timer. Returns true when a periodic summon is due.
    pub fn tick_summon(&mut self, delta: f32) -> bool {
        if self.phase < 2 {
            return false;
        }
        self.next_summon -= delta;
        if self.next_summon <= 0.0 {
            self.next_summon = self.config.summon_cooldown;
            true
        } else {
            false
        }
    }

    /// Speed factor applied on entering a phase. Phase 3 is relative to
    /// phase 2 so the total reaches `phase3_speed_multiplier`.
    pub fn speed_factor(&self, shift: PhaseShift) -> f32 {
        match shift {
            PhaseShift::Phase2 => self.config.phase2_speed_multiplier,
            PhaseShift::Phase3 => {
                if self.config.phase2_speed_multiplier > 0.0 {
                    self.config.phase3_speed_multiplier / self.config.phase2_speed_multiplier
                } else {
                    self.config.phase3_speed_multiplier
                }
            }
        }
    }

    pub fn tint(&self, shift: PhaseShift) -> Color {
        let (r, g, b) = match shift {
            PhaseShift::Phase2 => self.config.phase2_color,
            PhaseShift::Phase3 => self.config.phase3_color,
        };
        Color::srgb(r, g, b)
    }
}

/// Random spawn offset behind or beside the boss: 1-2.5 units away at
/// 120-240 degrees.
pub fn minion_offset(rng: &mut impl Rng) -> Vec2 {
    let distance = rng.gen_range(1.0_f32..=2.5);
    let angle = rng.gen_range(120.0_f32..=240.0) * PI / 180.0;
    Vec2::new(angle.cos(), angle.sin()) * distance
}

/// Run phase checks and summons for every living boss.
pub fn update_boss_phases(
    mut commands: Commands,
    time: Res<Time>,
    registry: Res<EnemyRegistry>,
    mut boss_query: Query<
        (&Health, &Transform, &mut BossPhases, &mut EnemyStats, &mut MeleeAttack, &mut BodyTint),
        (With<Enemy>, Without<Dead>),
    >,
) {
    for (health, transform, mut phases, mut stats, mut attack, mut tint) in boss_query.iter_mut() {
        let position = transform.translation.truncate();

        if let Some(shift) = phases.update(health.fraction() * 100.0) {
            stats.move_speed *= phases.speed_factor(shift);
            tint.0 = phases.tint(shift);

            match shift {
                PhaseShift::Phase2 => info!("Boss entered phase 2"),
                PhaseShift::Phase3 => {
                    attack.cooldown *= phases.config.phase3_cooldown_multiplier;
                    info!("Boss entered phase 3, enraged");
                }
            }

            summon_minions(&mut commands, &registry, &phases.config, position);
        }

        if phases.tick_summon(time.delta_secs()) {
            summon_minions(&mut commands, &registry, &phases.config, position);
        }
    }
}

/// Spawn a wave of half-health minions around the boss.
fn summon_minions(commands: &mut Commands, registry: &EnemyRegistry, config: &BossConfig, boss_position: Vec2) {
    if config.minion.is_empty() {
        return;
    }

    let Some(definition) = registry.get(&config.minion) else {
        warn!("Boss cannot summon minions: unknown enemy kind '{}'", config.minion);
        return;
    };

    info!("Boss summoning {} minions", config.minions_per_summon);

    let mut rng = rand::thread_rng();
    for _ in 0..config.minions_per_summon {
        let position = boss_position + minion_offset(&mut rng);
        let minion = spawn_enemy(commands, &config.minion, definition, position, SpawnRole::Minion);
        commands.entity(minion).insert(LevelEntity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn phases() -> BossPhases {
        BossPhases::new(BossConfig::default())
    }

    #[test]
    fn phases_are_monotonic_and_one_shot() {
        let mut boss = phases();
        assert_eq!(boss.update(80.0), None);
        assert_eq!(boss.update(50.0), Some(PhaseShift::Phase2));
        assert_eq!(boss.update(45.0), None);
        assert_eq!(boss.update(90.0), None);
        assert_eq!(boss.phase(), 2);
        assert_eq!(boss.update(25.0), Some(PhaseShift::Phase3));
        assert_eq!(boss.update(0.0), None);
        assert_eq!(boss.phase(), 3);
    }

    #[test]
    fn big_hit_still_passes_through_phase_two_first() {
        let mut boss = phases();
        assert_eq!(boss.update(10.0), Some(PhaseShift::Phase2));
        assert_eq!(boss.update(10.0), Some(PhaseShift::Phase3));
    }

    #[test]
    fn speed_reaches_the_phase_three_total() {
        let boss = phases();
        let total = boss.speed_factor(PhaseShift::Phase2) * boss.speed_factor(PhaseShift::Phase3);
        assert!((total - 2.0).abs() < 1e-5);
    }

    #[test]
    fn summons_start_with_phase_two_and_speed_up_in_phase_three() {
        let mut boss = phases();
        assert!(!boss.tick_summon(100.0));

        boss.update(50.0);
        assert!(!boss.tick_summon(14.0));
        assert!(boss.tick_summon(1.0));

        boss.update(20.0);
        assert!(!boss.tick_summon(7.0));
        assert!(boss.tick_summon(0.5));
        // Back to the full cooldown after the first phase 3 summon
        assert!(!boss.tick_summon(14.0));
    }

    #[test]
    fn minion_offsets_stay_behind_the_boss() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let offset = minion_offset(&mut rng);
            let distance = offset.length();
            assert!((1.0 - 1e-4..=2.5 + 1e-4).contains(&distance));
            // cos(120..240 degrees) <= -0.5
            assert!(offset.x <= -0.5 * distance + 1e-4);
        }
    }
}
