//! Combat-related components.

use bevy::prelude::*;
use std::time::Duration;

// Re-export from core to avoid duplication
pub use crate::core::{DamageEvent, DeathEvent, Knockback};

/// Outcome of a health change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    /// Already dead, nothing applied
    Ignored,
    /// Clamped to the same value (e.g. healing at full health)
    Unchanged,
    Changed,
    /// This change brought health to zero
    Died,
}

/// Component for entities that can take damage.
///
/// Health is always kept in `[0, maximum]`. Once it reaches zero every
/// further change is ignored, so death is reported exactly once.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub maximum: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Add `amount` (negative for damage) and clamp.
    pub fn change(&mut self, amount: i32) -> HealthChange {
        if self.is_dead() {
            return HealthChange::Ignored;
        }

        let previous = self.current;
        self.current = self.current.saturating_add(amount).clamp(0, self.maximum);

        if self.current == 0 {
            HealthChange::Died
        } else if self.current == previous {
            HealthChange::Unchanged
        } else {
            HealthChange::Changed
        }
    }

    pub fn take_damage(&mut self, amount: i32) -> HealthChange {
        self.change(-amount.max(0))
    }

    pub fn heal(&mut self, amount: i32) -> HealthChange {
        self.change(amount.max(0))
    }

    /// Replace the maximum (at least 1) and refill.
    pub fn reset_maximum(&mut self, maximum: i32) {
        self.maximum = maximum.max(1);
        self.current = self.maximum;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    pub fn fraction(&self) -> f32 {
        if self.maximum <= 0 {
            return 0.0;
        }
        (self.current as f32 / self.maximum as f32).clamp(0.0, 1.0)
    }
}

/// Horizontal facing, +1 right and -1 left. Drives sprite flipping and
/// where the attack point sits.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Facing {
    /// Turn toward a horizontal delta. Returns true if the facing flipped.
    pub fn face(&mut self, dx: f32) -> bool {
        let wanted = if dx > 0.0 {
            1.0
        } else if dx < 0.0 {
            -1.0
        } else {
            return false;
        };

        if wanted != self.0 {
            self.0 = wanted;
            true
        } else {
            false
        }
    }

    pub fn is_left(&self) -> bool {
        self.0 < 0.0
    }
}

/// Melee weapon stats shared by the player and enemies.
#[derive(Component, Debug, Clone)]
pub struct MeleeAttack {
    pub damage: i32,
    /// Radius of the hit circle
    pub weapon_range: f32,
    /// Offset of the hit circle in front of the attacker
    pub reach: f32,
    /// Seconds between swings
    pub cooldown: f32,
    pub swing_duration: f32,
    /// Fraction of the swing at which damage lands (0.0-1.0)
    pub hit_fraction: f32,
    pub knockback: Knockback,
}

impl MeleeAttack {
    /// Centre of the hit circle for an attacker at `origin`.
    pub fn attack_point(&self, origin: Vec2, facing: Facing) -> Vec2 {
        origin + Vec2::X * facing.0 * self.reach
    }
}

/// Remaining cooldown before the next swing. 0 = ready.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct AttackCooldown {
    pub remaining: f32,
}

impl AttackCooldown {
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn start(&mut self, seconds: f32) {
        self.remaining = seconds;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }
}

/// What happened to a swing during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwingProgress {
    pub hit: bool,
    pub finished: bool,
}

/// An in-progress attack animation. Stands in for the animation events that
/// apply damage at the hit frame and end the attack.
#[derive(Component, Debug)]
pub struct Swing {
    pub timer: Timer,
    pub hit_fraction: f32,
    pub hit_fired: bool,
}

impl Swing {
    pub fn new(duration: f32, hit_fraction: f32) -> Self {
        Self {
            timer: Timer::from_seconds(duration.max(0.0), TimerMode::Once),
            hit_fraction: hit_fraction.clamp(0.0, 1.0),
            hit_fired: false,
        }
    }

    pub fn from_attack(attack: &MeleeAttack) -> Self {
        Self::new(attack.swing_duration, attack.hit_fraction)
    }

    pub fn advance(&mut self, delta: Duration) -> SwingProgress {
        self.timer.tick(delta);

        let mut progress = SwingProgress::default();
        if !self.hit_fired && self.timer.fraction() >= self.hit_fraction {
            self.hit_fired = true;
            progress.hit = true;
        }
        progress.finished = self.timer.finished();
        progress
    }
}

/// Forced slide followed by a control lockout.
#[derive(Component, Debug)]
pub struct Stagger {
    pub slide: Timer,
    pub stun: Timer,
}

/// What happened to a stagger during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggerStep {
    Sliding,
    /// The slide just ended; velocity should be zeroed
    SlideEnded,
    Stunned,
    Finished,
}

impl Stagger {
    pub fn new(knockback: &Knockback) -> Self {
        Self {
            slide: Timer::from_seconds(knockback.knockback_time.max(0.0), TimerMode::Once),
            stun: Timer::from_seconds(knockback.stun_time.max(0.0), TimerMode::Once),
        }
    }

    pub fn advance(&mut self, delta: Duration) -> StaggerStep {
        if !self.slide.finished() {
            self.slide.tick(delta);
            if !self.slide.finished() {
                return StaggerStep::Sliding;
            }
            if self.stun.duration().is_zero() {
                return StaggerStep::Finished;
            }
            return StaggerStep::SlideEnded;
        }

        self.stun.tick(delta);
        if self.stun.finished() {
            StaggerStep::Finished
        } else {
            StaggerStep::Stunned
        }
    }
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;

/// Sent when a swing reaches its hit frame.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwingHit {
    pub attacker: Entity,
}

/// Sent when a swing animation ends.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwingFinished {
    pub attacker: Entity,
}

/// Sent when a stagger's lockout ends.
#[derive(Event, Debug, Clone, Copy)]
pub struct StaggerEnded {
    pub entity: Entity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero_and_dies_once() {
        let mut health = Health::new(10);
        assert_eq!(health.change(-15), HealthChange::Died);
        assert_eq!(health.current, 0);
        assert_eq!(health.change(-1), HealthChange::Ignored);
        assert_eq!(health.change(5), HealthChange::Ignored);
        assert_eq!(health.current, 0);
    }

    #[test]
    fn healing_clamps_at_maximum() {
        let mut health = Health::new(10);
        health.change(-3);
        assert_eq!(health.heal(50), HealthChange::Changed);
        assert_eq!(health.current, 10);
        assert_eq!(health.heal(1), HealthChange::Unchanged);
    }

    #[test]
    fn change_matches_clamp_for_a_range_of_inputs() {
        for start in 1..=10 {
            for delta in -12..=12 {
                let mut health = Health { current: start, maximum: 10 };
                health.change(delta);
                assert_eq!(health.current, (start + delta).clamp(0, 10));
            }
        }
    }

    #[test]
    fn negative_damage_does_not_heal() {
        let mut health = Health::new(4);
        health.change(-2);
        assert_eq!(health.take_damage(-3), HealthChange::Unchanged);
        assert_eq!(health.current, 2);
    }

    #[test]
    fn reset_maximum_refills_and_keeps_at_least_one() {
        let mut health = Health::new(3);
        health.reset_maximum(3 / 2);
        assert_eq!(health, Health { current: 1, maximum: 1 });
        health.reset_maximum(0);
        assert_eq!(health.maximum, 1);
    }

    #[test]
    fn facing_only_flips_on_sign_change() {
        let mut facing = Facing::default();
        assert!(!facing.face(2.0));
        assert!(!facing.face(0.0));
        assert!(facing.face(-0.5));
        assert!(facing.is_left());
        assert!(!facing.face(-3.0));
    }

    #[test]
    fn cooldown_counts_down_to_zero() {
        let mut cooldown = AttackCooldown::default();
        assert!(cooldown.is_ready());
        cooldown.start(1.0);
        cooldown.tick(0.4);
        assert!(!cooldown.is_ready());
        cooldown.tick(0.8);
        assert_eq!(cooldown.remaining, 0.0);
        assert!(cooldown.is_ready());
    }

    #[test]
    fn swing_hits_once_then_finishes() {
        let mut swing = Swing::new(1.0, 0.5);
        assert_eq!(swing.advance(Duration::from_millis(300)), SwingProgress::default());
        assert_eq!(
            swing.advance(Duration::from_millis(300)),
            SwingProgress { hit: true, finished: false }
        );
        assert_eq!(
            swing.advance(Duration::from_millis(500)),
            SwingProgress { hit: false, finished: true }
        );
    }

    #[test]
    fn attack_point_follows_facing() {
        let attack = MeleeAttack {
            damage: 1,
            weapon_range: 1.0,
            reach: 0.5,
            cooldown: 1.0,
            swing_duration: 0.3,
            hit_fraction: 0.5,
            knockback: Knockback { force: 1.0, knockback_time: 0.1, stun_time: 0.1 },
        };
        assert_eq!(attack.attack_point(Vec2::new(1.0, 2.0), Facing(-1.0)), Vec2::new(0.5, 2.0));
    }

    #[test]
    fn stagger_slides_then_stuns() {
        let mut stagger = Stagger::new(&Knockback { force: 5.0, knockback_time: 0.2, stun_time: 0.2 });
        assert_eq!(stagger.advance(Duration::from_millis(100)), StaggerStep::Sliding);
        assert_eq!(stagger.advance(Duration::from_millis(150)), StaggerStep::SlideEnded);
        assert_eq!(stagger.advance(Duration::from_millis(100)), StaggerStep::Stunned);
        assert_eq!(stagger.advance(Duration::from_millis(150)), StaggerStep::Finished);
    }

    #[test]
    fn stagger_without_stun_finishes_with_the_slide() {
        let mut stagger = Stagger::new(&Knockback { force: 5.0, knockback_time: 0.3, stun_time: 0.0 });
        assert_eq!(stagger.advance(Duration::from_millis(400)), StaggerStep::Finished);
    }
}
