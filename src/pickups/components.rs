//! Pickup components and their effect on the player.

use bevy::prelude::*;

use crate::combat::{Health, HealthChange, MeleeAttack};
use crate::core::{PickupKind, PickupTuning};
use crate::player::PlayerStats;

/// A collectible lying in the level.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum Pickup {
    /// Restores health
    Meat { heal: i32 },
    /// Permanently raises damage and/or speed for the level
    Bone { damage_boost: i32, speed_boost: f32 },
}

/// What collecting a pickup did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    /// Used up; despawn it
    Consumed,
    /// Nothing to apply; leave it in place
    Ignored,
}

impl Pickup {
    pub fn from_tuning(kind: PickupKind, tuning: &PickupTuning) -> Self {
        match kind {
            PickupKind::Meat => Self::Meat {
                heal: tuning.meat_heal,
            },
            PickupKind::Bone => Self::Bone {
                damage_boost: tuning.bone_damage_boost,
                speed_boost: tuning.bone_speed_boost,
            },
        }
    }

    pub fn kind(&self) -> PickupKind {
        match self {
            Self::Meat { .. } => PickupKind::Meat,
            Self::Bone { .. } => PickupKind::Bone,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Meat { .. } => Color::srgb(0.8, 0.25, 0.2),
            Self::Bone { .. } => Color::srgb(0.95, 0.93, 0.85),
        }
    }

    /// Apply to the player's components.
    pub fn apply(&self, health: &mut Health, attack: &mut MeleeAttack, stats: &mut PlayerStats) -> PickupOutcome {
        match *self {
            Self::Meat { heal } => {
                if health.heal(heal) == HealthChange::Ignored {
                    return PickupOutcome::Ignored;
                }
                info!("Player picked up meat! Healed for {} HP", heal);
                PickupOutcome::Consumed
            }
            Self::Bone { damage_boost, speed_boost } => {
                let mut changed = false;

                if damage_boost > 0 {
                    attack.damage += damage_boost;
                    changed = true;
                }
                if speed_boost > 0.0 {
                    stats.move_speed += speed_boost;
                    changed = true;
                }

                if !changed {
                    warn!("Bone pickup has no stat boost configured");
                    return PickupOutcome::Ignored;
                }

                info!(
                    "Player picked up bone! Damage now {}, speed now {}",
                    attack.damage, stats.move_speed
                );
                PickupOutcome::Consumed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Knockback;

    fn player_parts() -> (Health, MeleeAttack, PlayerStats) {
        let attack = MeleeAttack {
            damage: 1,
            weapon_range: 1.0,
            reach: 0.6,
            cooldown: 1.0,
            swing_duration: 0.35,
            hit_fraction: 0.5,
            knockback: Knockback { force: 20.0, knockback_time: 0.2, stun_time: 0.3 },
        };
        (Health { current: 5, maximum: 10 }, attack, PlayerStats { move_speed: 5.0 })
    }

    #[test]
    fn meat_heals_and_is_consumed() {
        let (mut health, mut attack, mut stats) = player_parts();
        let meat = Pickup::from_tuning(PickupKind::Meat, &PickupTuning::default());
        assert_eq!(meat.apply(&mut health, &mut attack, &mut stats), PickupOutcome::Consumed);
        assert_eq!(health.current, 6);
    }

    #[test]
    fn bone_boosts_damage_and_speed() {
        let (mut health, mut attack, mut stats) = player_parts();
        let bone = Pickup::from_tuning(PickupKind::Bone, &PickupTuning::default());
        assert_eq!(bone.apply(&mut health, &mut attack, &mut stats), PickupOutcome::Consumed);
        assert_eq!(attack.damage, 2);
        assert_eq!(stats.move_speed, 5.5);
    }

    #[test]
    fn bone_without_boost_stays() {
        let (mut health, mut attack, mut stats) = player_parts();
        let bone = Pickup::Bone { damage_boost: 0, speed_boost: 0.0 };
        assert_eq!(bone.apply(&mut health, &mut attack, &mut stats), PickupOutcome::Ignored);
        assert_eq!(attack.damage, 1);
    }
}
