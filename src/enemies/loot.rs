//! Loot rolls on enemy death.

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::core::PickupKind;

/// Independent drop chances (0.0-1.0) for each pickup kind.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LootTable {
    pub meat_chance: f32,
    pub bone_chance: f32,
    /// Maximum horizontal offset of a dropped bone
    pub bone_spread: f32,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            meat_chance: 0.5,
            bone_chance: 0.3,
            bone_spread: 0.5,
        }
    }
}

impl LootTable {
    /// Roll both drops. Returns each dropped kind with its offset from the
    /// enemy's position.
    pub fn roll(&self, rng: &mut impl Rng) -> Vec<(PickupKind, Vec2)> {
        let mut drops = Vec::new();

        if rng.gen::<f32>() < self.meat_chance {
            drops.push((PickupKind::Meat, Vec2::ZERO));
        }

        if rng.gen::<f32>() < self.bone_chance {
            let spread = self.bone_spread.abs();
            let dx = if spread > 0.0 {
                rng.gen_range(-spread..=spread)
            } else {
                0.0
            };
            drops.push((PickupKind::Bone, Vec2::new(dx, 0.0)));
        }

        drops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn certain_drops_always_appear() {
        let table = LootTable { meat_chance: 1.0, bone_chance: 1.0, bone_spread: 0.5 };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let drops = table.roll(&mut rng);
            assert_eq!(drops.len(), 2);
            assert_eq!(drops[0], (PickupKind::Meat, Vec2::ZERO));
            assert_eq!(drops[1].0, PickupKind::Bone);
            assert!(drops[1].1.x.abs() <= 0.5);
            assert_eq!(drops[1].1.y, 0.0);
        }
    }

    #[test]
    fn zero_chance_never_drops() {
        let table = LootTable { meat_chance: 0.0, bone_chance: 0.0, bone_spread: 0.5 };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert!(table.roll(&mut rng).is_empty());
        }
    }
}
