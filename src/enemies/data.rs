//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::components::EnemyStats;
use super::loot::LootTable;
use crate::combat::{Knockback, MeleeAttack};
use crate::core::load_ron;

const ENEMIES_DIR: &str = "assets/data/enemies";

/// Boss phase ladder and summoning settings.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct BossConfig {
    /// Health percentage (0-100) at or below which phase 2 starts
    pub phase2_threshold: f32,
    pub phase3_threshold: f32,
    pub phase2_speed_multiplier: f32,
    /// Overall speed multiplier in phase 3 (relative to phase 1)
    pub phase3_speed_multiplier: f32,
    pub phase3_cooldown_multiplier: f32,
    pub phase2_color: (f32, f32, f32),
    pub phase3_color: (f32, f32, f32),
    pub summon_cooldown: f32,
    pub minions_per_summon: u32,
    /// Enemy kind spawned by summons. Empty disables summoning.
    pub minion: String,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            phase2_threshold: 50.0,
            phase3_threshold: 25.0,
            phase2_speed_multiplier: 1.5,
            phase3_speed_multiplier: 2.0,
            phase3_cooldown_multiplier: 0.7,
            phase2_color: (1.0, 0.92, 0.016),
            phase3_color: (1.0, 0.0, 0.0),
            summon_cooldown: 15.0,
            minions_per_summon: 2,
            minion: String::new(),
        }
    }
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: i32,
    pub damage: i32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub weapon_range: f32,
    pub attack_reach: f32,
    pub swing_duration: f32,
    pub swing_hit_fraction: f32,
    pub knockback_force: f32,
    /// How long the player is pushed back after a hit
    pub stun_time: f32,
    pub size: (f32, f32),
    pub color: (f32, f32, f32),
    pub collider_radius: f32,
    #[serde(default)]
    pub loot: LootTable,
    #[serde(default)]
    pub boss: Option<BossConfig>,
}

impl EnemyDefinition {
    /// Convert to EnemyStats component.
    pub fn to_stats(&self) -> EnemyStats {
        EnemyStats {
            move_speed: self.move_speed,
            detection_range: self.detection_range,
            attack_range: self.attack_range,
        }
    }

    /// Melee weapon for this enemy. The player is pushed for `stun_time`
    /// with no lockout afterwards.
    pub fn to_attack(&self) -> MeleeAttack {
        MeleeAttack {
            damage: self.damage,
            weapon_range: self.weapon_range,
            reach: self.attack_reach,
            cooldown: self.attack_cooldown,
            swing_duration: self.swing_duration,
            hit_fraction: self.swing_hit_fraction,
            knockback: Knockback {
                force: self.knockback_force,
                knockback_time: self.stun_time,
                stun_time: 0.0,
            },
        }
    }

    pub fn color(&self) -> Color {
        Color::srgb(self.color.0, self.color.1, self.color.2)
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by kind name.
    pub fn get(&self, kind: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.definitions.contains_key(kind)
    }

    /// Load every `*.ron` file in `dir`, keyed by file stem. Bad files are
    /// logged and skipped.
    pub fn load_dir(dir: &Path) -> Self {
        let mut registry = Self::default();

        let Ok(entries) = fs::read_dir(dir) else {
            warn!("Enemy definitions directory not found: {:?}", dir);
            return registry;
        };

        for entry in entries.flatten() {
            let path = entry.path();

            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }

            let Some(kind) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            match load_ron::<EnemyDefinition>(&path) {
                Ok(definition) => {
                    info!("Loaded enemy definition: {} ({})", definition.name, kind);
                    registry.definitions.insert(kind, definition);
                }
                Err(e) => {
                    error!("{}", e);
                }
            }
        }

        registry
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut commands: Commands) {
    let registry = EnemyRegistry::load_dir(Path::new(ENEMIES_DIR));
    info!("Loaded {} enemy definitions", registry.definitions.len());
    commands.insert_resource(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SKELETON: &str = r#"(
        name: "Skeleton",
        max_health: 3,
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
    )"#;

    #[test]
    fn load_dir_keys_by_stem_and_skips_bad_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut good = fs::File::create(dir.path().join("skeleton.ron")).expect("create");
        good.write_all(SKELETON.as_bytes()).expect("write");
        fs::write(dir.path().join("broken.ron"), "(name: ").expect("write");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let registry = EnemyRegistry::load_dir(dir.path());

        assert_eq!(registry.definitions.len(), 1);
        let skeleton = registry.get("skeleton").expect("skeleton loaded");
        assert_eq!(skeleton.max_health, 3);
        assert!(skeleton.boss.is_none());
        assert_eq!(skeleton.loot.meat_chance, 0.5);
    }

    #[test]
    fn enemy_knockback_has_no_lockout() {
        let definition: EnemyDefinition = ron::from_str(SKELETON).expect("parse");
        let attack = definition.to_attack();
        assert_eq!(attack.knockback.knockback_time, 0.2);
        assert_eq!(attack.knockback.stun_time, 0.0);
    }

    #[test]
    fn boss_section_fills_defaults() {
        let text = SKELETON.replace("collider_radius: 0.35,", "collider_radius: 0.35, boss: Some((minion: \"skeleton\")),");
        let definition: EnemyDefinition = ron::from_str(&text).expect("parse");
        let boss = definition.boss.expect("boss config");
        assert_eq!(boss.minion, "skeleton");
        assert_eq!(boss.minions_per_summon, 2);
        assert_eq!(boss.summon_cooldown, 15.0);
    }
}
