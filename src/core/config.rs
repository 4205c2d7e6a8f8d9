//! Gameplay tuning loaded from an external RON file.
//!
//! Allows tweaking player, pickup, tutorial, boss entrance and camera parameters
//! without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use super::error::load_ron;

const CONFIG_PATH: &str = "assets/data/config/game.ron";

/// Player stats and melee tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    pub speed: f32,
    pub damage: i32,
    /// Radius of the swing's hit circle
    pub weapon_range: f32,
    /// Distance of the attack point in front of the player
    pub attack_reach: f32,
    pub attack_cooldown: f32,
    /// Length of the swing animation
    pub swing_duration: f32,
    /// Fraction of the swing at which damage is dealt (0.0-1.0)
    pub swing_hit_fraction: f32,
    pub knockback_force: f32,
    pub knockback_time: f32,
    pub stun_time: f32,
    pub collider_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 10,
            speed: 5.0,
            damage: 1,
            weapon_range: 1.0,
            attack_reach: 0.6,
            attack_cooldown: 1.0,
            swing_duration: 0.35,
            swing_hit_fraction: 0.5,
            knockback_force: 20.0,
            knockback_time: 0.2,
            stun_time: 0.3,
            collider_radius: 0.35,
        }
    }
}

/// Pickup effects and trigger size.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub meat_heal: i32,
    pub bone_damage_boost: i32,
    pub bone_speed_boost: f32,
    pub trigger_radius: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            meat_heal: 1,
            bone_damage_boost: 1,
            bone_speed_boost: 0.5,
            trigger_radius: 0.3,
        }
    }
}

/// Level-start tutorial overlay timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TutorialTuning {
    pub display_duration: f32,
    pub fade_duration: f32,
    /// Any key skips the tutorial
    pub allow_skip: bool,
    /// Escape skips the tutorial instead of pausing
    pub block_pause: bool,
    /// Only show on the first playthrough
    pub show_only_once: bool,
}

impl Default for TutorialTuning {
    fn default() -> Self {
        Self {
            display_duration: 5.0,
            fade_duration: 1.0,
            allow_skip: true,
            block_pause: true,
            show_only_once: true,
        }
    }
}

/// Boss entrance and boss defeat timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BossEntranceTuning {
    /// Camera pan before the boss appears
    pub focus_delay: f32,
    /// How long the camera stays on the boss
    pub entrance_duration: f32,
    /// Delay between boss death and the victory panel
    pub victory_delay: f32,
}

impl Default for BossEntranceTuning {
    fn default() -> Self {
        Self {
            focus_delay: 0.5,
            entrance_duration: 3.0,
            victory_delay: 1.0,
        }
    }
}

/// Camera and draw-order settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewTuning {
    /// Screen pixels per world unit
    pub pixels_per_unit: f32,
    /// Camera follow interpolation speed (higher = snappier)
    pub follow_speed: f32,
    /// z of a sprite whose feet sit at y = 0
    pub sort_base_z: f32,
    /// z lost per world unit of height
    pub sort_y_factor: f32,
    pub clear_color: (f32, f32, f32),
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            pixels_per_unit: 48.0,
            follow_speed: 8.0,
            sort_base_z: 10.0,
            sort_y_factor: 0.01,
            clear_color: (0.09, 0.08, 0.1),
        }
    }
}

/// All tuning sections, inserted as a resource at startup.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerTuning,
    pub pickups: PickupTuning,
    pub tutorial: TutorialTuning,
    pub boss_entrance: BossEntranceTuning,
    pub view: ViewTuning,
}

impl GameConfig {
    /// Load the config, falling back to defaults on any error.
    pub fn load() -> Self {
        match load_ron::<GameConfig>(Path::new(CONFIG_PATH)) {
            Ok(config) => {
                info!("Loaded game config from {}", CONFIG_PATH);
                config
            }
            Err(e) => {
                warn!("{}. Using default game config.", e);
                Self::default()
            }
        }
    }
}

/// System to load the game config at startup.
pub fn load_game_config(mut commands: Commands) {
    commands.insert_resource(GameConfig::load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let config: GameConfig = ron::from_str("(player: (speed: 7.5))").expect("parse");
        assert_eq!(config.player.speed, 7.5);
        assert_eq!(config.player.max_health, 10);
        assert_eq!(config.pickups.meat_heal, 1);
        assert_eq!(config.tutorial.display_duration, 5.0);
        assert_eq!(config.boss_entrance.focus_delay, 0.5);
    }
}
