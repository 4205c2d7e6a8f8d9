//! Boneyard - a top-down 2D action game in Bevy.
//!
//! The player clears each level of skeletons, which calls in the level's boss.
//! Beating the boss completes the level and unlocks the next one.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Screen states, the pause/end flow, global events, tuning config
//! - **Player**: Top-down movement, facing, knockback lockout
//! - **Combat**: Health, melee swings, damage and knockback resolution
//! - **Enemies**: AI state machine, boss phases, roster, loot
//! - **Pickups**: Meat (healing) and bones (stat boosts)
//! - **Progress**: Level unlocks persisted in a preference store
//! - **World**: Level data, spawning, boss entrance
//! - **Audio**: Music and sound effect channels
//! - **Rendering**: Camera follow and y-sorting
//! - **UI**: Menus, HUD, health bars, tutorial

pub mod audio;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod pickups;
pub mod player;
pub mod progress;
pub mod rendering;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct BoneyardPlugin;

impl Plugin for BoneyardPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Persistent progress (before UI reads it)
            .add_plugins(progress::ProgressPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // Pickups
            .add_plugins(pickups::PickupPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Audio
            .add_plugins(audio::GameAudioPlugin)

            // Rendering systems
            .add_plugins(rendering::RenderingPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
