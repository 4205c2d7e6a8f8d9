//! Enemies module - enemy entities, AI, bosses and the roster.

pub mod ai;
mod animation;
pub mod boss;
mod components;
pub mod data;
pub mod loot;
mod plugin;
pub mod roster;
mod spawning;

pub use boss::BossPhases;
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use plugin::EnemyPlugin;
pub use roster::{EnemyRoster, RosterMember};
pub use spawning::{spawn_enemy, SpawnRole};
