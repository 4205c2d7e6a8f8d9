//! World module - levels, level setup and the boss entrance.

mod data;
mod entrance;
mod plugin;
mod spawning;

use bevy::prelude::*;

pub use data::{detect_level_order, CurrentLevel, LevelDefinition, LevelRegistry};
pub use entrance::{BossEntrance, VictoryCountdown};
pub use plugin::WorldPlugin;

/// Marker for everything that belongs to the running level and is despawned
/// with it.
#[derive(Component)]
pub struct LevelEntity;
