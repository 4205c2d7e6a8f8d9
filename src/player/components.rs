//! Player-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Player movement stats. Bone pickups raise `move_speed` for the level.
#[derive(Component, Debug, Clone)]
pub struct PlayerStats {
    pub move_speed: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self { move_speed: 5.0 }
    }
}

/// Whether the player moved this frame. Drives the footstep loop.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Walking(pub bool);
