//! Global events used for cross-system communication.
//!
//! Events allow decoupled systems to communicate. For example, the combat
//! system sends DamageEvents, and the health system receives them to
//! apply damage. This keeps systems independent and testable.

use bevy::prelude::*;

/// Knockback carried by a hit: impulse, slide time and control lockout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knockback {
    /// Impulse magnitude in units per second
    pub force: f32,
    /// How long the impulse keeps sliding the target
    pub knockback_time: f32,
    /// Lockout after the slide stops
    pub stun_time: f32,
}

/// Sent when an entity takes damage.
///
/// The damage system listens for these events and applies the actual
/// health reduction.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    /// Health points removed
    pub amount: i32,
    /// Where the hit came from (knockback pushes away from here)
    pub origin: Vec2,
    /// Optional knockback applied on a non-lethal hit
    pub knockback: Option<Knockback>,
}

/// Sent when an entity dies (health reaches 0).
///
/// Sent exactly once per entity; the `Dead` marker guards repeats.
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
}

/// Pause and end-of-level notifications from [`GameFlow`](super::GameFlow).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    /// Parameter: is the game now paused
    PauseChanged(bool),
    GameOver,
    Victory,
    /// Fired on level load, restart and quit to menu
    Reset,
}

/// Sent when the last regular enemy of a level dies.
#[derive(Event, Debug, Clone, Copy)]
pub struct AllEnemiesCleared;

/// Sent when a boss dies.
#[derive(Event, Debug, Clone, Copy)]
pub struct BossDefeated {
    pub boss: Entity,
}

/// Kind of pickup collected, for sound and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Meat,
    Bone,
}

/// Sent when the player collects a pickup.
#[derive(Event, Debug, Clone, Copy)]
pub struct PickupCollected {
    pub kind: PickupKind,
    pub position: Vec2,
}
