//! Pickups module - meat and bone drops.

mod components;
mod plugin;

pub use components::*;
pub use plugin::{spawn_pickup, PickupPlugin};
