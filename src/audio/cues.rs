//! One-shot sound effects and looping footsteps.

use bevy::prelude::*;

use crate::core::{PickupCollected, PickupKind};

/// A one-shot sound effect request.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SfxCue {
    PlayerAttack,
    EnemyAttack,
    Hit,
    BossSpawn,
    Pickup(PickupKind),
}

impl SfxCue {
    pub fn asset_path(self) -> &'static str {
        match self {
            SfxCue::PlayerAttack => "audio/player_attack.ogg",
            SfxCue::EnemyAttack => "audio/enemy_attack.ogg",
            SfxCue::Hit => "audio/hit.ogg",
            SfxCue::BossSpawn => "audio/boss_spawn.ogg",
            SfxCue::Pickup(PickupKind::Meat) => "audio/pickup_meat.ogg",
            SfxCue::Pickup(PickupKind::Bone) => "audio/pickup_bone.ogg",
        }
    }
}

impl From<&PickupCollected> for SfxCue {
    fn from(event: &PickupCollected) -> Self {
        SfxCue::Pickup(event.kind)
    }
}

/// What a footstep loop should do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopChange {
    Start,
    Stop,
}

/// Start a loop when it becomes wanted, stop it when it no longer is.
pub fn loop_change(playing: bool, wanted: bool) -> Option<LoopChange> {
    match (playing, wanted) {
        (false, true) => Some(LoopChange::Start),
        (true, false) => Some(LoopChange::Stop),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_only_changes_on_edges() {
        assert_eq!(loop_change(false, true), Some(LoopChange::Start));
        assert_eq!(loop_change(true, false), Some(LoopChange::Stop));
        assert_eq!(loop_change(true, true), None);
        assert_eq!(loop_change(false, false), None);
    }

    #[test]
    fn collected_pickup_maps_to_its_cue() {
        let event = PickupCollected {
            kind: PickupKind::Bone,
            position: Vec2::ZERO,
        };
        assert_eq!(SfxCue::from(&event), SfxCue::Pickup(PickupKind::Bone));
    }

    #[test]
    fn each_pickup_has_its_own_sound() {
        assert_ne!(
            SfxCue::Pickup(PickupKind::Meat).asset_path(),
            SfxCue::Pickup(PickupKind::Bone).asset_path()
        );
    }
}
