//! Enemy-related components.

use bevy::prelude::*;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy kind identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyKind(pub String);

/// Marker for the level boss. Bosses never join the roster.
#[derive(Component)]
pub struct Boss;

/// AI state machine for enemy behavior. Death is owned by `Health`.
#[derive(Component, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum EnemyState {
    /// Standing still, waiting for player to enter detection range.
    #[default]
    Idle,
    /// Moving toward the player.
    Chasing,
    /// Performing an attack swing.
    Attacking,
    /// Sliding and stunned after a hit.
    Knockback,
}

impl EnemyState {
    /// Animation flag that is on while in this state.
    pub fn anim_flag(self) -> AnimFlag {
        match self {
            Self::Idle => AnimFlag::Idle,
            Self::Chasing => AnimFlag::Chasing,
            Self::Attacking => AnimFlag::Attacking,
            Self::Knockback => AnimFlag::Knockback,
        }
    }
}

/// One animator boolean per AI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimFlag {
    Idle,
    Chasing,
    Attacking,
    Knockback,
}

/// Animator booleans, toggled in pairs by AI transitions.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFlags {
    pub idle: bool,
    pub chasing: bool,
    pub attacking: bool,
    pub knockback: bool,
}

impl Default for AnimationFlags {
    fn default() -> Self {
        Self {
            idle: true,
            chasing: false,
            attacking: false,
            knockback: false,
        }
    }
}

impl AnimationFlags {
    pub fn set(&mut self, flag: AnimFlag, on: bool) {
        match flag {
            AnimFlag::Idle => self.idle = on,
            AnimFlag::Chasing => self.chasing = on,
            AnimFlag::Attacking => self.attacking = on,
            AnimFlag::Knockback => self.knockback = on,
        }
    }

    pub fn get(&self, flag: AnimFlag) -> bool {
        match flag {
            AnimFlag::Idle => self.idle,
            AnimFlag::Chasing => self.chasing,
            AnimFlag::Attacking => self.attacking,
            AnimFlag::Knockback => self.knockback,
        }
    }
}

/// Enemy movement and perception stats loaded from RON data files.
#[derive(Component, Clone, Debug)]
pub struct EnemyStats {
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            detection_range: 5.0,
            attack_range: 1.0,
        }
    }
}

/// Base sprite colour. Boss phases overwrite it.
#[derive(Component, Clone, Copy, Debug)]
pub struct BodyTint(pub Color);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_start_idle() {
        let flags = AnimationFlags::default();
        assert!(flags.get(AnimFlag::Idle));
        assert!(!flags.get(AnimFlag::Chasing));
    }

    #[test]
    fn every_state_has_its_own_flag() {
        let states = [
            EnemyState::Idle,
            EnemyState::Chasing,
            EnemyState::Attacking,
            EnemyState::Knockback,
        ];
        for state in states {
            let mut flags = AnimationFlags {
                idle: false,
                chasing: false,
                attacking: false,
                knockback: false,
            };
            flags.set(state.anim_flag(), true);
            assert!(flags.get(state.anim_flag()));
        }
    }
}
