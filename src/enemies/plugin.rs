//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::animation;
use super::boss;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::roster::{on_member_added, on_member_removed, EnemyRoster};
use crate::combat::CombatSet;

/// Enemy plugin - handles enemy AI, bosses, deaths and the roster.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .init_resource::<EnemyRoster>()
            .add_observer(on_member_added)
            .add_observer(on_member_removed)
            // Definitions are needed by level validation at startup
            .add_systems(Startup, load_enemy_definitions)
            // AI reacts after this frame's hits and deaths are resolved
            .add_systems(
                Update,
                (
                    ai::enemy_hit_reaction,
                    ai::enemy_stun_over,
                    ai::enemy_attack_finished,
                    ai::enemy_perception,
                    ai::chase_player,
                    boss::update_boss_phases,
                    ai::handle_enemy_deaths,
                )
                    .chain()
                    .in_set(CombatSet::Reaction),
            )
            .add_systems(Update, animation::animate_enemies.in_set(CombatSet::Feedback));
    }
}
