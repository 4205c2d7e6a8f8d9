//! World plugin - level loading, setup, teardown and the boss sequence.

use bevy::prelude::*;

use super::data::{load_level_definitions, CurrentLevel, LevelRegistry};
use super::entrance::{
    begin_boss_entrance, handle_boss_defeated, run_boss_entrance, tick_victory_countdown, BossEntrance,
    VictoryCountdown,
};
use super::spawning::{spawn_level_enemies, spawn_level_pickups, spawn_tiles};
use super::LevelEntity;
use crate::audio::{MusicDirector, MusicTrack};
use crate::combat::CombatSet;
use crate::core::{gameplay_running, AllEnemiesCleared, GameConfig, GameState, PlayState};
use crate::enemies::{EnemyRegistry, EnemyRoster};
use crate::player::{spawn_player, Player};
use crate::rendering::CameraFocus;

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelRegistry>()
            .init_resource::<CurrentLevel>()
            .init_resource::<BossEntrance>()
            .init_resource::<VictoryCountdown>()
            .add_systems(Startup, load_level_definitions)
            // Enemy definitions load at Startup too, so validate after both
            .add_systems(PostStartup, validate_levels)
            .add_systems(
                OnEnter(GameState::InGame),
                (reset_level_state, setup_level).chain(),
            )
            .add_systems(OnExit(GameState::InGame), cleanup_level)
            .add_systems(
                Update,
                (
                    begin_boss_entrance,
                    run_boss_entrance,
                    handle_boss_defeated,
                    tick_victory_countdown,
                )
                    .chain()
                    .after(CombatSet::Reaction)
                    .before(CombatSet::Feedback)
                    .run_if(in_state(PlayState::Running))
                    .run_if(gameplay_running),
            );
    }
}

/// Log configuration problems once at startup.
fn validate_levels(levels: Res<LevelRegistry>, enemies: Res<EnemyRegistry>) {
    if levels.order.is_empty() {
        warn!("No levels found! Add Level<N>.ron files to assets/data/levels");
        return;
    }

    for key in &levels.order {
        let Some(level) = levels.get(key) else {
            continue;
        };

        match level.boss.as_deref() {
            None => warn!("Level '{}' has no boss; it can never be won", key),
            Some(kind) if !enemies.contains(kind) => {
                warn!("Level '{}' uses unknown boss kind '{}'", key, kind)
            }
            Some(_) => {}
        }
        if level.boss.is_some() && level.boss_spawn.is_none() {
            warn!("Level '{}' has a boss but no 'X' spawn point", key);
        }

        for spawn in &level.enemies {
            if !enemies.contains(&spawn.kind) {
                warn!("Level '{}' uses unknown enemy kind '{}'", key, spawn.kind);
            }
        }
    }

    info!("Level progression: {} level(s) validated", levels.order.len());
}

/// Fresh roster, entrance and music for a new level attempt.
fn reset_level_state(
    mut roster: ResMut<EnemyRoster>,
    mut entrance: ResMut<BossEntrance>,
    mut countdown: ResMut<VictoryCountdown>,
    mut focus: ResMut<CameraFocus>,
    mut music: ResMut<MusicDirector>,
) {
    roster.begin_level();
    entrance.cancel();
    countdown.0 = None;
    focus.target = None;
    music.play(MusicTrack::Normal);
}

/// Set up the level from data.
pub fn setup_level(
    mut commands: Commands,
    config: Res<GameConfig>,
    levels: Res<LevelRegistry>,
    current: Res<CurrentLevel>,
    enemies: Res<EnemyRegistry>,
    mut roster: ResMut<EnemyRoster>,
    mut cleared: EventWriter<AllEnemiesCleared>,
) {
    let Some(level) = levels.get(&current.key) else {
        error!("Level '{}' not found in registry!", current.key);
        return;
    };

    info!("Building level: {} ({})", current.key, level.name);

    spawn_tiles(&mut commands, level);
    spawn_level_pickups(&mut commands, level, &config.pickups);
    let spawned = spawn_level_enemies(&mut commands, level, &enemies);

    let (x, y) = level.player_spawn;
    spawn_player(&mut commands, level.grid_to_world(x, y), &config.player);

    // Nothing to clear: go straight to the boss
    if spawned == 0 && roster.try_trigger_boss() {
        cleared.send(AllEnemiesCleared);
    }
}

/// Clean up level entities when leaving the InGame state.
fn cleanup_level(
    mut commands: Commands,
    mut roster: ResMut<EnemyRoster>,
    mut entrance: ResMut<BossEntrance>,
    mut focus: ResMut<CameraFocus>,
    level_query: Query<Entity, Or<(With<LevelEntity>, With<Player>)>>,
) {
    roster.stop_tracking();
    entrance.cancel();
    focus.target = None;

    for entity in level_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
