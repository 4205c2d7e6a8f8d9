//! Boss entrance after the last regular enemy dies, and the victory that
//! follows the boss's death.

use bevy::prelude::*;

use super::data::{CurrentLevel, LevelRegistry};
use super::spawning::spawn_level_boss;
use crate::audio::{MusicDirector, MusicTrack, SfxCue};
use crate::core::{AllEnemiesCleared, BossDefeated, FlowControl, FlowEvent, GameConfig, GameFlow};
use crate::enemies::EnemyRegistry;
use crate::rendering::CameraFocus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum EntrancePhase {
    #[default]
    Idle,
    /// Camera travelling to the spawn point
    Focusing,
    /// Boss on screen, camera held
    Holding,
}

/// Step reached by [`BossEntrance::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntranceStep {
    SpawnBoss,
    Finished,
}

/// Entrance sequence: focus delay, spawn, hold, camera back.
#[derive(Resource, Debug, Default)]
pub struct BossEntrance {
    phase: EntrancePhase,
    remaining: f32,
    hold: f32,
}

impl BossEntrance {
    /// Begin the sequence. Returns false if one is already running.
    pub fn start(&mut self, focus_delay: f32, hold: f32) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = EntrancePhase::Focusing;
        self.remaining = focus_delay.max(0.0);
        self.hold = hold.max(0.0);
        true
    }

    pub fn is_active(&self) -> bool {
        self.phase != EntrancePhase::Idle
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn advance(&mut self, delta: f32) -> Option<EntranceStep> {
        match self.phase {
            EntrancePhase::Idle => None,
            EntrancePhase::Focusing => {
                self.remaining -= delta;
                if self.remaining > 0.0 {
                    return None;
                }
                self.phase = EntrancePhase::Holding;
                self.remaining = self.hold;
                Some(EntranceStep::SpawnBoss)
            }
            EntrancePhase::Holding => {
                self.remaining -= delta;
                if self.remaining > 0.0 {
                    return None;
                }
                self.phase = EntrancePhase::Idle;
                Some(EntranceStep::Finished)
            }
        }
    }
}

/// Delay between the boss's death and the victory panel.
#[derive(Resource, Debug, Default)]
pub struct VictoryCountdown(pub Option<Timer>);

/// Start the entrance when the roster empties.
pub fn begin_boss_entrance(
    mut cleared_events: EventReader<AllEnemiesCleared>,
    mut entrance: ResMut<BossEntrance>,
    mut focus: ResMut<CameraFocus>,
    config: Res<GameConfig>,
    levels: Res<LevelRegistry>,
    current: Res<CurrentLevel>,
) {
    if cleared_events.read().last().is_none() {
        return;
    }

    let tuning = &config.boss_entrance;
    if !entrance.start(tuning.focus_delay, tuning.entrance_duration) {
        return;
    }
    info!("All enemies defeated! Boss entrance starting...");

    let Some(level) = levels.get(&current.key) else {
        return;
    };
    if let Some((x, y)) = level.boss_spawn {
        focus.target = Some(level.grid_to_world(x, y));
        info!("Camera focusing on boss spawn point...");
    }
}

/// Drive the entrance sequence.
pub fn run_boss_entrance(
    mut commands: Commands,
    time: Res<Time>,
    mut entrance: ResMut<BossEntrance>,
    mut focus: ResMut<CameraFocus>,
    mut music: ResMut<MusicDirector>,
    mut sfx: EventWriter<SfxCue>,
    levels: Res<LevelRegistry>,
    current: Res<CurrentLevel>,
    enemies: Res<EnemyRegistry>,
) {
    match entrance.advance(time.delta_secs()) {
        None => {}
        Some(EntranceStep::SpawnBoss) => {
            let Some(level) = levels.get(&current.key) else {
                return;
            };
            if spawn_level_boss(&mut commands, level, &enemies).is_some() {
                sfx.send(SfxCue::BossSpawn);
            }
            music.play(MusicTrack::Boss);
        }
        Some(EntranceStep::Finished) => {
            focus.target = None;
            info!("Boss entrance complete. Fight begins!");
        }
    }
}

/// Boss death: back to normal music and start the victory delay.
pub fn handle_boss_defeated(
    mut boss_events: EventReader<BossDefeated>,
    mut music: ResMut<MusicDirector>,
    mut countdown: ResMut<VictoryCountdown>,
    config: Res<GameConfig>,
) {
    if boss_events.read().last().is_none() {
        return;
    }

    music.play(MusicTrack::Normal);
    if countdown.0.is_none() {
        countdown.0 = Some(Timer::from_seconds(
            config.boss_entrance.victory_delay.max(0.0),
            TimerMode::Once,
        ));
    }
}

/// Declare victory once the delay runs out.
pub fn tick_victory_countdown(
    time: Res<Time>,
    mut countdown: ResMut<VictoryCountdown>,
    mut flow: ResMut<GameFlow>,
    mut flow_events: EventWriter<FlowEvent>,
) {
    let Some(timer) = countdown.0.as_mut() else {
        return;
    };

    if timer.tick(time.delta()).finished() {
        countdown.0 = None;
        flow.request_victory(&mut flow_events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrance_spawns_after_focus_then_finishes_after_hold() {
        let mut entrance = BossEntrance::default();
        assert!(entrance.start(0.5, 3.0));
        assert_eq!(entrance.advance(0.3), None);
        assert_eq!(entrance.advance(0.3), Some(EntranceStep::SpawnBoss));
        assert_eq!(entrance.advance(2.0), None);
        assert!(entrance.is_active());
        assert_eq!(entrance.advance(1.5), Some(EntranceStep::Finished));
        assert!(!entrance.is_active());
        assert_eq!(entrance.advance(10.0), None);
    }

    #[test]
    fn entrance_cannot_restart_while_running() {
        let mut entrance = BossEntrance::default();
        assert!(entrance.start(0.5, 3.0));
        assert!(!entrance.start(0.5, 3.0));
        entrance.cancel();
        assert!(entrance.start(0.5, 3.0));
    }
}
