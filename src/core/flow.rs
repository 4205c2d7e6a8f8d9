//! Pause and end-of-level bookkeeping.
//!
//! `GameFlow` holds the three flags the rest of the game asks about. Every
//! mutator reports whether it actually changed anything so callers only
//! broadcast a [`FlowEvent`] on a real transition.

use bevy::prelude::*;

use super::events::FlowEvent;
use super::states::PlayState;

/// Pause, game-over and victory flags for the current level attempt.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct GameFlow {
    paused: bool,
    game_over: bool,
    victory: bool,
}

impl GameFlow {
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_victory(&self) -> bool {
        self.victory
    }

    pub fn is_ended(&self) -> bool {
        self.game_over || self.victory
    }

    /// Pause gameplay. Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    /// Resume gameplay. Refused once the level has ended.
    pub fn resume(&mut self) -> bool {
        if !self.paused || self.is_ended() {
            return false;
        }
        self.paused = false;
        true
    }

    /// Mark the player as dead. Fires at most once per attempt.
    pub fn set_game_over(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        self.game_over = true;
        self.paused = true;
        true
    }

    /// Mark the level as won. Fires at most once per attempt.
    pub fn set_victory(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        self.victory = true;
        self.paused = true;
        true
    }

    /// Clear all flags (level load, restart, quit to menu).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The play sub-state these flags correspond to.
    pub fn play_state(&self) -> PlayState {
        if self.game_over {
            PlayState::GameOver
        } else if self.victory {
            PlayState::Victory
        } else if self.paused {
            PlayState::Paused
        } else {
            PlayState::Running
        }
    }
}

/// Command-style helpers so systems mutate the flow and announce it in one call.
pub trait FlowControl {
    fn request_pause(&mut self, events: &mut EventWriter<FlowEvent>);
    fn request_resume(&mut self, events: &mut EventWriter<FlowEvent>);
    fn request_game_over(&mut self, events: &mut EventWriter<FlowEvent>);
    fn request_victory(&mut self, events: &mut EventWriter<FlowEvent>);
    fn request_reset(&mut self, events: &mut EventWriter<FlowEvent>);
}

impl FlowControl for GameFlow {
    fn request_pause(&mut self, events: &mut EventWriter<FlowEvent>) {
        if self.pause() {
            events.send(FlowEvent::PauseChanged(true));
        }
    }

    fn request_resume(&mut self, events: &mut EventWriter<FlowEvent>) {
        if self.resume() {
            events.send(FlowEvent::PauseChanged(false));
        }
    }

    fn request_game_over(&mut self, events: &mut EventWriter<FlowEvent>) {
        if self.set_game_over() {
            info!("Player died - game over");
            events.send(FlowEvent::GameOver);
        }
    }

    fn request_victory(&mut self, events: &mut EventWriter<FlowEvent>) {
        if self.set_victory() {
            info!("Level won");
            events.send(FlowEvent::Victory);
        }
    }

    fn request_reset(&mut self, events: &mut EventWriter<FlowEvent>) {
        self.reset();
        info!("GameFlow reset");
        events.send(FlowEvent::Reset);
    }
}

/// Run condition: gameplay systems only tick while nothing is paused or ended.
pub fn gameplay_running(flow: Res<GameFlow>) -> bool {
    !flow.is_paused()
}

/// Keep virtual time and the play sub-state in step with the flow flags.
pub fn sync_flow(
    flow: Res<GameFlow>,
    mut time: ResMut<Time<Virtual>>,
    current: Option<Res<State<PlayState>>>,
    next_state: Option<ResMut<NextState<PlayState>>>,
) {
    if !flow.is_changed() {
        return;
    }

    if flow.is_paused() {
        time.pause();
    } else {
        time.unpause();
    }

    let target = flow.play_state();
    let (Some(current), Some(mut next_state)) = (current, next_state) else {
        return;
    };
    if *current.get() != target {
        next_state.set(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_and_resume_toggle_once() {
        let mut flow = GameFlow::default();
        assert!(flow.pause());
        assert!(!flow.pause());
        assert!(flow.resume());
        assert!(!flow.resume());
        assert_eq!(flow.play_state(), PlayState::Running);
    }

    #[test]
    fn game_over_fires_once_and_pauses() {
        let mut flow = GameFlow::default();
        assert!(flow.set_game_over());
        assert!(!flow.set_game_over());
        assert!(flow.is_paused());
        assert!(flow.is_ended());
        assert_eq!(flow.play_state(), PlayState::GameOver);
    }

    #[test]
    fn victory_after_game_over_is_ignored() {
        let mut flow = GameFlow::default();
        flow.set_game_over();
        assert!(!flow.set_victory());
        assert!(!flow.is_victory());
    }

    #[test]
    fn pause_menu_then_victory_still_ends_once() {
        let mut flow = GameFlow::default();
        flow.pause();
        assert!(flow.set_victory());
        assert!(!flow.set_victory());
        assert_eq!(flow.play_state(), PlayState::Victory);
    }

    #[test]
    fn resume_refused_after_end() {
        let mut flow = GameFlow::default();
        flow.set_victory();
        assert!(!flow.resume());
        assert!(flow.is_paused());
    }

    #[test]
    fn reset_clears_everything() {
        let mut flow = GameFlow::default();
        flow.set_game_over();
        flow.reset();
        assert_eq!(flow, GameFlow::default());
        assert!(!flow.is_ended());
    }
}
