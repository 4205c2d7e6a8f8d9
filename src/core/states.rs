//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! player movement only runs while `PlayState::Running`, while menu systems
//! only run in the MainMenu state.

use bevy::prelude::*;

/// Main game states - controls which screen is active.
///
/// The game transitions between these states based on player actions:
/// - Start in `Loading` to load data files
/// - Move to `MainMenu` when loading completes
/// - `LevelSelect` lists levels and their lock state
/// - `LoadingLevel` is a one-frame hop so a restart re-runs level setup
/// - `InGame` while a level is being played
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Title screen
    MainMenu,
    /// Level selection screen
    LevelSelect,
    /// Tearing down the previous level before building the next
    LoadingLevel,
    /// Active gameplay
    InGame,
}

/// Sub-states for gameplay - only active when GameState::InGame.
///
/// Mirrored from [`GameFlow`](super::GameFlow) so panels can use
/// `OnEnter`/`OnExit` schedules:
/// - `Running`: Normal movement, combat, and AI
/// - `Paused`: Pause panel open, virtual time stopped
/// - `GameOver`: Player died
/// - `Victory`: Boss defeated
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    #[default]
    Running,
    Paused,
    GameOver,
    Victory,
}
