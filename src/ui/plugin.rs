//! UI plugin - menus, HUD, and interface elements.

use bevy::prelude::*;

use super::health_bars::setup_health_bar_systems;
use super::hud::setup_hud_systems;
use super::menus::*;
use super::tutorial::setup_tutorial_systems;
use super::widgets::{button_feedback, despawn_all};
use crate::core::{GameState, PlayState};

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        setup_hud_systems(app);
        setup_health_bar_systems(app);
        setup_tutorial_systems(app);

        app.add_systems(Update, button_feedback)
            // Main menu and help page
            .add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(Update, main_menu_input.run_if(in_state(GameState::MainMenu)))
            .add_systems(
                OnExit(GameState::MainMenu),
                (despawn_all::<MainMenuUi>, despawn_all::<HelpUi>),
            )
            // Level select
            .add_systems(OnEnter(GameState::LevelSelect), setup_level_select)
            .add_systems(Update, level_select_input.run_if(in_state(GameState::LevelSelect)))
            .add_systems(OnExit(GameState::LevelSelect), despawn_all::<LevelSelectUi>)
            // Pause, game over and victory panels
            .add_systems(OnEnter(PlayState::Paused), setup_pause_panel)
            .add_systems(OnEnter(PlayState::GameOver), setup_game_over_panel)
            .add_systems(OnEnter(PlayState::Victory), setup_victory_panel)
            .add_systems(OnExit(PlayState::Paused), despawn_all::<PlayPanelUi>)
            .add_systems(OnExit(PlayState::GameOver), despawn_all::<PlayPanelUi>)
            .add_systems(OnExit(PlayState::Victory), despawn_all::<PlayPanelUi>)
            .add_systems(Update, play_panel_input.run_if(in_state(GameState::InGame)));
    }
}
