//! Menu screens and the in-level pause, game over and victory panels.

use bevy::prelude::*;

use super::widgets::{panel_node, spawn_label, spawn_locked_button, spawn_menu_button, spawn_title, LockedButton};
use crate::core::{FlowControl, FlowEvent, GameFlow, GameState};
use crate::progress::GameProgress;
use crate::world::{CurrentLevel, LevelRegistry};

const MENU_BACKGROUND: Color = Color::srgb(0.05, 0.05, 0.08);
const TITLE_COLOR: Color = Color::srgb(0.85, 0.8, 0.7);
const CLOSING_MESSAGE: &str = "The Boneyard is quiet at last.\nThanks for playing!";

/// Title page of the main menu.
#[derive(Component)]
pub struct MainMenuUi;

/// Help page of the main menu.
#[derive(Component)]
pub struct HelpUi;

#[derive(Component)]
pub struct LevelSelectUi;

/// Pause, game over and victory panels.
#[derive(Component)]
pub struct PlayPanelUi;

/// What a menu button does.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub enum MenuButton {
    Play,
    Help,
    Back,
    Quit,
    SelectLevel(String),
    ResetProgress,
    Resume,
    Restart,
    MainMenu,
    NextLevel,
}

/// Buttons pressed this frame, skipping locked ones.
type PressedButtons<'w, 's> = Query<
    'w,
    's,
    (&'static Interaction, &'static MenuButton),
    (Changed<Interaction>, With<Button>, Without<LockedButton>),
>;

fn pressed<'a>(query: &'a PressedButtons) -> Vec<&'a MenuButton> {
    query
        .iter()
        .filter(|(interaction, _)| **interaction == Interaction::Pressed)
        .map(|(_, button)| button)
        .collect()
}

/// Set up the main menu with its hidden help page.
pub fn setup_main_menu(mut commands: Commands) {
    commands
        .spawn((panel_node(), BackgroundColor(MENU_BACKGROUND), MainMenuUi))
        .with_children(|parent| {
            spawn_title(parent, "BONEYARD", 80.0, TITLE_COLOR);
            spawn_menu_button(parent, "Play", MenuButton::Play);
            spawn_menu_button(parent, "Help", MenuButton::Help);
            spawn_menu_button(parent, "Quit", MenuButton::Quit);
        });

    commands
        .spawn((
            panel_node(),
            BackgroundColor(MENU_BACKGROUND),
            Visibility::Hidden,
            HelpUi,
        ))
        .with_children(|parent| {
            spawn_title(parent, "HOW TO PLAY", 48.0, TITLE_COLOR);
            spawn_label(parent, "WASD - move", 22.0);
            spawn_label(parent, "Left click - attack", 22.0);
            spawn_label(parent, "Escape - pause", 22.0);
            spawn_label(parent, "Defeat every skeleton to call out the boss.", 22.0);
            spawn_label(parent, "Meat heals. Bones make you stronger.", 22.0);
            spawn_menu_button(parent, "Back", MenuButton::Back);
        });
}

/// Handle main menu button interactions.
pub fn main_menu_input(
    buttons: PressedButtons,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
    mut title_query: Query<&mut Visibility, (With<MainMenuUi>, Without<HelpUi>)>,
    mut help_query: Query<&mut Visibility, (With<HelpUi>, Without<MainMenuUi>)>,
) {
    for button in pressed(&buttons) {
        let show_help = match button {
            MenuButton::Play => {
                next_state.set(GameState::LevelSelect);
                continue;
            }
            MenuButton::Quit => {
                exit.send(AppExit::Success);
                continue;
            }
            MenuButton::Help => true,
            MenuButton::Back => false,
            _ => continue,
        };

        let (title, help) = if show_help {
            (Visibility::Hidden, Visibility::Inherited)
        } else {
            (Visibility::Inherited, Visibility::Hidden)
        };
        for mut visibility in title_query.iter_mut() {
            *visibility = title;
        }
        for mut visibility in help_query.iter_mut() {
            *visibility = help;
        }
    }
}

pub fn setup_level_select(mut commands: Commands, progress: Res<GameProgress>, levels: Res<LevelRegistry>) {
    spawn_level_select(&mut commands, &progress, &levels);
}

fn spawn_level_select(commands: &mut Commands, progress: &GameProgress, levels: &LevelRegistry) {
    let order = &levels.order;
    let completed = order.iter().filter(|key| progress.is_level_completed(key)).count();

    commands
        .spawn((panel_node(), BackgroundColor(MENU_BACKGROUND), LevelSelectUi))
        .with_children(|parent| {
            spawn_title(parent, "SELECT LEVEL", 48.0, TITLE_COLOR);

            for key in order {
                let name = levels.get(key).map_or(key.as_str(), |level| level.name.as_str());
                let action = MenuButton::SelectLevel(key.clone());

                if !progress.is_level_unlocked(key, order) {
                    spawn_locked_button(parent, &format!("{name} (Locked)"), action);
                } else if progress.is_level_completed(key) {
                    spawn_menu_button(parent, &format!("{name} (Completed)"), action);
                } else {
                    spawn_menu_button(parent, name, action);
                }
            }

            spawn_label(
                parent,
                &format!("Progress: {}/{} Levels Completed", completed, order.len()),
                20.0,
            );
            spawn_menu_button(parent, "Reset Progress", MenuButton::ResetProgress);
            spawn_menu_button(parent, "Back", MenuButton::Back);
        });
}

/// Handle level select button interactions.
pub fn level_select_input(
    mut commands: Commands,
    buttons: PressedButtons,
    mut progress: ResMut<GameProgress>,
    levels: Res<LevelRegistry>,
    mut current: ResMut<CurrentLevel>,
    mut next_state: ResMut<NextState<GameState>>,
    ui_query: Query<Entity, With<LevelSelectUi>>,
) {
    for button in pressed(&buttons) {
        match button {
            MenuButton::SelectLevel(key) => {
                info!("Starting level {}", key);
                current.key = key.clone();
                next_state.set(GameState::LoadingLevel);
            }
            MenuButton::ResetProgress => {
                progress.reset_all();
                for entity in ui_query.iter() {
                    commands.entity(entity).despawn_recursive();
                }
                spawn_level_select(&mut commands, &progress, &levels);
            }
            MenuButton::Back => next_state.set(GameState::MainMenu),
            _ => {}
        }
    }
}

fn spawn_play_panel(commands: &mut Commands, background: Color, build: impl FnOnce(&mut ChildBuilder)) {
    commands
        .spawn((panel_node(), BackgroundColor(background), GlobalZIndex(10), PlayPanelUi))
        .with_children(build);
}

/// Set up the pause menu.
pub fn setup_pause_panel(mut commands: Commands) {
    spawn_play_panel(&mut commands, Color::srgba(0.0, 0.0, 0.0, 0.7), |parent| {
        spawn_title(parent, "PAUSED", 48.0, TITLE_COLOR);
        spawn_menu_button(parent, "Resume", MenuButton::Resume);
        spawn_menu_button(parent, "Restart", MenuButton::Restart);
        spawn_menu_button(parent, "Main Menu", MenuButton::MainMenu);
    });
}

/// Set up the game over screen.
pub fn setup_game_over_panel(mut commands: Commands) {
    spawn_play_panel(&mut commands, Color::srgba(0.1, 0.0, 0.0, 0.9), |parent| {
        spawn_title(parent, "YOU DIED", 72.0, Color::srgb(0.8, 0.2, 0.2));
        spawn_menu_button(parent, "Restart", MenuButton::Restart);
        spawn_menu_button(parent, "Main Menu", MenuButton::MainMenu);
    });
}

/// Victory panel. The last level gets the closing panel and is marked
/// complete right away, since there is no Next Level button to do it.
pub fn setup_victory_panel(
    mut commands: Commands,
    mut progress: ResMut<GameProgress>,
    levels: Res<LevelRegistry>,
    current: Res<CurrentLevel>,
) {
    let background = Color::srgba(0.0, 0.05, 0.0, 0.85);

    if progress.next_level(&current.key, &levels.order).is_some() {
        spawn_play_panel(&mut commands, background, |parent| {
            spawn_title(parent, "LEVEL COMPLETE", 64.0, Color::srgb(0.9, 0.8, 0.3));
            spawn_menu_button(parent, "Next Level", MenuButton::NextLevel);
            spawn_menu_button(parent, "Main Menu", MenuButton::MainMenu);
        });
        return;
    }

    progress.mark_level_complete(&current.key);
    spawn_play_panel(&mut commands, background, |parent| {
        spawn_title(parent, "VICTORY!", 72.0, Color::srgb(0.9, 0.8, 0.3));
        spawn_label(parent, CLOSING_MESSAGE, 24.0);
        spawn_menu_button(parent, "Main Menu", MenuButton::MainMenu);
    });
}

/// Buttons on the pause, game over and victory panels.
pub fn play_panel_input(
    buttons: PressedButtons,
    mut flow: ResMut<GameFlow>,
    mut flow_events: EventWriter<FlowEvent>,
    mut progress: ResMut<GameProgress>,
    levels: Res<LevelRegistry>,
    mut current: ResMut<CurrentLevel>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for button in pressed(&buttons) {
        match button {
            MenuButton::Resume => flow.request_resume(&mut flow_events),
            MenuButton::Restart => next_state.set(GameState::LoadingLevel),
            MenuButton::MainMenu => next_state.set(GameState::MainMenu),
            MenuButton::NextLevel => {
                progress.mark_level_complete(&current.key);
                let Some(next) = progress.next_level(&current.key, &levels.order) else {
                    warn!("No level after '{}'", current.key);
                    continue;
                };
                current.key = next.to_string();
                next_state.set(GameState::LoadingLevel);
            }
            _ => {}
        }
    }
}
