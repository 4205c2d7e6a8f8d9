//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::config::load_game_config;
use super::events::*;
use super::flow::{sync_flow, FlowControl, GameFlow};
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, etc.)
/// - The `GameFlow` pause/end resource
/// - Global events (DamageEvent, DeathEvent, FlowEvent, etc.)
/// - Basic game flow systems
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            .init_resource::<GameFlow>()
            .init_resource::<PauseLock>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<FlowEvent>()
            .add_event::<AllEnemiesCleared>()
            .add_event::<BossDefeated>()
            .add_event::<PickupCollected>()

            // Tuning must exist before any Startup system reads it
            .add_systems(PreStartup, load_game_config)

            // Data files are loaded synchronously at Startup, so leave Loading
            // on the first frame
            .add_systems(OnEnter(GameState::Loading), transition_to_main_menu)

            // Every level load starts from a clean flow
            .add_systems(OnEnter(GameState::LoadingLevel), begin_level)
            .add_systems(OnEnter(GameState::MainMenu), reset_flow)

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame)),
            )

            .add_systems(PostUpdate, sync_flow);
    }
}

/// Set while something else owns the Escape key (e.g. the tutorial overlay).
#[derive(Resource, Default, Debug)]
pub struct PauseLock {
    pub blocked: bool,
}

/// Immediately transition from Loading to MainMenu.
fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Reset the flow and continue into the level.
fn begin_level(
    mut flow: ResMut<GameFlow>,
    mut flow_events: EventWriter<FlowEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    flow.request_reset(&mut flow_events);
    next_state.set(GameState::InGame);
}

fn reset_flow(mut flow: ResMut<GameFlow>, mut flow_events: EventWriter<FlowEvent>) {
    if *flow != GameFlow::default() {
        flow.request_reset(&mut flow_events);
    }
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    lock: Res<PauseLock>,
    mut flow: ResMut<GameFlow>,
    mut flow_events: EventWriter<FlowEvent>,
) {
    if lock.blocked || flow.is_ended() || !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }

    if flow.is_paused() {
        flow.request_resume(&mut flow_events);
    } else {
        flow.request_pause(&mut flow_events);
    }
}
