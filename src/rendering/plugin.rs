//! Rendering plugin - camera setup, follow and y-sorting.

use bevy::prelude::*;
use bevy::transform::TransformSystem;
use bevy_rapier2d::prelude::PhysicsSet;

use super::camera::{camera_follow, spawn_camera, CameraFocus};
use super::ysort::apply_ysort;
use crate::core::{GameConfig, GameState};

/// Rendering plugin - configures the 2D view.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraFocus>()
            .add_systems(Startup, (apply_clear_color, spawn_camera))
            .add_systems(Update, camera_follow.run_if(in_state(GameState::InGame)))
            .add_systems(
                PostUpdate,
                apply_ysort
                    .after(PhysicsSet::Writeback)
                    .before(TransformSystem::TransformPropagate),
            );
    }
}

fn apply_clear_color(mut commands: Commands, config: Res<GameConfig>) {
    let (r, g, b) = config.view.clear_color;
    commands.insert_resource(ClearColor(Color::srgb(r, g, b)));
}
