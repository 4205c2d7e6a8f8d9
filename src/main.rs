//! Boneyard - Entry Point
//!
//! A top-down 2D brawler: clear the skeletons, survive the boss, unlock the next level.
//!
//! Controls:
//! - WASD: Move
//! - Left click: Attack
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin as KiraAudioPlugin;
use bevy_rapier2d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Boneyard".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Audio
        .add_plugins(KiraAudioPlugin)

        // Our game plugin
        .add_plugins(boneyard::BoneyardPlugin)

        .run();
}
