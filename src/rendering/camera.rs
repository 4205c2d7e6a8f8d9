//! Camera that follows the player, or a focus point during cutscenes.

use bevy::prelude::*;

use crate::core::GameConfig;
use crate::player::Player;

/// Marker for the game camera.
#[derive(Component)]
pub struct MainCamera;

/// When set, the camera looks here instead of at the player.
#[derive(Resource, Debug, Default)]
pub struct CameraFocus {
    pub target: Option<Vec2>,
}

/// Spawn the 2D camera. One world unit is `pixels_per_unit` screen pixels.
pub fn spawn_camera(mut commands: Commands, config: Res<GameConfig>) {
    let scale = 1.0 / config.view.pixels_per_unit.max(1.0);

    commands.spawn((
        Camera2d,
        MainCamera,
        OrthographicProjection {
            scale,
            ..OrthographicProjection::default_2d()
        },
    ));
}

/// Frame-rate independent approach of `current` toward `target`.
pub fn follow_step(current: Vec2, target: Vec2, speed: f32, delta: f32) -> Vec2 {
    let t = 1.0 - (-speed.max(0.0) * delta.max(0.0)).exp();
    current.lerp(target, t)
}

/// Ease the camera toward the focus point or the player. Snaps to a newly
/// spawned player.
pub fn camera_follow(
    time: Res<Time>,
    config: Res<GameConfig>,
    focus: Res<CameraFocus>,
    player_query: Query<(&Transform, Ref<Player>), Without<MainCamera>>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut camera_transform) = camera_query.get_single_mut() else {
        return;
    };

    let player = player_query.get_single().ok();
    let snap = focus.target.is_none() && player.as_ref().is_some_and(|(_, marker)| marker.is_added());
    let target = match (focus.target, player) {
        (Some(point), _) => point,
        (None, Some((transform, _))) => transform.translation.truncate(),
        (None, None) => return,
    };

    let current = camera_transform.translation.truncate();
    let next = if snap {
        target
    } else {
        follow_step(current, target, config.view.follow_speed, time.delta_secs())
    };

    camera_transform.translation = next.extend(camera_transform.translation.z);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_step_moves_partway_and_never_overshoots() {
        let start = Vec2::ZERO;
        let target = Vec2::new(10.0, 0.0);
        let next = follow_step(start, target, 8.0, 1.0 / 60.0);
        assert!(next.x > 0.0 && next.x < 10.0);

        let far = follow_step(start, target, 8.0, 100.0);
        assert!((far.x - 10.0).abs() < 1e-3);
    }

    #[test]
    fn zero_delta_stays_put() {
        let start = Vec2::new(3.0, 4.0);
        assert_eq!(follow_step(start, Vec2::ZERO, 8.0, 0.0), start);
    }
}
