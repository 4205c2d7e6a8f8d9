//! Y-sorting: sprites lower on screen draw on top.

use bevy::prelude::*;

use crate::core::GameConfig;

/// Opt-in y-sorting. `foot_offset` is the distance from the sprite centre
/// down to where it touches the ground.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct YSort {
    pub foot_offset: f32,
}

/// Draw depth for a sprite whose centre is at `y`.
pub fn sort_depth(y: f32, foot_offset: f32, base_z: f32, y_factor: f32) -> f32 {
    base_z - (y - foot_offset) * y_factor
}

/// Write the draw depth into each sorted sprite's z.
pub fn apply_ysort(config: Res<GameConfig>, mut query: Query<(&YSort, &mut Transform)>) {
    let view = &config.view;

    for (sort, mut transform) in query.iter_mut() {
        let z = sort_depth(transform.translation.y, sort.foot_offset, view.sort_base_z, view.sort_y_factor);
        if transform.translation.z != z {
            transform.translation.z = z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_feet_draw_in_front() {
        let front = sort_depth(1.0, 0.5, 10.0, 0.01);
        let behind = sort_depth(3.0, 0.5, 10.0, 0.01);
        assert!(front > behind);
    }

    #[test]
    fn taller_sprite_sorts_by_its_feet() {
        // Same feet position, different centres
        let short = sort_depth(1.25, 0.25, 10.0, 0.01);
        let tall = sort_depth(1.5, 0.5, 10.0, 0.01);
        assert!((short - tall).abs() < 1e-6);
    }
}
