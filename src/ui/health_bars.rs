//! World-space health bars above regular enemies.

use bevy::prelude::*;
use bevy::sprite::Anchor;

use crate::combat::{CombatSet, Dead, Health};
use crate::enemies::{Boss, Enemy};

const BAR_SIZE: Vec2 = Vec2::new(0.8, 0.1);
const BAR_GAP: f32 = 0.15;
/// At or below this fraction the bar is solid red
const LOW_HEALTH: f32 = 0.3;

/// Bar entities owned by an enemy.
#[derive(Component)]
struct HealthBarLink {
    root: Entity,
    fill: Entity,
}

#[derive(Component)]
struct HealthBarFill;

pub fn setup_health_bar_systems(app: &mut App) {
    app.add_systems(
        Update,
        (attach_health_bars, update_health_bars)
            .chain()
            .in_set(CombatSet::Feedback),
    );
}

/// Red at or below 30% health, blending to green toward full.
pub fn bar_color(fraction: f32) -> Color {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction <= LOW_HEALTH {
        return Color::srgb(1.0, 0.0, 0.0);
    }

    let t = (fraction - LOW_HEALTH) / (1.0 - LOW_HEALTH);
    Srgba::RED.mix(&Srgba::GREEN, t).into()
}

/// Bars show only while an enemy is alive and hurt.
pub fn bar_visible(health: &Health, dead: bool) -> bool {
    !dead && !health.is_dead() && !health.is_full()
}

fn attach_health_bars(
    mut commands: Commands,
    enemy_query: Query<(Entity, &Sprite), (Added<Enemy>, Without<Boss>)>,
) {
    for (entity, sprite) in enemy_query.iter() {
        let height = sprite.custom_size.map_or(1.0, |size| size.y);

        let fill = commands
            .spawn((
                Sprite {
                    color: bar_color(1.0),
                    custom_size: Some(BAR_SIZE),
                    anchor: Anchor::CenterLeft,
                    ..default()
                },
                Transform::from_xyz(-BAR_SIZE.x / 2.0, 0.0, 0.01),
                HealthBarFill,
            ))
            .id();

        let root = commands
            .spawn((
                Sprite::from_color(Color::srgba(0.0, 0.0, 0.0, 0.6), BAR_SIZE),
                Transform::from_xyz(0.0, height / 2.0 + BAR_GAP, 0.5),
                Visibility::Hidden,
            ))
            .add_child(fill)
            .id();

        commands
            .entity(entity)
            .add_child(root)
            .insert(HealthBarLink { root, fill });
    }
}

fn update_health_bars(
    enemy_query: Query<(&Health, &HealthBarLink, Has<Dead>), Or<(Changed<Health>, Added<Dead>)>>,
    mut visibility_query: Query<&mut Visibility>,
    mut fill_query: Query<&mut Sprite, With<HealthBarFill>>,
) {
    for (health, link, dead) in enemy_query.iter() {
        if let Ok(mut visibility) = visibility_query.get_mut(link.root) {
            *visibility = if bar_visible(health, dead) {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }

        if let Ok(mut sprite) = fill_query.get_mut(link.fill) {
            let fraction = health.fraction();
            sprite.custom_size = Some(Vec2::new(BAR_SIZE.x * fraction, BAR_SIZE.y));
            sprite.color = bar_color(fraction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_health_is_solid_red() {
        assert_eq!(bar_color(0.3), Color::srgb(1.0, 0.0, 0.0));
        assert_eq!(bar_color(0.1), Color::srgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn full_health_is_green() {
        let color = bar_color(1.0).to_srgba();
        assert!(color.green > 0.99 && color.red < 0.01);
    }

    #[test]
    fn colour_shifts_toward_green_as_health_rises() {
        let low = bar_color(0.4).to_srgba();
        let high = bar_color(0.9).to_srgba();
        assert!(high.green > low.green);
        assert!(high.red < low.red);
    }

    #[test]
    fn bar_hidden_at_full_and_on_death() {
        let mut health = Health::new(4);
        assert!(!bar_visible(&health, false));
        health.take_damage(1);
        assert!(bar_visible(&health, false));
        assert!(!bar_visible(&health, true));
        health.take_damage(10);
        assert!(!bar_visible(&health, false));
    }
}
