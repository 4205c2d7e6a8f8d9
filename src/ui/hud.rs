//! In-game HUD - life, enemy count and the boss health bar.

use bevy::prelude::*;

use crate::combat::Health;
use crate::core::{BossDefeated, GameState};
use crate::enemies::{Boss, EnemyKind, EnemyRegistry, EnemyRoster};
use crate::player::Player;
use super::tutorial::TutorialFade;

/// How long the boss bar stays up after the boss dies.
const BOSS_BAR_LINGER: f32 = 1.0;
const TEXT_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);

/// Marker for HUD root entities.
#[derive(Component)]
pub struct HudRoot;

/// Life and enemy counters.
#[derive(Component)]
struct HudCounters;

#[derive(Component)]
struct LifeText;

#[derive(Component)]
struct EnemiesText;

#[derive(Component)]
struct BossBarRoot;

#[derive(Component)]
struct BossNameText;

#[derive(Component)]
struct BossBarFill;

#[derive(Component)]
struct BossHealthText;

/// The boss the bar is showing, and the hide delay after it dies.
#[derive(Resource, Debug, Default)]
struct BossBarLink {
    boss: Option<Entity>,
    hide_timer: Option<Timer>,
}

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.init_resource::<BossBarLink>()
        .add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (
                update_life_text,
                update_enemies_text,
                link_boss_bar,
                update_boss_bar,
                release_boss_bar,
                hide_hud_during_tutorial,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

fn hud_text(text: &str, font_size: f32) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(TEXT_COLOR),
    )
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands, mut link: ResMut<BossBarLink>) {
    *link = BossBarLink::default();

    // Counters (top-left corner)
    commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                position_type: PositionType::Absolute,
                left: Val::Px(20.0),
                top: Val::Px(20.0),
                row_gap: Val::Px(6.0),
                ..default()
            },
            HudRoot,
            HudCounters,
        ))
        .with_children(|parent| {
            parent.spawn((hud_text("Life: -", 24.0), LifeText));
            parent.spawn((hud_text("Enemies: -", 24.0), EnemiesText));
        });

    // Boss bar (top centre), hidden until a boss is linked
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                top: Val::Px(20.0),
                ..default()
            },
            Visibility::Hidden,
            HudRoot,
            BossBarRoot,
        ))
        .with_children(|parent| {
            parent.spawn((hud_text("", 22.0), BossNameText));

            parent
                .spawn((
                    Node {
                        width: Val::Px(400.0),
                        height: Val::Px(16.0),
                        margin: UiRect::vertical(Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.7, 0.1, 0.15)),
                        BossBarFill,
                    ));
                });

            parent.spawn((hud_text("", 16.0), BossHealthText));
        });
}

fn update_life_text(
    player_query: Query<&Health, (With<Player>, Changed<Health>)>,
    mut text_query: Query<&mut Text, With<LifeText>>,
) {
    let Ok(health) = player_query.get_single() else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    text.0 = format!("Life: {}/{}", health.current, health.maximum);
}

fn update_enemies_text(
    roster: Res<EnemyRoster>,
    mut text_query: Query<(&mut Text, Ref<EnemiesText>)>,
) {
    let Ok((mut text, marker)) = text_query.get_single_mut() else {
        return;
    };
    if !roster.is_changed() && !marker.is_added() {
        return;
    }

    text.0 = format!("Enemies: {}", roster.remaining());
}

/// Link a freshly spawned boss to the bar.
fn link_boss_bar(
    boss_query: Query<(Entity, &EnemyKind, Has<Health>), Added<Boss>>,
    registry: Res<EnemyRegistry>,
    mut link: ResMut<BossBarLink>,
    mut root_query: Query<&mut Visibility, With<BossBarRoot>>,
    mut name_query: Query<&mut Text, With<BossNameText>>,
) {
    for (entity, kind, has_health) in boss_query.iter() {
        if !has_health {
            warn!("Boss {:?} has no Health, boss bar not linked", entity);
            continue;
        }

        link.boss = Some(entity);
        link.hide_timer = None;

        let name = registry.get(&kind.0).map_or(kind.0.as_str(), |definition| definition.name.as_str());
        for mut text in name_query.iter_mut() {
            text.0 = name.to_string();
        }
        for mut visibility in root_query.iter_mut() {
            *visibility = Visibility::Inherited;
        }
    }
}

fn update_boss_bar(
    link: Res<BossBarLink>,
    boss_query: Query<&Health, With<Boss>>,
    mut fill_query: Query<&mut Node, With<BossBarFill>>,
    mut numbers_query: Query<&mut Text, With<BossHealthText>>,
) {
    let Some(health) = link.boss.and_then(|boss| boss_query.get(boss).ok()) else {
        return;
    };

    for mut fill in fill_query.iter_mut() {
        fill.width = Val::Percent(health.fraction() * 100.0);
    }
    for mut text in numbers_query.iter_mut() {
        text.0 = format!("{} / {}", health.current, health.maximum);
    }
}

/// Hide the bar a moment after the boss dies.
fn release_boss_bar(
    time: Res<Time<Real>>,
    mut boss_events: EventReader<BossDefeated>,
    mut link: ResMut<BossBarLink>,
    mut root_query: Query<&mut Visibility, With<BossBarRoot>>,
    mut fill_query: Query<&mut Node, With<BossBarFill>>,
) {
    for event in boss_events.read() {
        if link.boss == Some(event.boss) {
            link.boss = None;
            link.hide_timer = Some(Timer::from_seconds(BOSS_BAR_LINGER, TimerMode::Once));
            for mut fill in fill_query.iter_mut() {
                fill.width = Val::Percent(0.0);
            }
        }
    }

    let Some(timer) = link.hide_timer.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).finished() {
        link.hide_timer = None;
        for mut visibility in root_query.iter_mut() {
            *visibility = Visibility::Hidden;
        }
    }
}

fn hide_hud_during_tutorial(
    fade: Res<TutorialFade>,
    mut counters_query: Query<&mut Visibility, With<HudCounters>>,
) {
    let wanted = if fade.is_active() {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    };
    for mut visibility in counters_query.iter_mut() {
        visibility.set_if_neq(wanted);
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
