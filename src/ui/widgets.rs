//! Shared building blocks for menu panels.

use bevy::prelude::*;

pub const BUTTON_NORMAL: Color = Color::srgb(0.15, 0.15, 0.2);
pub const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.3);
pub const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);
pub const BUTTON_LOCKED: Color = Color::srgb(0.1, 0.1, 0.12);
const TEXT_COLOR: Color = Color::srgb(0.8, 0.8, 0.85);
const TEXT_LOCKED: Color = Color::srgb(0.35, 0.35, 0.4);

/// Button that ignores clicks and keeps its greyed look.
#[derive(Component)]
pub struct LockedButton;

/// Full-screen centred column.
pub fn panel_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        flex_direction: FlexDirection::Column,
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        position_type: PositionType::Absolute,
        ..default()
    }
}

/// Large heading with space below.
pub fn spawn_title(parent: &mut ChildBuilder, text: &str, font_size: f32, color: Color) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(40.0)),
            ..default()
        },
    ));
}

/// Plain body text.
pub fn spawn_label(parent: &mut ChildBuilder, text: &str, font_size: f32) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(TEXT_COLOR),
        Node {
            margin: UiRect::all(Val::Px(6.0)),
            ..default()
        },
    ));
}

/// Helper to spawn a menu button carrying `action`.
pub fn spawn_menu_button<A: Component>(parent: &mut ChildBuilder, text: &str, action: A) {
    spawn_button(parent, text, action, false);
}

/// A greyed button that does nothing when clicked.
pub fn spawn_locked_button<A: Component>(parent: &mut ChildBuilder, text: &str, action: A) {
    spawn_button(parent, text, action, true);
}

fn spawn_button<A: Component>(parent: &mut ChildBuilder, text: &str, action: A, locked: bool) {
    let (background, text_color) = if locked {
        (BUTTON_LOCKED, TEXT_LOCKED)
    } else {
        (BUTTON_NORMAL, TEXT_COLOR)
    };

    let mut button = parent.spawn((
        Button,
        Node {
            width: Val::Px(260.0),
            height: Val::Px(50.0),
            margin: UiRect::all(Val::Px(8.0)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(background),
        action,
    ));
    if locked {
        button.insert(LockedButton);
    }

    button.with_children(|button| {
        button.spawn((
            Text::new(text),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(text_color),
        ));
    });
}

/// Hover and press feedback for every unlocked button.
pub fn button_feedback(
    mut query: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, Without<LockedButton>)>,
) {
    for (interaction, mut background) in query.iter_mut() {
        *background = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_NORMAL,
        }
        .into();
    }
}

/// Despawn every entity carrying marker `M`.
pub fn despawn_all<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
