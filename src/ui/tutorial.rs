//! Level-start tutorial overlay: shown, then faded out, skippable.

use bevy::prelude::*;

use crate::core::{GameConfig, GameState, PauseLock};
use crate::progress::GameProgress;

const PANEL_COLOR: Srgba = Srgba::new(0.0, 0.0, 0.0, 0.75);
const TEXT_COLOR: Srgba = Srgba::new(0.95, 0.95, 0.95, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum FadePhase {
    #[default]
    Hidden,
    /// Seconds of full opacity left
    Showing(f32),
    /// Seconds of fading left
    Fading(f32),
}

/// Display-then-fade timer for the overlay.
#[derive(Resource, Debug, Default)]
pub struct TutorialFade {
    phase: FadePhase,
    fade_duration: f32,
}

impl TutorialFade {
    pub fn show(&mut self, display: f32, fade: f32) {
        self.phase = FadePhase::Showing(display.max(0.0));
        self.fade_duration = fade.max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.phase != FadePhase::Hidden
    }

    /// Cut the display phase short and start the fade. Returns false when
    /// there was nothing left to skip.
    pub fn skip(&mut self) -> bool {
        if !matches!(self.phase, FadePhase::Showing(_)) {
            return false;
        }
        self.phase = if self.fade_duration > 0.0 {
            FadePhase::Fading(self.fade_duration)
        } else {
            FadePhase::Hidden
        };
        true
    }

    /// Hide immediately.
    pub fn hide(&mut self) {
        self.phase = FadePhase::Hidden;
    }

    /// Advance by `delta` seconds. Leftover time carries from the display
    /// phase into the fade.
    pub fn advance(&mut self, delta: f32) {
        self.phase = match self.phase {
            FadePhase::Hidden => FadePhase::Hidden,
            FadePhase::Showing(left) if left > delta => FadePhase::Showing(left - delta),
            FadePhase::Showing(left) => {
                let fade_left = self.fade_duration - (delta - left);
                if fade_left > 0.0 {
                    FadePhase::Fading(fade_left)
                } else {
                    FadePhase::Hidden
                }
            }
            FadePhase::Fading(left) if left > delta => FadePhase::Fading(left - delta),
            FadePhase::Fading(_) => FadePhase::Hidden,
        };
    }

    /// Opacity multiplier for the panel.
    pub fn alpha(&self) -> f32 {
        match self.phase {
            FadePhase::Hidden => 0.0,
            FadePhase::Showing(_) => 1.0,
            FadePhase::Fading(left) if self.fade_duration > 0.0 => (left / self.fade_duration).clamp(0.0, 1.0),
            FadePhase::Fading(_) => 0.0,
        }
    }
}

/// Root of the tutorial panel.
#[derive(Component)]
pub struct TutorialOverlay;

#[derive(Component)]
struct TutorialPanel;

#[derive(Component)]
struct TutorialText;

pub fn setup_tutorial_systems(app: &mut App) {
    app.init_resource::<TutorialFade>()
        .add_systems(OnEnter(GameState::InGame), show_tutorial)
        .add_systems(OnExit(GameState::InGame), cleanup_tutorial)
        .add_systems(Update, run_tutorial.run_if(in_state(GameState::InGame)));
}

fn show_tutorial(
    mut commands: Commands,
    config: Res<GameConfig>,
    progress: Res<GameProgress>,
    mut fade: ResMut<TutorialFade>,
) {
    let tuning = &config.tutorial;
    if tuning.show_only_once && progress.tutorial_shown() {
        return;
    }

    fade.show(tuning.display_duration, tuning.fade_duration);

    let mut lines = vec![
        "WASD to move",
        "Left click to attack",
        "Defeat every skeleton to summon the boss",
        "Meat heals, bones make you stronger",
    ];
    if tuning.allow_skip {
        lines.push("Press any key to continue");
    }

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::End,
                position_type: PositionType::Absolute,
                padding: UiRect::bottom(Val::Px(60.0)),
                ..default()
            },
            GlobalZIndex(5),
            TutorialOverlay,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(20.0)),
                        row_gap: Val::Px(8.0),
                        ..default()
                    },
                    BackgroundColor(PANEL_COLOR.into()),
                    TutorialPanel,
                ))
                .with_children(|panel| {
                    for line in lines {
                        panel.spawn((
                            Text::new(line),
                            TextFont {
                                font_size: 22.0,
                                ..default()
                            },
                            TextColor(TEXT_COLOR.into()),
                            TutorialText,
                        ));
                    }
                });
        });
}

/// Tick the fade on real time, skip on any key, and hold the pause lock.
fn run_tutorial(
    mut commands: Commands,
    time: Res<Time<Real>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    mut fade: ResMut<TutorialFade>,
    mut lock: ResMut<PauseLock>,
    mut progress: ResMut<GameProgress>,
    overlay_query: Query<Entity, With<TutorialOverlay>>,
    mut panel_query: Query<&mut BackgroundColor, With<TutorialPanel>>,
    mut text_query: Query<&mut TextColor, With<TutorialText>>,
) {
    let tuning = &config.tutorial;

    // Reflects the previous frame, so the Escape that skips never also pauses
    let blocked = tuning.block_pause && fade.is_active();
    if lock.blocked != blocked {
        lock.blocked = blocked;
    }

    if !fade.is_active() {
        return;
    }

    let skip_pressed = tuning.allow_skip && keyboard.get_just_pressed().next().is_some();
    if skip_pressed && fade.skip() {
        info!("Tutorial skipped");
    } else {
        fade.advance(time.delta_secs());
    }

    let alpha = fade.alpha();
    for mut background in panel_query.iter_mut() {
        background.0 = PANEL_COLOR.with_alpha(PANEL_COLOR.alpha * alpha).into();
    }
    for mut color in text_query.iter_mut() {
        color.0 = TEXT_COLOR.with_alpha(alpha).into();
    }

    if !fade.is_active() {
        for entity in overlay_query.iter() {
            commands.entity(entity).despawn_recursive();
        }
        progress.mark_tutorial_shown();
    }
}

fn cleanup_tutorial(
    mut commands: Commands,
    mut fade: ResMut<TutorialFade>,
    mut lock: ResMut<PauseLock>,
    query: Query<Entity, With<TutorialOverlay>>,
) {
    fade.hide();
    lock.blocked = false;
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_then_fades_then_hides() {
        let mut fade = TutorialFade::default();
        fade.show(5.0, 1.0);
        fade.advance(4.0);
        assert_eq!(fade.alpha(), 1.0);

        fade.advance(1.5);
        assert!(fade.is_active());
        assert!((fade.alpha() - 0.5).abs() < 1e-5);

        fade.advance(0.6);
        assert!(!fade.is_active());
        assert_eq!(fade.alpha(), 0.0);
    }

    #[test]
    fn long_frame_skips_straight_past_the_fade() {
        let mut fade = TutorialFade::default();
        fade.show(5.0, 1.0);
        fade.advance(10.0);
        assert!(!fade.is_active());
    }

    #[test]
    fn skip_starts_the_fade() {
        let mut fade = TutorialFade::default();
        fade.show(5.0, 1.0);
        assert!(fade.skip());
        assert!(fade.is_active());
        assert_eq!(fade.alpha(), 1.0);

        fade.advance(0.5);
        assert!((fade.alpha() - 0.5).abs() < 1e-5);
        assert!(!fade.skip());

        fade.advance(0.6);
        assert!(!fade.is_active());
    }

    #[test]
    fn skip_without_fade_hides_at_once() {
        let mut fade = TutorialFade::default();
        fade.show(5.0, 0.0);
        assert!(fade.skip());
        assert!(!fade.is_active());
    }

    #[test]
    fn zero_fade_hides_when_display_ends() {
        let mut fade = TutorialFade::default();
        fade.show(1.0, 0.0);
        fade.advance(1.0);
        assert!(!fade.is_active());
    }
}
