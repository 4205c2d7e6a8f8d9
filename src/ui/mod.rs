//! UI module - menus, HUD, health bars and the tutorial overlay.

mod health_bars;
mod hud;
mod menus;
mod plugin;
mod tutorial;
mod widgets;

pub use health_bars::bar_color;
pub use plugin::UiPlugin;
pub use tutorial::TutorialFade;
