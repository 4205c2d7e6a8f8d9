//! Rendering module - 2D camera and draw order.

mod camera;
mod plugin;
mod ysort;

pub use camera::{CameraFocus, MainCamera};
pub use plugin::RenderingPlugin;
pub use ysort::YSort;
