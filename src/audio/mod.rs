//! Audio module - music and sound effects on kira channels.

mod cues;
mod music;
mod plugin;

pub use cues::SfxCue;
pub use music::{MusicDirector, MusicTrack};
pub use plugin::GameAudioPlugin;
