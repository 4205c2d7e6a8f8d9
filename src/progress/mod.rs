//! Level completion and one-time flags persisted between runs.

mod manager;
mod plugin;
mod prefs;

pub use manager::{GameProgress, COMPLETED_LEVELS_KEY, TUTORIAL_SHOWN_KEY};
pub use plugin::ProgressPlugin;
pub use prefs::{FileStore, MemoryStore, PreferenceStore, PrefsError};
