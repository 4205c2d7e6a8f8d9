//! Progress plugin - opens the preference file.

use bevy::prelude::*;

use super::manager::GameProgress;
use super::prefs::{FileStore, MemoryStore, PreferenceStore};

/// Progress plugin - inserts [`GameProgress`].
pub struct ProgressPlugin;

impl Plugin for ProgressPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameProgress::load(open_store()));
    }
}

fn open_store() -> Box<dyn PreferenceStore> {
    match FileStore::default_path() {
        Some(path) => {
            info!("Preferences at {:?}", path);
            Box::new(FileStore::open_or_empty(path))
        }
        None => {
            warn!("No platform data directory, progress will not be saved");
            Box::new(MemoryStore::default())
        }
    }
}
