//! Key/value preference storage.

use bevy::prelude::*;
use ron::ser::PrettyConfig;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "boneyard";
const PREFS_FILE: &str = "prefs.ron";

/// Errors from the preference file.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Preference file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Could not serialize preferences: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Preference file is malformed: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// String preferences that outlive the process.
pub trait PreferenceStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
    fn delete_key(&mut self, key: &str) -> Result<(), PrefsError>;
}

/// Preferences kept in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<(), PrefsError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Preferences stored as a RON map, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// `<data dir>/boneyard/prefs.ron`, if the platform has a data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR).join(PREFS_FILE))
    }

    /// Open the file at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = if path.exists() {
            ron::from_str(&fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    /// Open the file, starting empty if it cannot be read. The broken file is
    /// replaced on the next write.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                error!("Failed to read preferences {:?}: {}", path, e);
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(&self.values, PrettyConfig::default())?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.write()
    }

    fn delete_key(&mut self, key: &str) -> Result<(), PrefsError> {
        if self.values.remove(key).is_some() {
            self.write()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("prefs.ron");

        let mut store = FileStore::open(&path).expect("open");
        store.set_string("Tutorial_Shown", "1").expect("set");
        store.set_string("Other", "x").expect("set");
        store.delete_key("Other").expect("delete");

        let reopened = FileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get_string("Tutorial_Shown").as_deref(), Some("1"));
        assert_eq!(reopened.get_string("Other"), None);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.ron");
        fs::write(&path, "{ \"key\": ").expect("write");

        assert!(matches!(FileStore::open(&path), Err(PrefsError::Parse(_))));

        let store = FileStore::open_or_empty(&path);
        assert_eq!(store.get_string("key"), None);
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::default();
        store.set_string("a", "b").expect("set");
        assert_eq!(store.get_string("a").as_deref(), Some("b"));
        store.delete_key("a").expect("delete");
        assert_eq!(store.get_string("a"), None);
    }
}
