//! Error types and loading helper for RON data files.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading enemy, level or config data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Level layout uses a character with no meaning.
    #[error("Unknown layout character '{character}' at ({x}, {y})")]
    UnknownTile { character: char, x: usize, y: usize },

    /// Level layout has no 'P' tile.
    #[error("Level layout has no player spawn")]
    MissingPlayerSpawn,
}

/// Read and parse a single RON file.
pub fn load_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;

    ron::from_str(&contents).map_err(|e| DataLoadError::ParseError {
        path: display,
        details: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Sample {
        speed: f32,
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_ron::<Sample>(Path::new("definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(speed: )").expect("write");

        let err = load_ron::<Sample>(&path).unwrap_err();
        match err {
            DataLoadError::ParseError { path: p, .. } => assert!(p.ends_with("broken.ron")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_file_parses() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ok.ron");
        fs::write(&path, "(speed: 2.5)").expect("write");

        assert_eq!(load_ron::<Sample>(&path).unwrap(), Sample { speed: 2.5 });
    }
}
