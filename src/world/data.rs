//! Level data structures and RON loading.
//!
//! A level is an ASCII layout, one string per row from top to bottom:
//!
//! | char | meaning |
//! |------|---------|
//! | `#`  | wall |
//! | `.`  | floor |
//! | ` `  | void (nothing spawned) |
//! | `P`  | player spawn (exactly one) |
//! | `X`  | boss spawn point |
//! | `m`  | meat pickup |
//! | `b`  | bone pickup |
//!
//! Any other character must appear in the level's `enemies` palette, which
//! maps it to an enemy kind.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::{load_ron, DataLoadError, PickupKind};

const LEVELS_DIR: &str = "assets/data/levels";
const LEVEL_PREFIX: &str = "Level";

fn default_tile_size() -> f32 {
    1.0
}

/// Level file as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinitionRaw {
    /// Display name
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    pub layout: Vec<String>,
    /// Layout character -> enemy kind
    #[serde(default)]
    pub enemies: HashMap<char, String>,
    /// Enemy kind spawned at `X` once the level is cleared
    #[serde(default)]
    pub boss: Option<String>,
}

/// An enemy placed in the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    pub grid_pos: (i32, i32),
    pub kind: String,
}

/// A resolved level ready to spawn.
#[derive(Debug, Clone)]
pub struct LevelDefinition {
    pub name: String,
    pub tile_size: f32,
    pub width: usize,
    pub height: usize,
    pub walls: Vec<(i32, i32)>,
    pub floors: Vec<(i32, i32)>,
    pub player_spawn: (i32, i32),
    pub boss_spawn: Option<(i32, i32)>,
    pub boss: Option<String>,
    pub enemies: Vec<EnemySpawn>,
    pub pickups: Vec<((i32, i32), PickupKind)>,
}

impl LevelDefinition {
    /// Resolve a raw level into tile lists.
    pub fn from_raw(raw: LevelDefinitionRaw) -> Result<Self, DataLoadError> {
        let height = raw.layout.len();
        let width = raw.layout.iter().map(|row| row.chars().count()).max().unwrap_or(0);

        let mut level = Self {
            name: raw.name,
            tile_size: raw.tile_size,
            width,
            height,
            walls: Vec::new(),
            floors: Vec::new(),
            player_spawn: (0, 0),
            boss_spawn: None,
            boss: raw.boss,
            enemies: Vec::new(),
            pickups: Vec::new(),
        };
        let mut player_spawn = None;

        for (y, row) in raw.layout.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let pos = (x as i32, y as i32);

                match c {
                    ' ' => continue,
                    '#' => {
                        level.walls.push(pos);
                        continue;
                    }
                    '.' => {}
                    'P' => player_spawn = Some(pos),
                    'X' => level.boss_spawn = Some(pos),
                    'm' => level.pickups.push((pos, PickupKind::Meat)),
                    'b' => level.pickups.push((pos, PickupKind::Bone)),
                    other => {
                        let Some(kind) = raw.enemies.get(&other) else {
                            return Err(DataLoadError::UnknownTile { character: other, x, y });
                        };
                        level.enemies.push(EnemySpawn {
                            grid_pos: pos,
                            kind: kind.clone(),
                        });
                    }
                }

                // Everything that is not a wall or void stands on floor
                level.floors.push(pos);
            }
        }

        level.player_spawn = player_spawn.ok_or(DataLoadError::MissingPlayerSpawn)?;
        Ok(level)
    }

    /// Convert grid coordinates to world position (center of tile). Row 0 is
    /// the top of the map.
    pub fn grid_to_world(&self, x: i32, y: i32) -> Vec2 {
        let flipped = self.height as i32 - 1 - y;
        Vec2::new(
            x as f32 * self.tile_size + self.tile_size / 2.0,
            flipped as f32 * self.tile_size + self.tile_size / 2.0,
        )
    }
}

/// Resource storing all loaded level definitions and their play order.
#[derive(Resource, Default)]
pub struct LevelRegistry {
    pub levels: HashMap<String, LevelDefinition>,
    /// Level keys in play order
    pub order: Vec<String>,
}

impl LevelRegistry {
    /// Get a level by key.
    pub fn get(&self, key: &str) -> Option<&LevelDefinition> {
        self.levels.get(key)
    }

    /// Load every `*.ron` file in `dir`, keyed by file stem.
    pub fn load_dir(dir: &Path) -> Self {
        let mut registry = Self::default();

        let Ok(entries) = fs::read_dir(dir) else {
            warn!("Levels directory not found: {:?}", dir);
            return registry;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            match load_ron::<LevelDefinitionRaw>(&path).and_then(LevelDefinition::from_raw) {
                Ok(level) => {
                    info!("Loaded level: {} ({})", key, level.name);
                    registry.levels.insert(key, level);
                }
                Err(e) => {
                    error!("Failed to load level {:?}: {}", path, e);
                }
            }
        }

        registry.order = detect_level_order(registry.levels.keys().map(String::as_str));
        registry
    }
}

/// Number in a `Level<N>` key.
fn level_number(key: &str) -> Option<u32> {
    key.strip_prefix(LEVEL_PREFIX)?.parse().ok()
}

/// Keys of the form `Level<N>`, sorted by N. Other keys are skipped with a
/// warning.
pub fn detect_level_order<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut numbered: Vec<(u32, &str)> = Vec::new();

    for key in keys {
        match level_number(key) {
            Some(n) => numbered.push((n, key)),
            None => warn!("Ignoring level '{}': name is not Level<N>", key),
        }
    }

    numbered.sort();
    numbered.into_iter().map(|(_, key)| key.to_string()).collect()
}

/// Resource indicating which level to load.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentLevel {
    pub key: String,
}

/// Load all level definitions from assets/data/levels/.
pub fn load_level_definitions(mut commands: Commands) {
    let registry = LevelRegistry::load_dir(Path::new(LEVELS_DIR));
    info!("Loaded {} level(s), order: {:?}", registry.levels.len(), registry.order);

    let first = registry.order.first().cloned().unwrap_or_default();
    commands.insert_resource(registry);
    commands.insert_resource(CurrentLevel { key: first });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(layout: &[&str]) -> LevelDefinitionRaw {
        LevelDefinitionRaw {
            name: "Test".to_string(),
            tile_size: 1.0,
            layout: layout.iter().map(|s| s.to_string()).collect(),
            enemies: HashMap::from([('s', "skeleton".to_string())]),
            boss: Some("bone_lord".to_string()),
        }
    }

    #[test]
    fn layout_resolves_every_tile_kind() {
        let level = LevelDefinition::from_raw(raw(&[
            "#####",
            "#Ps.#",
            "#mbX#",
            "#####",
        ]))
        .expect("valid level");

        assert_eq!((level.width, level.height), (5, 4));
        assert_eq!(level.player_spawn, (1, 1));
        assert_eq!(level.boss_spawn, Some((3, 2)));
        assert_eq!(level.enemies, vec![EnemySpawn { grid_pos: (2, 1), kind: "skeleton".into() }]);
        assert_eq!(level.pickups.len(), 2);
        assert_eq!(level.walls.len(), 14);
        assert_eq!(level.floors.len(), 6);
    }

    #[test]
    fn unknown_character_is_an_error() {
        let err = LevelDefinition::from_raw(raw(&["#P?#"])).unwrap_err();
        assert!(matches!(err, DataLoadError::UnknownTile { character: '?', x: 2, y: 0 }));
    }

    #[test]
    fn missing_player_is_an_error() {
        let err = LevelDefinition::from_raw(raw(&["#..#"])).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingPlayerSpawn));
    }

    #[test]
    fn grid_rows_run_top_to_bottom() {
        let level = LevelDefinition::from_raw(raw(&["P..", "..."])).expect("valid level");
        assert_eq!(level.grid_to_world(0, 0), Vec2::new(0.5, 1.5));
        assert_eq!(level.grid_to_world(2, 1), Vec2::new(2.5, 0.5));
    }

    #[test]
    fn level_order_is_numeric_and_skips_other_names() {
        let order = detect_level_order(["Level10", "Level2", "Bonus", "Level1", "Levelx"]);
        assert_eq!(order, vec!["Level1", "Level2", "Level10"]);
    }

    #[test]
    fn load_dir_builds_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let level = r##"(name: "A", layout: ["#P#"])"##;
        fs::write(dir.path().join("Level2.ron"), level).expect("write");
        fs::write(dir.path().join("Level1.ron"), level).expect("write");
        fs::write(dir.path().join("Level3.ron"), "(name: ").expect("write");

        let registry = LevelRegistry::load_dir(dir.path());
        assert_eq!(registry.order, vec!["Level1", "Level2"]);
        assert!(registry.get("Level3").is_none());
    }
}
