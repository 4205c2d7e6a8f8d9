//! Level completion tracking.
//!
//! Completion is monotonic: a level once completed stays completed until the
//! player resets progress. Level `i` is unlocked iff it is the first level or
//! level `i - 1` is completed.

use bevy::prelude::*;
use std::collections::BTreeSet;

use super::prefs::PreferenceStore;

pub const COMPLETED_LEVELS_KEY: &str = "GameProgress_CompletedLevels";
pub const TUTORIAL_SHOWN_KEY: &str = "Tutorial_Shown";

/// Completed levels and one-time flags, backed by a preference store.
#[derive(Resource)]
pub struct GameProgress {
    completed: BTreeSet<String>,
    store: Box<dyn PreferenceStore>,
}

impl GameProgress {
    /// Load completion from `store`.
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let completed = store
            .get_string(COMPLETED_LEVELS_KEY)
            .map(|list| parse_completed(&list))
            .unwrap_or_default();

        info!("Loaded progress: {} level(s) completed", completed.len());
        Self { completed, store }
    }

    pub fn is_level_completed(&self, name: &str) -> bool {
        self.completed.contains(name)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Record a completed level and save. Empty names are ignored.
    pub fn mark_level_complete(&mut self, name: &str) {
        if name.is_empty() {
            warn!("Cannot mark a level with an empty name as complete");
            return;
        }
        if !self.completed.insert(name.to_string()) {
            return;
        }

        info!("Level completed: {}", name);
        self.save();
    }

    /// Whether `name` may be played, given the level order. Every earlier
    /// level must be completed.
    pub fn is_level_unlocked(&self, name: &str, order: &[String]) -> bool {
        match order.iter().position(|level| level == name) {
            None => {
                warn!("Unlock check for unknown level '{}'", name);
                false
            }
            Some(index) => order[..index].iter().all(|level| self.is_level_completed(level)),
        }
    }

    /// Levels unlocked counting from the first, stopping at the first
    /// locked one.
    pub fn unlocked_level_count(&self, order: &[String]) -> usize {
        match order.iter().position(|level| !self.is_level_completed(level)) {
            // The first incomplete level is itself unlocked
            Some(first_incomplete) => first_incomplete + 1,
            None => order.len(),
        }
    }

    /// The level after `name`, or `None` for the final or an unknown level.
    pub fn next_level<'a>(&self, name: &str, order: &'a [String]) -> Option<&'a str> {
        let index = order.iter().position(|level| level == name)?;
        order.get(index + 1).map(String::as_str)
    }

    /// Forget every completed level.
    pub fn reset_all(&mut self) {
        self.completed.clear();
        if let Err(e) = self.store.delete_key(COMPLETED_LEVELS_KEY) {
            error!("Failed to clear saved progress: {}", e);
        }
        info!("Progress reset");
    }

    pub fn tutorial_shown(&self) -> bool {
        self.store.get_string(TUTORIAL_SHOWN_KEY).as_deref() == Some("1")
    }

    pub fn mark_tutorial_shown(&mut self) {
        if let Err(e) = self.store.set_string(TUTORIAL_SHOWN_KEY, "1") {
            error!("Failed to save tutorial flag: {}", e);
        }
    }

    fn save(&mut self) {
        let list = self.completed.iter().map(String::as_str).collect::<Vec<_>>().join(",");
        match self.store.set_string(COMPLETED_LEVELS_KEY, &list) {
            Ok(()) => info!("Progress saved"),
            Err(e) => error!("Failed to save progress: {}", e),
        }
    }
}

fn parse_completed(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryStore;

    fn order() -> Vec<String> {
        ["Level1", "Level2", "Level3"].map(String::from).to_vec()
    }

    fn progress_with(saved: Option<&str>) -> GameProgress {
        let mut store = MemoryStore::default();
        if let Some(list) = saved {
            store.set_string(COMPLETED_LEVELS_KEY, list).expect("set");
        }
        GameProgress::load(Box::new(store))
    }

    #[test]
    fn unlocks_follow_completion() {
        let levels = order();
        let mut progress = progress_with(None);
        progress.mark_level_complete("Level1");

        assert!(progress.is_level_unlocked("Level1", &levels));
        assert!(progress.is_level_unlocked("Level2", &levels));
        assert!(!progress.is_level_unlocked("Level3", &levels));
        assert!(!progress.is_level_unlocked("Bonus", &levels));
        assert_eq!(progress.unlocked_level_count(&levels), 2);
    }

    #[test]
    fn unlocked_count_stops_at_first_gap() {
        let levels = order();
        let progress = progress_with(Some("Level2,Level3"));
        assert_eq!(progress.unlocked_level_count(&levels), 1);

        let all = progress_with(Some("Level1,Level2,Level3"));
        assert_eq!(all.unlocked_level_count(&levels), 3);
    }

    #[test]
    fn gap_in_saved_progress_keeps_later_levels_locked() {
        let levels = order();
        let progress = progress_with(Some("Level2"));

        assert!(progress.is_level_unlocked("Level1", &levels));
        assert!(!progress.is_level_unlocked("Level2", &levels));
        assert!(!progress.is_level_unlocked("Level3", &levels));

        let unlocked = levels.iter().filter(|level| progress.is_level_unlocked(level, &levels)).count();
        assert_eq!(unlocked, progress.unlocked_level_count(&levels));
    }

    #[test]
    fn saved_list_is_trimmed_and_skips_blanks() {
        let progress = progress_with(Some(" Level1 ,, Level2,"));
        assert!(progress.is_level_completed("Level1"));
        assert!(progress.is_level_completed("Level2"));
        assert_eq!(progress.completed_count(), 2);
    }

    #[test]
    fn completion_is_saved_once_and_ignores_empty_names() {
        let mut progress = progress_with(None);
        progress.mark_level_complete("");
        progress.mark_level_complete("Level1");
        progress.mark_level_complete("Level1");

        assert_eq!(progress.completed_count(), 1);
        assert_eq!(progress.store.get_string(COMPLETED_LEVELS_KEY).as_deref(), Some("Level1"));
    }

    #[test]
    fn next_level_is_none_for_last_or_unknown() {
        let levels = order();
        let progress = progress_with(None);
        assert_eq!(progress.next_level("Level1", &levels), Some("Level2"));
        assert_eq!(progress.next_level("Level3", &levels), None);
        assert_eq!(progress.next_level("Bonus", &levels), None);
    }

    #[test]
    fn reset_clears_memory_and_store() {
        let mut progress = progress_with(Some("Level1"));
        progress.mark_tutorial_shown();
        progress.reset_all();

        assert_eq!(progress.completed_count(), 0);
        assert_eq!(progress.store.get_string(COMPLETED_LEVELS_KEY), None);
        assert!(progress.tutorial_shown());
    }
}
