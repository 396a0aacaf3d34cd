//! Campaign leaderboards and the obstacle course record
//!
//! Persisted through `Storage`, tracks the top 10 runs by time and by coins.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, keys, load_json, load_u32, save_json};
use crate::sim::is_ultimate;

/// Maximum entries kept per board
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished campaign run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Completion time in seconds
    pub time: f64,
    pub coins: u32,
    /// Display date captured when the run finished
    pub date: String,
    #[serde(rename = "isUltimateNinja", default)]
    pub ultimate: bool,
}

/// Best-time (ascending) and highest-coins (descending) boards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Leaderboard {
    pub best_time: Vec<LeaderboardEntry>,
    pub highest_coins: Vec<LeaderboardEntry>,
}

/// Where a new entry landed on each board (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub time_rank: Option<usize>,
    pub coins_rank: Option<usize>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run on both boards.
    /// Ties keep the earlier run ahead.
    pub fn add_entry(&mut self, name: &str, time: f64, coins: u32, date: String) -> Placement {
        let entry = LeaderboardEntry {
            name: name.to_string(),
            time,
            coins,
            date,
            ultimate: is_ultimate(time, coins),
        };

        let pos = self.best_time.iter().position(|e| time < e.time);
        let time_rank = insert_ranked(&mut self.best_time, pos, entry.clone());

        let pos = self.highest_coins.iter().position(|e| coins > e.coins);
        let coins_rank = insert_ranked(&mut self.highest_coins, pos, entry);

        Placement {
            time_rank,
            coins_rank,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.best_time.is_empty() && self.highest_coins.is_empty()
    }

    pub fn fastest(&self) -> Option<&LeaderboardEntry> {
        self.best_time.first()
    }

    pub fn richest(&self) -> Option<&LeaderboardEntry> {
        self.highest_coins.first()
    }

    pub fn load(storage: &dyn Storage) -> Self {
        let mut board: Self = load_json(storage, keys::LEADERBOARD);
        // Older saves may be unsorted or overlong
        board.best_time.sort_by(|a, b| a.time.total_cmp(&b.time));
        board.highest_coins.sort_by(|a, b| b.coins.cmp(&a.coins));
        board.best_time.truncate(MAX_HIGH_SCORES);
        board.highest_coins.truncate(MAX_HIGH_SCORES);
        board
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        if save_json(storage, keys::LEADERBOARD, self) {
            log::info!("Leaderboard saved ({} entries)", self.best_time.len());
        }
    }

    /// Clear both boards and their saved copy
    pub fn reset(&mut self, storage: &mut dyn Storage) {
        self.best_time.clear();
        self.highest_coins.clear();
        storage.remove(keys::LEADERBOARD);
    }
}

/// Insert at `pos` (or append), trim, and report the rank if it survived
fn insert_ranked(
    board: &mut Vec<LeaderboardEntry>,
    pos: Option<usize>,
    entry: LeaderboardEntry,
) -> Option<usize> {
    let idx = pos.unwrap_or(board.len());
    if idx >= MAX_HIGH_SCORES {
        return None;
    }
    board.insert(idx, entry);
    board.truncate(MAX_HIGH_SCORES);
    Some(idx + 1)
}

/// Obstacle course high-water mark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseBest {
    pub best: u32,
}

impl CourseBest {
    pub fn load(storage: &dyn Storage) -> Self {
        Self {
            best: load_u32(storage, keys::COURSE_BEST).unwrap_or(0),
        }
    }

    /// Raise the record if `score` beats it, saving immediately.
    /// Returns true if it was a new best.
    pub fn record(&mut self, storage: &mut dyn Storage, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        storage.set(keys::COURSE_BEST, &score.to_string());
        true
    }
}

/// Today's date for a leaderboard entry
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{}/{}/{}",
        date.get_month() + 1,
        date.get_date(),
        date.get_full_year()
    )
}

#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> String {
    "N/A".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn date() -> String {
        "1/1/2026".to_string()
    }

    #[test]
    fn test_boards_sort_independently() {
        let mut lb = Leaderboard::new();
        lb.add_entry("slow-rich", 300.0, 200, date());
        lb.add_entry("fast-poor", 90.0, 20, date());
        lb.add_entry("middle", 150.0, 100, date());

        let names = |v: &[LeaderboardEntry]| v.iter().map(|e| e.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&lb.best_time), ["fast-poor", "middle", "slow-rich"]);
        assert_eq!(names(&lb.highest_coins), ["slow-rich", "middle", "fast-poor"]);
    }

    #[test]
    fn test_ultimate_flag_on_entry() {
        let mut lb = Leaderboard::new();
        lb.add_entry("a", 179.0, 150, date());
        lb.add_entry("b", 181.0, 300, date());
        assert!(lb.fastest().is_some_and(|e| e.ultimate));
        assert!(lb.richest().is_some_and(|e| !e.ultimate));
    }

    #[test]
    fn test_trimmed_to_ten() {
        let mut lb = Leaderboard::new();
        for i in 0..MAX_HIGH_SCORES {
            lb.add_entry("p", 100.0 + i as f64, 50, date());
        }
        let placed = lb.add_entry("late", 500.0, 10, date());
        assert_eq!(placed.time_rank, None);
        assert_eq!(placed.coins_rank, None);
        assert_eq!(lb.best_time.len(), MAX_HIGH_SCORES);

        let placed = lb.add_entry("quick", 1.0, 10, date());
        assert_eq!(placed.time_rank, Some(1));
        assert_eq!(lb.best_time.len(), MAX_HIGH_SCORES);
        assert_eq!(lb.best_time.last().map(|e| e.time), Some(108.0));
    }

    #[test]
    fn test_ties_keep_earlier_run() {
        let mut lb = Leaderboard::new();
        lb.add_entry("first", 100.0, 50, date());
        let placed = lb.add_entry("second", 100.0, 50, date());
        assert_eq!(placed.time_rank, Some(2));
        assert_eq!(placed.coins_rank, Some(2));
    }

    #[test]
    fn test_save_load_reset() {
        let mut s = MemoryStorage::new();
        let mut lb = Leaderboard::new();
        lb.add_entry("a", 100.0, 50, date());
        lb.save(&mut s);

        let json = s.get(keys::LEADERBOARD).unwrap_or_default();
        assert!(json.contains("bestTime"));
        assert!(json.contains("isUltimateNinja"));
        assert_eq!(Leaderboard::load(&s), lb);

        lb.reset(&mut s);
        assert!(lb.is_empty());
        assert!(Leaderboard::load(&s).is_empty());
    }

    #[test]
    fn test_load_legacy_blob() {
        let mut s = MemoryStorage::new();
        s.set(
            keys::LEADERBOARD,
            r#"{"bestTime":[{"name":"b","time":9.5,"coins":1,"date":"x"},
                            {"name":"a","time":3.0,"coins":2,"date":"x"}]}"#,
        );
        let lb = Leaderboard::load(&s);
        assert_eq!(lb.fastest().map(|e| e.name.as_str()), Some("a"));
        assert!(lb.highest_coins.is_empty());
    }

    #[test]
    fn test_course_best() {
        let mut s = MemoryStorage::new();
        let mut best = CourseBest::load(&s);
        assert_eq!(best.best, 0);
        assert!(best.record(&mut s, 5));
        assert!(!best.record(&mut s, 5));
        assert!(!best.record(&mut s, 3));
        assert_eq!(CourseBest::load(&s).best, 5);
    }
}
