//! Lifetime statistics
//!
//! The session reports each finished run here and reads back the best total
//! for its high-score display. Storage is pluggable via [`StatsStore`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::sim::RunSummary;

/// Combined score that unlocks the one-shot achievement
pub const ACHIEVEMENT_THRESHOLD: u64 = 100;

/// Totals across all runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub games_played: u64,
    pub total_pipes: u64,
    pub total_coins: u64,
    pub total_diamonds: u64,
    /// Best single-run pipe score
    pub best_pipes: u32,
    /// Best single-run coin score
    pub best_coins: u32,
    /// Best single-run pipes + coins
    pub best_total: u64,
    pub best_combo: u32,
    /// Set once, never cleared except by a full reset
    pub achievement_unlocked: bool,
}

impl Statistics {
    /// Fold one run into the totals. Returns true if this run unlocked the
    /// achievement.
    pub fn record(&mut self, run: &RunSummary, achievement_threshold: u64) -> bool {
        self.games_played += 1;
        self.total_pipes += u64::from(run.pipe_score);
        self.total_coins += u64::from(run.coin_score);
        self.total_diamonds += u64::from(run.diamonds);

        self.best_pipes = self.best_pipes.max(run.pipe_score);
        self.best_coins = self.best_coins.max(run.coin_score);
        self.best_total = self.best_total.max(run.total());
        self.best_combo = self.best_combo.max(run.max_combo);

        if !self.achievement_unlocked && run.total() >= achievement_threshold {
            self.achievement_unlocked = true;
            return true;
        }
        false
    }
}

/// Persistence backend for [`Statistics`]
pub trait StatsStore {
    fn load(&mut self) -> Result<Statistics, StorageError>;

    fn save(&mut self, stats: &Statistics) -> Result<(), StorageError>;

    fn achievement_threshold(&self) -> u64 {
        ACHIEVEMENT_THRESHOLD
    }

    /// Record a finished run and return the updated totals
    fn record_game_result(&mut self, run: &RunSummary) -> Result<Statistics, StorageError> {
        let mut stats = self.load()?;
        if stats.record(run, self.achievement_threshold()) {
            log::info!("Achievement unlocked: {} combined points", run.total());
        }
        self.save(&stats)?;
        Ok(stats)
    }

    /// Wipe all totals
    fn reset_totals(&mut self) -> Result<Statistics, StorageError> {
        let fresh = Statistics::default();
        self.save(&fresh)?;
        log::info!("Statistics reset");
        Ok(fresh)
    }
}

/// Keeps statistics in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    stats: Statistics,
}

impl MemoryStatsStore {
    pub fn new(stats: Statistics) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&mut self) -> Result<Statistics, StorageError> {
        Ok(self.stats.clone())
    }

    fn save(&mut self, stats: &Statistics) -> Result<(), StorageError> {
        self.stats = stats.clone();
        Ok(())
    }
}

/// JSON file on disk. A missing file reads as fresh statistics.
#[derive(Debug, Clone)]
pub struct JsonFileStatsStore {
    path: PathBuf,
}

impl JsonFileStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatsStore for JsonFileStatsStore {
    fn load(&mut self) -> Result<Statistics, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Statistics::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, stats: &Statistics) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(stats)?)?;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStatsStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStatsStore {
    const STORAGE_KEY: &'static str = "sky_hopper_stats";

    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("localStorage not accessible".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl StatsStore for LocalStorageStatsStore {
    fn load(&mut self) -> Result<Statistics, StorageError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(serde_json::from_str(&json)?),
            Ok(None) => Ok(Statistics::default()),
            Err(_) => Err(StorageError::Unavailable("localStorage read failed".into())),
        }
    }

    fn save(&mut self, stats: &Statistics) -> Result<(), StorageError> {
        let json = serde_json::to_string(stats)?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StorageError::Unavailable("localStorage write failed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pipe_score: u32, coin_score: u32, diamonds: u32, max_combo: u32) -> RunSummary {
        RunSummary {
            pipe_score,
            coin_score,
            diamonds,
            max_combo,
        }
    }

    #[test]
    fn test_record_accumulates_and_tracks_bests() {
        let mut stats = Statistics::default();
        stats.record(&run(10, 4, 1, 3), 100);
        stats.record(&run(3, 9, 0, 5), 100);

        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.total_pipes, 13);
        assert_eq!(stats.total_coins, 13);
        assert_eq!(stats.total_diamonds, 1);
        assert_eq!(stats.best_pipes, 10);
        assert_eq!(stats.best_coins, 9);
        assert_eq!(stats.best_total, 14);
        assert_eq!(stats.best_combo, 5);
        assert!(!stats.achievement_unlocked);
    }

    #[test]
    fn test_achievement_is_one_shot() {
        let mut stats = Statistics::default();
        assert!(!stats.record(&run(50, 49, 0, 0), 100));
        assert!(stats.record(&run(60, 40, 0, 0), 100));
        assert!(stats.achievement_unlocked);
        assert!(!stats.record(&run(200, 0, 0, 0), 100));
        assert!(stats.achievement_unlocked);
    }

    #[test]
    fn test_memory_store_contract() {
        let mut store = MemoryStatsStore::default();
        let updated = store.record_game_result(&run(2, 3, 0, 1)).unwrap();
        assert_eq!(updated.best_total, 5);
        assert_eq!(store.stats().games_played, 1);

        let fresh = store.reset_totals().unwrap();
        assert_eq!(fresh, Statistics::default());
        assert_eq!(store.load().unwrap(), Statistics::default());
    }

    #[test]
    fn test_json_file_store() {
        let dir = std::env::temp_dir().join(format!("sky_hopper_stats_{}", std::process::id()));
        let mut store = JsonFileStatsStore::new(dir.join("stats.json"));

        assert_eq!(store.load().unwrap(), Statistics::default());
        store.record_game_result(&run(7, 1, 1, 2)).unwrap();

        let mut reopened = JsonFileStatsStore::new(dir.join("stats.json"));
        let stats = reopened.load().unwrap();
        assert_eq!(stats.best_total, 8);
        assert_eq!(stats.total_diamonds, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = std::env::temp_dir().join(format!("sky_hopper_corrupt_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stats.json");
        std::fs::write(&path, "{ nope").unwrap();

        let mut store = JsonFileStatsStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Serialize(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
