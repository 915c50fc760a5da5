//! Leaderboard collaborator
//!
//! One entry per player (their best), sorted descending, top 10 kept.

use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;
/// Anything above this is treated as tampering
pub const MAX_PLAUSIBLE_SCORE: u64 = 100_000;
/// Longest accepted player name (characters, after trimming)
pub const MAX_IDENTIFIER_LEN: usize = 16;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub identifier: String,
    pub score: u64,
}

/// Remote or local score table
pub trait Leaderboard {
    /// Submit a run. `Ok(true)` if it became the player's new best.
    fn submit_score(&mut self, identifier: &str, score: u64) -> Result<bool, LeaderboardError>;

    /// Top `n` entries, highest first
    fn fetch_top_entries(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Smallest score worth submitting
    fn min_score(&self) -> u64 {
        1
    }
}

/// Trimmed identifier, or a rejection
pub fn validate_identifier(identifier: &str) -> Result<&str, LeaderboardError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return Err(LeaderboardError::Rejected("empty name".into()));
    }
    if trimmed.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(LeaderboardError::Rejected(format!(
            "name longer than {} characters",
            MAX_IDENTIFIER_LEN
        )));
    }
    Ok(trimmed)
}

/// In-process leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalLeaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl LocalLeaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best score on record for a player
    pub fn best_for(&self, identifier: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.identifier == identifier)
            .map(|e| e.score)
    }

    /// Rank (1-indexed) a player currently holds
    pub fn rank_of(&self, identifier: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.identifier == identifier)
            .map(|i| i + 1)
    }
}

impl Leaderboard for LocalLeaderboard {
    fn submit_score(&mut self, identifier: &str, score: u64) -> Result<bool, LeaderboardError> {
        let identifier = validate_identifier(identifier)?;
        if score == 0 || score > MAX_PLAUSIBLE_SCORE {
            log::debug!("Score {} out of range, not submitted", score);
            return Ok(false);
        }

        if let Some(best) = self.best_for(identifier) {
            if score <= best {
                return Ok(false);
            }
            self.entries.retain(|e| e.identifier != identifier);
        }

        // Find insertion point (sorted descending by score)
        let entry = LeaderboardEntry {
            identifier: identifier.to_string(),
            score,
        };
        match self.entries.iter().position(|e| score > e.score) {
            Some(i) => self.entries.insert(i, entry),
            None => self.entries.push(entry),
        }
        self.entries.truncate(MAX_ENTRIES);

        log::info!("Leaderboard: {} scored {}", identifier, score);
        Ok(true)
    }

    fn fetch_top_entries(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(n).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_descending() {
        let mut board = LocalLeaderboard::new();
        board.submit_score("ana", 12).unwrap();
        board.submit_score("bo", 30).unwrap();
        board.submit_score("cy", 20).unwrap();

        let top = board.fetch_top_entries(10).unwrap();
        let scores: Vec<u64> = top.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20, 12]);
        assert_eq!(board.top_score(), Some(30));
        assert_eq!(board.rank_of("cy"), Some(2));
        assert_eq!(board.fetch_top_entries(2).unwrap().len(), 2);
    }

    #[test]
    fn test_only_personal_best_accepted() {
        let mut board = LocalLeaderboard::new();
        assert!(board.submit_score("ana", 10).unwrap());
        assert!(!board.submit_score("ana", 10).unwrap());
        assert!(!board.submit_score("ana", 4).unwrap());
        assert!(board.submit_score("ana", 11).unwrap());
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.best_for("ana"), Some(11));
    }

    #[test]
    fn test_bounds_validation() {
        let mut board = LocalLeaderboard::new();
        // Out-of-range scores are declined, not errors
        assert!(!board.submit_score("ana", 0).unwrap());
        assert!(!board.submit_score("ana", MAX_PLAUSIBLE_SCORE + 1).unwrap());
        assert!(board.submit_score("   ", 5).is_err());
        assert!(board.submit_score("a-very-long-player-name", 5).is_err());
        assert!(board.is_empty());

        // Names are trimmed
        assert!(board.submit_score("  ana ", 5).unwrap());
        assert_eq!(board.best_for("ana"), Some(5));
        assert!(board.submit_score("bo", MAX_PLAUSIBLE_SCORE).unwrap());
    }

    #[test]
    fn test_capped_at_max_entries() {
        let mut board = LocalLeaderboard::new();
        for i in 0..15u64 {
            board.submit_score(&format!("p{}", i), i + 1).unwrap();
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.top_score(), Some(15));
        assert_eq!(board.entries.last().map(|e| e.score), Some(6));
    }
}
