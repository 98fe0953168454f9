//! Leaderboard ("Hall of Fame")
//!
//! Persisted to LocalStorage as a bare JSON array of `{name, score, kills}`,
//! capped at the top 8 scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, StoreError};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 8;

/// Name used when the player leaves the field blank
pub const DEFAULT_NAME: &str = "Pilot";

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub kills: u32,
}

/// Top-N list, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "sg_leaderboard";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary rows, restoring order and cap
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Check if a score would make the list
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score. Returns the rank achieved (1-indexed), or None if it
    /// fell off the bottom. Equal scores rank after existing ones.
    pub fn add_score(&mut self, name: &str, score: u64, kills: u32) -> Option<usize> {
        let name = match name.trim() {
            "" => DEFAULT_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };
        let entry = LeaderboardEntry { name, score, kills };

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_ENTRIES);

        (pos < MAX_ENTRIES).then_some(pos + 1)
    }

    /// Load from storage; malformed data yields an empty list
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw: Vec<LeaderboardEntry> = persistence::load_json(store, Self::STORAGE_KEY);
        let board = Self::from_entries(raw);
        log::info!("Loaded {} leaderboard entries", board.len());
        board
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}
