//! High score leaderboard
//!
//! Top 10 final scores, highest first, persisted as a JSON array of integers.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;

/// Persistence collaborator for the leaderboard
pub trait LeaderboardStore {
    /// Load stored scores. Missing or malformed data yields an empty list.
    fn load(&self) -> Vec<u64>;
    /// Replace stored scores
    fn save(&mut self, scores: &[u64]);
}

/// High score leaderboard, always sorted descending and capped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    scores: Vec<u64>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Build from arbitrary stored data, restoring order and cap
    pub fn from_scores(mut scores: Vec<u64>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { scores }
    }

    /// Parse the stored JSON form; malformed input gives an empty board
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<u64>>(json) {
            Ok(scores) => Self::from_scores(scores),
            Err(e) => {
                log::warn!("Discarding malformed leaderboard data: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.scores).unwrap_or_else(|_| "[]".to_string())
    }

    /// Get the rank a score would achieve (1-indexed, None if it would fall off)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let rank = self
            .scores
            .iter()
            .position(|&s| score > s)
            .unwrap_or(self.scores.len())
            + 1;
        (rank <= MAX_HIGH_SCORES).then_some(rank)
    }

    /// Add a final score.
    /// Returns the rank achieved (1-indexed) or None if it didn't make the top 10.
    pub fn add_score(&mut self, score: u64) -> Option<usize> {
        // Ties keep earlier scores ahead
        let pos = self
            .scores
            .iter()
            .position(|&s| score > s)
            .unwrap_or(self.scores.len());
        self.scores.insert(pos, score);
        self.scores.truncate(MAX_HIGH_SCORES);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.scores.first().copied()
    }

    /// Load through a store
    pub fn load(store: &dyn LeaderboardStore) -> Self {
        let board = Self::from_scores(store.load());
        log::info!("Loaded {} high scores", board.len());
        board
    }

    /// Save through a store
    pub fn save(&self, store: &mut dyn LeaderboardStore) {
        store.save(&self.scores);
        log::info!("High scores saved ({} entries)", self.scores.len());
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw JSON, as if written by an earlier session
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Vec<u64> {
        self.json
            .as_deref()
            .map(|json| Leaderboard::from_json(json).scores)
            .unwrap_or_default()
    }

    fn save(&mut self, scores: &[u64]) {
        self.json = Some(Leaderboard::from_scores(scores.to_vec()).to_json());
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "snowballLeaderboard";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl LeaderboardStore for LocalStorageStore {
    fn load(&self) -> Vec<u64> {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                return Leaderboard::from_json(&json).scores;
            }
        }
        log::info!("No high scores found, starting fresh");
        Vec::new()
    }

    fn save(&mut self, scores: &[u64]) {
        if let Some(storage) = Self::storage() {
            let json = Leaderboard::from_scores(scores.to_vec()).to_json();
            if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                log::warn!("Failed to write high scores to LocalStorage");
            }
        }
    }
}
