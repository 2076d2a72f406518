//! Per-player high score leaderboard
//!
//! One best score per player name, persisted as a JSON object keyed by
//! player. Submissions are validated; a missing or corrupt file reads as an
//! empty board and is rewritten.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::persistence::{ScoreStore, StoreError, write_atomic};

/// Name used when a submission carries no player
pub const ANONYMOUS: &str = "Anonymous";

/// A single player's best
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
    /// When the score was achieved
    pub date: DateTime<Utc>,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    players: BTreeMap<String, ScoreEntry>,
}

/// Validate a raw submitted score.
///
/// Accepts non-negative integers, non-negative numbers (truncated) and
/// strings holding an integer. Everything else is rejected.
pub fn parse_score(raw: &Value) -> Result<u64, StoreError> {
    let invalid = || StoreError::InvalidScore(raw.to_string());

    match raw {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(v)
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f >= 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
                    _ => Err(invalid()),
                }
            }
        }
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a submission. Returns whether the player's best
    /// improved; an invalid score leaves the board untouched.
    pub fn submit(&mut self, player: Option<&str>, raw_score: &Value) -> Result<bool, StoreError> {
        let score = parse_score(raw_score)?;
        let player = match player.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS,
        };
        Ok(self.record(player, score, Utc::now()))
    }

    /// Keep `score` for `player` if it beats their current best (or they
    /// have none yet)
    pub fn record(&mut self, player: &str, score: u64, date: DateTime<Utc>) -> bool {
        match self.players.get_mut(player) {
            Some(entry) if score <= entry.score => false,
            Some(entry) => {
                *entry = ScoreEntry { score, date };
                true
            }
            None => {
                self.players.insert(player.to_string(), ScoreEntry { score, date });
                true
            }
        }
    }

    pub fn best_of(&self, player: &str) -> Option<u64> {
        self.players.get(player).map(|e| e.score)
    }

    /// All players, best first (ties by name)
    pub fn ranking(&self) -> Vec<(&str, &ScoreEntry)> {
        let mut ranked: Vec<_> = self
            .players
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
            .collect();
        // BTreeMap order is by name, so a stable sort keeps ties alphabetical
        ranked.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        ranked
    }

    /// The top `n` of the ranking
    pub fn top(&self, n: usize) -> Vec<(&str, &ScoreEntry)> {
        let mut ranked = self.ranking();
        ranked.truncate(n);
        ranked
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.players.values().map(|e| e.score).max()
    }

    /// Forget every score
    pub fn reset(&mut self) {
        self.players.clear();
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Leaderboard stored in a JSON file
#[derive(Debug, Clone)]
pub struct LeaderboardFile {
    path: PathBuf,
}

impl LeaderboardFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the board. Missing, empty or corrupt files yield an empty board
    /// and are rewritten as one.
    pub fn load(&self) -> Result<Leaderboard, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::InvalidData) => {
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        if let Ok(board) = serde_json::from_str::<Leaderboard>(&raw) {
            log::info!("Loaded {} leaderboard entries", board.len());
            return Ok(board);
        }

        if raw.trim().is_empty() {
            log::info!("No leaderboard at {}, starting fresh", self.path.display());
        } else {
            log::warn!("Leaderboard at {} is corrupt, resetting", self.path.display());
        }
        let board = Leaderboard::new();
        if let Err(e) = self.save(&board) {
            log::error!("Could not repair {}: {}", self.path.display(), e);
        }
        Ok(board)
    }

    pub fn save(&self, board: &Leaderboard) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(board)?;
        write_atomic(&self.path, &data)?;
        log::info!("Leaderboard saved ({} entries)", board.len());
        Ok(())
    }

    /// Load, validate and record one submission, saving on improvement
    pub fn submit(&self, player: Option<&str>, raw_score: &Value) -> Result<Leaderboard, StoreError> {
        let mut board = self.load()?;
        if board.submit(player, raw_score)? {
            self.save(&board)?;
        }
        Ok(board)
    }

    /// Clear every score on disk
    pub fn reset(&self) -> Result<(), StoreError> {
        self.save(&Leaderboard::new())
    }
}

/// Lets the game over gateway commit straight into a player's entry
impl ScoreStore for LeaderboardFile {
    fn load_best(&mut self, key: &str) -> Result<u64, StoreError> {
        Ok(self.load()?.best_of(key).unwrap_or(0))
    }

    fn save_best(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        let mut board = self.load()?;
        if board.record(key, value, Utc::now()) {
            self.save(&board)?;
        }
        Ok(())
    }
}
