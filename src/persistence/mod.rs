//! Best-score persistence
//!
//! Features:
//! - `ScoreStore` contract: `load_best(key)` / `save_best(key, value)`
//! - Read-repair: a missing or malformed record reads as 0 and is rewritten
//! - Atomic file writes (tmp → rename)
//! - `ScoreGateway::maybe_commit`, the single write point on game over

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key used when a single, unnamed best score is tracked
pub const DEFAULT_KEY: &str = "score";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid score: {0}")]
    InvalidScore(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable home for best scores, keyed by player or game
pub trait ScoreStore {
    /// Read the best score for `key`. Missing or unreadable records yield 0.
    fn load_best(&mut self, key: &str) -> Result<u64, StoreError>;
    /// Overwrite the best score for `key`
    fn save_best(&mut self, key: &str, value: u64) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load_best(&mut self, key: &str) -> Result<u64, StoreError> {
        (**self).load_best(key)
    }

    fn save_best(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        (**self).save_best(key, value)
    }
}

/// On-disk / in-storage shape of a best score record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BestScoreRecord {
    #[serde(rename = "highScore")]
    pub high_score: u64,
}

impl BestScoreRecord {
    /// Parse a stored record; `None` means missing, empty or corrupt
    pub fn parse(raw: &str) -> Option<u64> {
        if raw.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<BestScoreRecord>(raw)
            .ok()
            .map(|r| r.high_score)
    }

    pub fn encode(high_score: u64) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&BestScoreRecord { high_score })?)
    }
}

/// Write `data` next to `path` and rename it into place
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    // Replaces any existing record in one step
    fs::rename(&tmp, path)?;
    Ok(())
}

/// In-process store, for tests and as a fallback when nothing durable exists
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    scores: HashMap<String, u64>,
    /// Number of successful `save_best` calls
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(key: &str, value: u64) -> Self {
        let mut store = Self::new();
        store.scores.insert(key.to_string(), value);
        store
    }
}

impl ScoreStore for MemoryStore {
    fn load_best(&mut self, key: &str) -> Result<u64, StoreError> {
        Ok(self.scores.get(key).copied().unwrap_or(0))
    }

    fn save_best(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        self.scores.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

/// Result of a game over commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The run beat the stored best and was written
    Improved { previous: u64, best: u64 },
    /// The stored best stands; nothing was written
    Kept { best: u64 },
}

impl CommitOutcome {
    pub fn best(&self) -> u64 {
        match *self {
            CommitOutcome::Improved { best, .. } | CommitOutcome::Kept { best } => best,
        }
    }
}

/// Compares finished runs against the stored best and persists improvements
#[derive(Debug)]
pub struct ScoreGateway<S> {
    store: S,
    key: String,
}

impl<S: ScoreStore> ScoreGateway<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Stored best, or 0 if the store cannot be read at all
    pub fn best(&mut self) -> u64 {
        match self.store.load_best(&self.key) {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not read best score for '{}': {}", self.key, e);
                0
            }
        }
    }

    /// Persist `current` if and only if it beats the stored best. A best
    /// that cannot be read is never overwritten.
    pub fn maybe_commit(&mut self, current: u64) -> Result<CommitOutcome, StoreError> {
        let previous = self.store.load_best(&self.key)?;
        if current <= previous {
            return Ok(CommitOutcome::Kept { best: previous });
        }

        self.store.save_best(&self.key, current)?;
        log::info!(
            "New best score for '{}': {} (was {})",
            self.key,
            current,
            previous
        );
        Ok(CommitOutcome::Improved {
            previous,
            best: current,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_only_on_improvement() {
        let mut gateway = ScoreGateway::new(MemoryStore::with_score(DEFAULT_KEY, 50), DEFAULT_KEY);

        assert_eq!(gateway.maybe_commit(30).unwrap(), CommitOutcome::Kept { best: 50 });
        assert_eq!(gateway.maybe_commit(50).unwrap(), CommitOutcome::Kept { best: 50 });
        assert_eq!(gateway.store().writes, 0);

        assert_eq!(
            gateway.maybe_commit(90).unwrap(),
            CommitOutcome::Improved {
                previous: 50,
                best: 90
            }
        );
        assert_eq!(gateway.store().writes, 1);
        assert_eq!(gateway.store_mut().load_best(DEFAULT_KEY).unwrap(), 90);
    }

    /// Holds a best it cannot currently read back
    struct Unreadable {
        inner: MemoryStore,
    }

    impl ScoreStore for Unreadable {
        fn load_best(&mut self, _key: &str) -> Result<u64, StoreError> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
        }

        fn save_best(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
            self.inner.save_best(key, value)
        }
    }

    #[test]
    fn test_unreadable_best_is_not_overwritten() {
        let store = Unreadable {
            inner: MemoryStore::with_score(DEFAULT_KEY, 500),
        };
        let mut gateway = ScoreGateway::new(store, DEFAULT_KEY);

        assert!(matches!(gateway.maybe_commit(10), Err(StoreError::Io(_))));
        assert_eq!(gateway.store().inner.writes, 0);
        assert_eq!(gateway.store_mut().inner.load_best(DEFAULT_KEY).unwrap(), 500);
        // Display still falls back to 0
        assert_eq!(gateway.best(), 0);
    }

    #[test]
    fn test_write_replaces_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("score.json");
        write_atomic(&path, b"{\"highScore\":1}").unwrap();
        write_atomic(&path, b"{\"highScore\":2}").unwrap();

        assert_eq!(BestScoreRecord::parse(&fs::read_to_string(&path).unwrap()), Some(2));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_key_reads_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_best("nobody").unwrap(), 0);
    }

    #[test]
    fn test_record_parse() {
        assert_eq!(BestScoreRecord::parse(r#"{"highScore": 12}"#), Some(12));
        assert_eq!(BestScoreRecord::parse(""), None);
        assert_eq!(BestScoreRecord::parse("   \n"), None);
        assert_eq!(BestScoreRecord::parse(r#"{"highScore": -3}"#), None);
        assert_eq!(BestScoreRecord::parse("garbage"), None);
        assert_eq!(
            BestScoreRecord::encode(7).unwrap(),
            r#"{"highScore":7}"#.to_string()
        );
    }

    /// A store whose writes always fail
    struct ReadOnly;

    impl ScoreStore for ReadOnly {
        fn load_best(&mut self, _key: &str) -> Result<u64, StoreError> {
            Ok(10)
        }

        fn save_best(&mut self, _key: &str, _value: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
    }

    #[test]
    fn test_failed_write_is_reported() {
        let mut gateway = ScoreGateway::new(ReadOnly, DEFAULT_KEY);
        assert!(matches!(
            gateway.maybe_commit(20),
            Err(StoreError::Unavailable(_))
        ));
        // Not an improvement, so no write is attempted
        assert!(gateway.maybe_commit(5).is_ok());
    }
}
