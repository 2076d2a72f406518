//! File-backed best scores, one small JSON document per key

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{BestScoreRecord, ScoreStore, StoreError, write_atomic};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Per-user data directory for the game, if the platform has one
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "dino-dash", "DinoDash")
            .map(|p| p.data_local_dir().to_path_buf())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`; anything outside `[A-Za-z0-9_-]` becomes `_`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let name = if name.is_empty() { "_".to_string() } else { name };
        self.dir.join(format!("{}.json", name))
    }

    /// Reset a bad record to 0. Failure to heal is logged, never raised.
    fn repair(&self, path: &Path) {
        let result = BestScoreRecord::encode(0).and_then(|json| write_atomic(path, json.as_bytes()));
        if let Err(e) = result {
            log::error!("Could not repair {}: {}", path.display(), e);
        }
    }
}

impl ScoreStore for FileStore {
    fn load_best(&mut self, key: &str) -> Result<u64, StoreError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No best score at {}, starting fresh", path.display());
                self.repair(&path);
                return Ok(0);
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => String::new(),
            Err(e) => return Err(e.into()),
        };

        match BestScoreRecord::parse(&raw) {
            Some(best) => Ok(best),
            None => {
                log::warn!("Best score at {} is corrupt, resetting to 0", path.display());
                self.repair(&path);
                Ok(0)
            }
        }
    }

    fn save_best(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let json = BestScoreRecord::encode(value)?;
        write_atomic(&path, json.as_bytes())?;
        log::info!("Best score saved to {} ({})", path.display(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ScoreGateway;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("scores")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_reads_zero_and_heals() {
        let (_dir, mut store) = store();
        assert_eq!(store.load_best("score").unwrap(), 0);

        let healed = fs::read_to_string(store.path_for("score")).unwrap();
        assert_eq!(BestScoreRecord::parse(&healed), Some(0));
    }

    #[test]
    fn test_corrupt_file_is_repaired() {
        let (_dir, mut store) = store();
        let path = store.path_for("score");

        for garbage in ["", "{", "null", "[]", r#"{"highScore": "ten"}"#, r#"{"highScore": -5}"#] {
            fs::write(&path, garbage).unwrap();
            assert_eq!(store.load_best("score").unwrap(), 0, "input {:?}", garbage);
            assert_eq!(
                BestScoreRecord::parse(&fs::read_to_string(&path).unwrap()),
                Some(0)
            );
        }

        // Non-UTF-8 bytes are corrupt too
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert_eq!(store.load_best("score").unwrap(), 0);
    }

    #[test]
    fn test_gateway_over_file_store() {
        let (_dir, store) = store();
        let mut gateway = ScoreGateway::new(store, "score");

        gateway.maybe_commit(42).unwrap();
        let path = gateway.store().path_for("score");
        let before = fs::read_to_string(&path).unwrap();

        gateway.maybe_commit(10).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(gateway.best(), 42);
    }

    #[test]
    fn test_keys_are_sanitized() {
        let (_dir, store) = store();
        let path = store.path_for("../evil name");
        assert_eq!(path.parent().unwrap(), store.dir());
        assert_eq!(path.file_name().unwrap(), "___evil_name.json");
    }
}
