//! Local fallback copy of the board.
//!
//! A single slot, last write wins. Reads never fail: a missing or unreadable
//! slot is simply absent.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};
use taskpulse_core::board::EntityGraph;

use crate::error::{BoardSyncError, Result};

/// File name of the cache slot.
pub const CACHE_SLOT_FILE: &str = "taskpulse_data_cache.json";

pub trait LocalCache: Send + Sync {
    fn write(&self, graph: &EntityGraph) -> Result<()>;

    fn read(&self) -> Option<EntityGraph>;
}

/// Slot stored as a JSON file, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileLocalCache {
    path: PathBuf,
}

impl FileLocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot file [`CACHE_SLOT_FILE`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CACHE_SLOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalCache for FileLocalCache {
    fn write(&self, graph: &EntityGraph) -> Result<()> {
        let body = serde_json::to_vec(graph)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| BoardSyncError::cache(format!("{}: {}", parent.display(), e)))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .map_err(|e| BoardSyncError::cache(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| BoardSyncError::cache(format!("{}: {}", self.path.display(), e)))?;
        debug!("[BoardSync] Cached board at {}", self.path.display());
        Ok(())
    }

    fn read(&self) -> Option<EntityGraph> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("[BoardSync] Failed to read cache {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice(&contents) {
            Ok(graph) => Some(graph),
            Err(e) => {
                warn!("[BoardSync] Ignoring corrupt cache {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// Slot held in memory.
#[derive(Debug, Default)]
pub struct MemoryLocalCache {
    slot: Mutex<Option<EntityGraph>>,
}

impl MemoryLocalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(graph: EntityGraph) -> Self {
        Self {
            slot: Mutex::new(Some(graph)),
        }
    }
}

impl LocalCache for MemoryLocalCache {
    fn write(&self, graph: &EntityGraph) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| BoardSyncError::cache("memory cache lock poisoned"))?;
        *slot = Some(graph.clone());
        Ok(())
    }

    fn read(&self) -> Option<EntityGraph> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpulse_core::board::{default_graph, Group};
    use tempfile::tempdir;

    #[test]
    fn file_cache_last_write_wins() {
        let dir = tempdir().unwrap();
        let cache = FileLocalCache::in_dir(dir.path());
        assert!(cache.read().is_none());

        let first = default_graph();
        cache.write(&first).unwrap();
        assert_eq!(cache.read(), Some(first));

        let second = EntityGraph {
            groups: vec![Group {
                id: "g9".to_string(),
                name: "Only".to_string(),
            }],
            ..Default::default()
        };
        cache.write(&second).unwrap();
        assert_eq!(cache.read(), Some(second));
        assert!(!cache.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_slot_reads_as_absent() {
        let dir = tempdir().unwrap();
        let cache = FileLocalCache::in_dir(dir.path());
        fs::write(cache.path(), b"{\"tasks\": [").unwrap();
        assert!(cache.read().is_none());
    }

    #[test]
    fn file_cache_write_fails_when_slot_is_a_directory() {
        let dir = tempdir().unwrap();
        let slot = dir.path().join(CACHE_SLOT_FILE);
        fs::create_dir(&slot).unwrap();
        let cache = FileLocalCache::new(slot);
        assert!(matches!(
            cache.write(&EntityGraph::default()),
            Err(BoardSyncError::Cache(_))
        ));
    }

    #[test]
    fn memory_cache_round_trip() {
        let cache = MemoryLocalCache::new();
        assert!(cache.read().is_none());
        cache.write(&default_graph()).unwrap();
        assert_eq!(cache.read().map(|g| g.tasks.len()), Some(6));
    }
}
