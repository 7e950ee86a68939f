use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use super::error::{LoadError, Result};
use super::loader::load_file;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Memoized load
// ---------------------------------------------------------------------------

/// Process-lifetime cache of loaded datasets keyed by canonical path.
///
/// Datasets are immutable once loaded, so sessions share them through `Arc`
/// without further synchronization. Failed loads are never cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on first use.
    ///
    /// The lock is not held while the file is parsed. When two sessions miss
    /// on the same path at once, the first dataset stored wins and both get it.
    pub fn load(&self, path: &Path) -> Result<Arc<Dataset>> {
        let key = cache_key(path)?;

        if let Some(dataset) = self.lock().get(&key) {
            log::debug!("Dataset cache hit for {}", key.display());
            return Ok(Arc::clone(dataset));
        }

        log::debug!("Dataset cache miss for {}", key.display());
        let loaded = Arc::new(load_file(&key)?);
        let dataset = Arc::clone(self.lock().entry(key).or_insert(loaded));
        Ok(dataset)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<Dataset>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop the cached entry for `path` so the next [`load`](Self::load)
    /// re-reads the file. Returns whether an entry was removed.
    pub fn invalidate(&self, path: &Path) -> bool {
        let Ok(key) = cache_key(path) else {
            return false;
        };
        self.lock().remove(&key).is_some()
    }
}

fn cache_key(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// The cache shared by every session of this process.
pub fn global() -> &'static DatasetCache {
    static CACHE: OnceLock<DatasetCache> = OnceLock::new();
    CACHE.get_or_init(DatasetCache::new)
}

/// Load `path` through the process-wide cache.
pub fn load_cached(path: &Path) -> Result<Arc<Dataset>> {
    global().load(path)
}
