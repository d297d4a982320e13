use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::debug;

struct CachedFile<V> {
    modified: SystemTime,
    value: Arc<V>,
}

/// Memoizes values parsed from files, keyed on path and stamped with the
/// file's modification time. A changed stamp forces a reload.
#[derive(Clone)]
pub struct FileCache<V>
where
    V: Send + Sync,
{
    inner: Arc<Mutex<HashMap<PathBuf, CachedFile<V>>>>,
}

impl<V> FileCache<V>
where
    V: Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<V>>
    where
        F: FnOnce(&Path) -> Result<V>,
    {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to stat {}", path.display()))?;

        let mut cache = self.inner.lock().await;
        if let Some(entry) = cache.get(path) {
            if entry.modified == modified {
                debug!(path = %path.display(), "Cache HIT");
                return Ok(Arc::clone(&entry.value));
            }
            debug!(path = %path.display(), "Cache STALE");
        } else {
            debug!(path = %path.display(), "Cache MISS");
        }

        let value = Arc::new(load(path)?);
        cache.insert(
            path.to_path_buf(),
            CachedFile {
                modified,
                value: Arc::clone(&value),
            },
        );
        Ok(value)
    }

    pub async fn invalidate(&self, path: &Path) {
        let mut cache = self.inner.lock().await;
        if cache.remove(path).is_some() {
            debug!(path = %path.display(), "Cache INVALIDATE");
        }
    }
}

impl<V> Default for FileCache<V>
where
    V: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
