//! On-disk cache for fetched directory data.
//!
//! A cache entry is a directory owned by whoever created it (a tantivy
//! index, a JSON file). An entry is fresh while the newest modification
//! time among the entry directory and its immediate files is within the
//! caller's max age; stale entries are removed wholesale and rebuilt.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::error::{ConfigError, Result};

/// A per-application cache directory.
pub struct CacheSpace {
    root: PathBuf,
}

impl CacheSpace {
    /// Open the cache space for `app_id` under the user cache directory,
    /// creating it if necessary.
    pub fn application(app_id: &str) -> Result<Self> {
        let base = dirs::cache_dir().ok_or(ConfigError::CacheDir)?;
        Self::at(base.join(app_id))
    }

    /// Open a cache space at an explicit root.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Load the entry `id` if it is fresh, otherwise wipe it and rebuild it.
    ///
    /// `load` opens an existing entry directory; `create` receives an empty
    /// entry directory and populates it.
    pub async fn get_or_create<T, L, C, LFut, CFut>(
        &self,
        id: &str,
        max_age: Duration,
        load: L,
        create: C,
    ) -> Result<T>
    where
        L: FnOnce(PathBuf) -> LFut,
        LFut: Future<Output = Result<T>>,
        C: FnOnce(PathBuf) -> CFut,
        CFut: Future<Output = Result<T>>,
    {
        let dir = self.root.join(id);
        if is_fresh(&dir, max_age) {
            debug!(entry = id, "cache hit");
            return load(dir).await;
        }
        if dir.exists() {
            debug!(entry = id, "cache entry stale, rebuilding");
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;
        create(dir).await
    }
}

fn is_fresh(dir: &Path, max_age: Duration) -> bool {
    let Ok(meta) = std::fs::metadata(dir) else {
        return false;
    };
    let mut newest = match meta.modified() {
        Ok(t) => t,
        Err(e) => {
            warn!(dir = %dir.display(), "no modification time: {e}");
            return false;
        }
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    for entry in entries.flatten() {
        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            newest = newest.max(modified);
        }
    }
    match SystemTime::now().duration_since(newest) {
        Ok(age) => age <= max_age,
        // mtime in the future counts as fresh
        Err(_) => true,
    }
}
