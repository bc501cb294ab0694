//! File-backed cache.
//!
//! Layout on disk:
//!
//! ```text
//! {root}/
//! +-- VERSION              # cache format/prompt version
//! +-- descriptions/        # bucket
//!     +-- 9b1c...e4        # one UTF-8 file per key
//! ```
//!
//! When the stored `VERSION` differs from the one passed to
//! [`FileCache::new`] the whole root is wiped, so changing the recovery prompt
//! or model naturally invalidates older answers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Cache, CacheBucket};

/// File-based [`Cache`] rooted at a directory.
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open the cache at `root`, wiping it if its version differs from `version`.
    ///
    /// Never fails: I/O problems are logged and the cache degrades to misses.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        ensure_version(&root, version);
        Self { root }
    }

    /// Root directory of this cache.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    /// Keys are hex digests in practice; anything that could escape the bucket
    /// directory is refused.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(key))
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key)?;
        fs::read_to_string(path).ok()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(path) = self.entry_path(key) else {
            tracing::debug!(key, "refusing to cache entry with unsafe key");
            return;
        };
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::debug!(error = %e, "failed to create cache bucket directory");
            return;
        }
        if let Err(e) = fs::write(&path, value) {
            tracing::debug!(error = %e, path = %path.display(), "failed to write cache entry");
        }
    }
}

fn ensure_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!("cache version matches: {version}");
            return;
        }
        Ok(stored) => {
            tracing::info!("cache version changed ({stored} -> {version}), clearing cache");
        }
        Err(_) => {
            tracing::debug!("initializing cache at {}", root.display());
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to clear cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}
