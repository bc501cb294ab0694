//! Cache layer for recovered diagram descriptions.
//!
//! Recovering a flowchart through the text-generation service is slow and
//! billed per token, so the diagram pipeline keeps every successfully
//! recovered description keyed by a content hash of its input. Two traits
//! make up the API:
//!
//! - [`Cache`]: factory for named buckets
//! - [`CacheBucket`]: string key-value store
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: always miss (caching disabled)
//! - [`FileCache`]: one file per entry, invalidated as a whole by a version string
//!
//! # Example
//!
//! ```
//! use dw_cache::{Cache, NullCache};
//!
//! let bucket = NullCache.bucket("descriptions");
//! bucket.set("3f2a", "Start: Begin\nStart -> End");
//! assert_eq!(bucket.get("3f2a"), None);
//! ```

mod file;

pub use file::FileCache;

/// A named partition within a [`Cache`].
///
/// Implementations must treat every failure as a miss: a cache is an
/// optimisation and never the reason a conversion fails.
pub trait CacheBucket: Send + Sync {
    /// Look up a cached value.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous entry for `key`.
    fn set(&self, key: &str, value: &str);
}

/// Factory for named [`CacheBucket`]s.
pub trait Cache: Send + Sync {
    /// Open or create the bucket called `name`.
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// Bucket that stores nothing.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}
}

/// Cache used when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_never_returns_stored_values() {
        let bucket = NullCache.bucket("descriptions");

        assert_eq!(bucket.get("key"), None);
        bucket.set("key", "A: first");
        assert_eq!(bucket.get("key"), None);
    }
}
