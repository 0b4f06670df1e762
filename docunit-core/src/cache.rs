//! Memoization of compiled units per (source, file) pair.

use docunit_types::CompileResult;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Exact-match cache key
///
/// The full source text is stored and compared, so two different sources
/// can never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    source: String,
    file: PathBuf,
}

impl CacheKey {
    pub fn new(source: &str, file: &Path) -> Self {
        Self {
            source: source.to_string(),
            file: file.to_path_buf(),
        }
    }
}

/// Statistics about cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Bounded LRU cache of compile results, safe to share across tasks
///
/// Lives for one build or dev session; clear it whenever configuration that
/// affects rendering changes.
#[derive(Debug)]
pub struct CompileCache {
    entries: Mutex<LruCache<CacheKey, Arc<CompileResult>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CompileCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<CompileResult>> {
        let found = self.entries.lock().get(key).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, key: CacheKey, result: Arc<CompileResult>) {
        self.entries.lock().put(key, result);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for CompileCache {
    fn default() -> Self {
        Self::new(1024)
    }
}
