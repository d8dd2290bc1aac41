use crate::{
    error::MappingError,
    row::{RowSignature, RowType},
};
use dashmap::DashMap;
use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicUsize, Ordering},
};

///
/// CacheStats
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

///
/// RowTypeCache
///
/// Signature-keyed row types. Entries are created lazily and never evicted;
/// every configuration with the same signature shares one `Arc<RowType>`.
///
/// Synthesis runs outside the map's shard locks. When two callers synthesize
/// the same signature concurrently, the first insert wins and the loser's
/// type is dropped.
///

#[derive(Debug, Default)]
pub struct RowTypeCache {
    types: DashMap<RowSignature, Arc<RowType>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

static GLOBAL: OnceLock<Arc<RowTypeCache>> = OnceLock::new();

impl RowTypeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by configurations that do not inject their own.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    #[must_use]
    pub fn get(&self, signature: &RowSignature) -> Option<Arc<RowType>> {
        self.types.get(signature).map(|entry| Arc::clone(entry.value()))
    }

    /// Return the cached row type for `signature`, synthesizing it with `build`
    /// on a miss.
    pub fn get_or_create<F>(
        &self,
        signature: &RowSignature,
        build: F,
    ) -> Result<Arc<RowType>, MappingError>
    where
        F: FnOnce() -> Result<RowType, MappingError>,
    {
        if let Some(existing) = self.get(signature) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(signature = %signature, "row type cache hit");
            return Ok(existing);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let built = Arc::new(build()?);

        let stored = Arc::clone(
            self.types
                .entry(signature.clone())
                .or_insert_with(|| Arc::clone(&built))
                .value(),
        );

        if Arc::ptr_eq(&stored, &built) {
            tracing::debug!(
                signature = %signature,
                row_type = stored.name(),
                columns = stored.columns().len(),
                "row type synthesized"
            );
        } else {
            tracing::debug!(
                signature = %signature,
                "row type synthesis lost race; using cached type"
            );
        }

        Ok(stored)
    }

    // Stats are best-effort; relaxed atomics are enough.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.types.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Drop every cached type and reset the counters. Configurations built
    /// earlier keep their own handles.
    pub fn clear(&self) {
        self.types.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
