//! Memoized member resolution.
//!
//! Entries are keyed by (type id, scope, normalized name). Resolution is
//! pure, so two engines racing to fill the same key store equivalent values
//! and the map needs no coordination beyond its own sharding.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::host::HostType;
use crate::resolver::{MemberScope, ResolvedMember, resolve};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    type_id: u64,
    scope: MemberScope,
    name: String,
}

/// A concurrent (type, name) -> member cache.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<CacheKey, ResolvedMember, FxBuildHasher>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by engines that don't isolate theirs.
    pub fn global() -> Arc<ResolutionCache> {
        static GLOBAL: OnceLock<Arc<ResolutionCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ResolutionCache::new())))
    }

    /// Resolve `key` against `ty`, consulting the cache first.
    ///
    /// Misses (including [`ResolvedMember::Undefined`]) are stored so that
    /// repeat lookups short-circuit.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn get_or_resolve(&self, ty: &HostType, key: &str, scope: MemberScope) -> ResolvedMember {
        let cache_key = CacheKey {
            type_id: ty.id(),
            scope,
            name: key.to_string(),
        };
        if let Some(hit) = self.entries.get(&cache_key) {
            tracing::trace!(ty = ty.name(), key, ?scope, "resolution cache hit");
            return hit.value().clone();
        }
        tracing::trace!(ty = ty.name(), key, ?scope, "resolution cache miss");
        let resolved = resolve(ty, key, scope);
        self.entries.insert(cache_key, resolved.clone());
        resolved
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
