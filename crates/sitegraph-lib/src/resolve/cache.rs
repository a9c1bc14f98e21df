//! Caches for resolved nodes.
//!
//! The bulk cache maps a whole `resolve_nodes` request to its result. It is
//! keyed by type, node count and shape, not node identities, so it is
//! dropped whenever the store changes. The per-node cache is keyed by node
//! id, content digest and shape; a superseded node has a new digest and
//! misses. Each per-node key has at most one computation in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, Shared};
use serde_json::Value;

use super::ResolveError;

pub(crate) type PendingResolve = Shared<BoxFuture<'static, Result<Value, ResolveError>>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    pub id: String,
    pub digest: String,
    pub shape: String,
}

pub(crate) enum NodeEntry {
    Resolved(Value),
    Pending(PendingResolve),
}

#[derive(Default)]
struct BulkCache {
    generation: u64,
    entries: HashMap<String, Arc<Vec<Value>>>,
}

/// Resolved-node caches shared by every resolver of one build.
#[derive(Default)]
pub struct ResolverCache {
    bulk: Mutex<BulkCache>,
    nodes: Mutex<HashMap<NodeKey, NodeEntry>>,
}

impl std::fmt::Debug for ResolverCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverCache")
            .field("bulk", &lock(&self.bulk).entries.len())
            .field("nodes", &lock(&self.nodes).len())
            .finish()
    }
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result of a bulk request made at `generation`.
    pub(crate) fn bulk_get(&self, key: &str, generation: u64) -> Option<Arc<Vec<Value>>> {
        let mut bulk = lock(&self.bulk);
        if bulk.generation != generation {
            bulk.entries.clear();
            bulk.generation = generation;
            return None;
        }
        bulk.entries.get(key).cloned()
    }

    pub(crate) fn bulk_insert(&self, key: String, generation: u64, nodes: Arc<Vec<Value>>) {
        let mut bulk = lock(&self.bulk);
        if bulk.generation != generation {
            bulk.entries.clear();
            bulk.generation = generation;
        }
        bulk.entries.insert(key, nodes);
    }

    pub(crate) fn nodes(&self) -> MutexGuard<'_, HashMap<NodeKey, NodeEntry>> {
        lock(&self.nodes)
    }

    /// Number of settled per-node entries.
    pub fn resolved_count(&self) -> usize {
        lock(&self.nodes)
            .values()
            .filter(|e| matches!(e, NodeEntry::Resolved(_)))
            .count()
    }

    /// Number of per-node computations in flight.
    pub fn pending_count(&self) -> usize {
        lock(&self.nodes)
            .values()
            .filter(|e| matches!(e, NodeEntry::Pending(_)))
            .count()
    }

    pub fn bulk_count(&self) -> usize {
        lock(&self.bulk).entries.len()
    }

    pub fn clear(&self) {
        let mut bulk = lock(&self.bulk);
        bulk.entries.clear();
        lock(&self.nodes).clear();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
