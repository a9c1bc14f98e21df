//! In-memory node store.
//!
//! Nodes are kept in insertion order and indexed by type. A node created
//! with an existing id supersedes the old one in place (same position),
//! which keeps iteration order stable across content updates.

mod tracker;

#[cfg(test)]
mod mod_tests;
#[cfg(test)]
mod tracker_tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::{IndexMap, IndexSet};
use sitegraph_core::Node;
use tokio::sync::RwLock;

pub use tracker::NodeTracker;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeStoreError {
    #[error("node has no id")]
    MissingId,

    #[error("node `{0}` has no `internal.type`")]
    MissingType(String),

    /// A plugin tried to supersede a node another plugin owns.
    #[error("node `{id}` is owned by `{owner}`, not `{attempted}`")]
    OwnerMismatch {
        id: String,
        owner: String,
        attempted: String,
    },
}

#[derive(Debug, Default)]
struct StoreInner {
    nodes: IndexMap<String, Arc<Node>>,
    by_type: IndexMap<String, IndexSet<String>>,
}

/// Content records keyed by id, queryable by type.
#[derive(Debug, Default)]
pub struct NodeStore {
    inner: RwLock<StoreInner>,
    /// Bumped on every mutation; caches compare against it.
    generation: AtomicU64,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or supersede a node. Fills in the content digest when missing.
    pub async fn create_node(&self, node: Node) -> Result<Arc<Node>, NodeStoreError> {
        if node.id.is_empty() {
            return Err(NodeStoreError::MissingId);
        }
        if node.type_name().is_empty() {
            return Err(NodeStoreError::MissingType(node.id));
        }
        let node = Arc::new(node.ensure_digest());

        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if let Some(existing) = inner.nodes.get(&node.id) {
            let owner = &existing.internal.owner;
            if !owner.is_empty() && !node.internal.owner.is_empty() && owner != &node.internal.owner
            {
                return Err(NodeStoreError::OwnerMismatch {
                    id: node.id.clone(),
                    owner: owner.clone(),
                    attempted: node.internal.owner.clone(),
                });
            }
            if existing.type_name() != node.type_name()
                && let Some(ids) = inner.by_type.get_mut(existing.type_name())
            {
                ids.shift_remove(&node.id);
            }
        }

        inner
            .by_type
            .entry(node.type_name().to_owned())
            .or_default()
            .insert(node.id.clone());
        inner.nodes.insert(node.id.clone(), Arc::clone(&node));
        self.generation.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(id = %node.id, type_name = node.type_name(), digest = node.digest(), "node created");
        Ok(node)
    }

    pub async fn delete_node(&self, id: &str) -> Option<Arc<Node>> {
        let mut inner = self.inner.write().await;
        let node = inner.nodes.shift_remove(id)?;
        if let Some(ids) = inner.by_type.get_mut(node.type_name()) {
            ids.shift_remove(id);
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(id, "node deleted");
        Some(node)
    }

    pub async fn get_node(&self, id: &str) -> Option<Arc<Node>> {
        self.inner.read().await.nodes.get(id).cloned()
    }

    pub async fn get_nodes(&self) -> Vec<Arc<Node>> {
        self.inner.read().await.nodes.values().cloned().collect()
    }

    pub async fn get_nodes_by_type(&self, type_name: &str) -> Vec<Arc<Node>> {
        let inner = self.inner.read().await;
        let Some(ids) = inner.by_type.get(type_name) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| inner.nodes.get(id).cloned())
            .collect()
    }

    /// Type names that currently have at least one node, in first-seen order.
    pub async fn types(&self) -> Vec<String> {
        self.inner
            .read()
            .await
            .by_type
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.nodes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
