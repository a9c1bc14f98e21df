//! What resolvers receive: the parent value, arguments, a context with
//! access to the node store, and metadata about the field being resolved.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use sitegraph_core::Node;

use super::Schema;
use super::types::TypeRef;
use crate::resolve::ResolveError;
use crate::store::NodeStore;

/// Read access to the node store for resolvers.
#[derive(Debug, Clone)]
pub struct NodeModel {
    store: Arc<NodeStore>,
}

impl NodeModel {
    pub fn new(store: Arc<NodeStore>) -> Self {
        Self { store }
    }

    pub async fn get_node_by_id(&self, id: &str) -> Option<Value> {
        self.store.get_node(id).await.map(|n| n.to_value())
    }

    /// Nodes for `ids` in the given order; unknown ids are skipped.
    pub async fn get_nodes_by_ids(&self, ids: &[String]) -> Vec<Value> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(node) = self.store.get_node(id).await {
                out.push(node.to_value());
            }
        }
        out
    }

    /// Every node, or every node of one type.
    pub async fn get_all_nodes(&self, type_name: Option<&str>) -> Vec<Value> {
        let nodes = match type_name {
            Some(name) => self.store.get_nodes_by_type(name).await,
            None => self.store.get_nodes().await,
        };
        nodes.iter().map(|n| n.to_value()).collect()
    }

    /// Stored nodes of one type, as stored.
    pub async fn nodes_of_type(&self, type_name: &str) -> Vec<Arc<Node>> {
        self.store.get_nodes_by_type(type_name).await
    }

    /// Changes every time a node is created or deleted.
    pub fn generation(&self) -> u64 {
        self.store.generation()
    }
}

#[derive(Debug, Clone)]
pub struct ResolverContext {
    pub node_model: NodeModel,
}

impl ResolverContext {
    pub fn new(store: Arc<NodeStore>) -> Self {
        Self {
            node_model: NodeModel::new(store),
        }
    }
}

/// Metadata about the field being resolved.
#[derive(Debug, Clone)]
pub struct ResolveInfo {
    pub field_name: String,
    pub parent_type: String,
    pub return_type: TypeRef,
    pub schema: Arc<Schema>,
}

#[derive(Debug, Clone)]
pub struct ResolveParams {
    pub source: Value,
    pub args: Map<String, Value>,
    pub context: ResolverContext,
    pub info: ResolveInfo,
}

impl ResolveParams {
    /// Argument value, `None` when absent or null.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }

    pub fn arg_str(&self, name: &str) -> Option<&str> {
        self.arg(name).and_then(Value::as_str)
    }
}

type ResolverFn = dyn Fn(ResolveParams) -> BoxFuture<'static, Result<Value, ResolveError>> + Send + Sync;

/// A computed field's resolver function.
#[derive(Clone)]
pub struct Resolver(Arc<ResolverFn>);

impl Resolver {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ResolveParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolveError>> + Send + 'static,
    {
        Resolver(Arc::new(move |params| f(params).boxed()))
    }

    /// Resolver that computes its value without suspending.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&ResolveParams) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        Resolver(Arc::new(move |params| {
            let result = f(&params);
            futures::future::ready(result).boxed()
        }))
    }

    pub fn call(&self, params: ResolveParams) -> BoxFuture<'static, Result<Value, ResolveError>> {
        (self.0)(params)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resolver")
    }
}

type TypeResolverFn = dyn Fn(&Value) -> Option<String> + Send + Sync;

/// Picks the concrete object type of a value returned for an abstract type.
#[derive(Clone)]
pub struct TypeResolver(Arc<TypeResolverFn>);

impl TypeResolver {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        TypeResolver(Arc::new(f))
    }

    pub fn resolve(&self, value: &Value) -> Option<String> {
        (self.0)(value)
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeResolver")
    }
}
