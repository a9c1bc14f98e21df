//! Cached resolution of requested fields over stored nodes.
//!
//! [`NodeResolver::resolve_nodes`] takes a set of nodes and a [`FieldShape`]
//! and returns each node with the requested fields resolved: computed fields
//! run their resolver, stored fields are read off the node, and nested
//! object shapes recurse with the nested type's fields. Results are cached
//! per request and per node.

mod cache;
mod shape;

#[cfg(test)]
mod shape_tests;

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use serde_json::{Map, Value};
use sitegraph_core::Node;

pub use cache::ResolverCache;
pub use shape::FieldShape;

use cache::{NodeEntry, NodeKey};

use crate::schema::{FieldDef, ResolveInfo, ResolveParams, ResolverContext, Schema, TypeDef};
use crate::store::NodeTracker;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to resolve `{type_name}.{field}`: {message}")]
    Field {
        type_name: String,
        field: String,
        message: String,
    },

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("{0}")]
    Custom(String),
}

impl ResolveError {
    pub fn msg(message: impl Into<String>) -> Self {
        ResolveError::Custom(message.into())
    }

    /// Attach the failing field to a bare message.
    pub fn in_field(self, type_name: &str, field: &str) -> Self {
        match self {
            ResolveError::Custom(message) => ResolveError::Field {
                type_name: type_name.to_owned(),
                field: field.to_owned(),
                message,
            },
            other => other,
        }
    }
}

/// Resolves node fields against one schema, sharing caches across calls.
#[derive(Debug, Clone)]
pub struct NodeResolver {
    schema: Arc<Schema>,
    context: ResolverContext,
    cache: Arc<ResolverCache>,
    tracker: Arc<NodeTracker>,
}

impl NodeResolver {
    pub fn new(
        schema: Arc<Schema>,
        context: ResolverContext,
        cache: Arc<ResolverCache>,
        tracker: Arc<NodeTracker>,
    ) -> Self {
        Self {
            schema,
            context,
            cache,
            tracker,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn context(&self) -> &ResolverContext {
        &self.context
    }

    /// Resolve `shape` on every node of `nodes`, all of type `type_name`.
    ///
    /// An identical request made while the store is unchanged returns the
    /// same cached sequence. Nodes resolve concurrently; a failing node
    /// fails the request once its siblings have settled, and nothing from
    /// a failed request is cached.
    pub async fn resolve_nodes(
        &self,
        nodes: &[Arc<Node>],
        type_name: &str,
        first_only: bool,
        shape: &FieldShape,
    ) -> Result<Arc<Vec<Value>>, ResolveError> {
        if self.schema.fields_of(type_name).is_none() {
            return Err(ResolveError::UnknownType(type_name.to_owned()));
        }

        let generation = self.context.node_model.generation();
        let bulk_key = bulk_key(type_name, first_only, nodes.len(), shape);
        if let Some(cached) = self.cache.bulk_get(&bulk_key, generation) {
            tracing::trace!(type_name, nodes = nodes.len(), "bulk cache hit");
            return Ok(cached);
        }

        let signature = shape.signature();
        let resolved = join_all(
            nodes
                .iter()
                .map(|node| self.resolve_node(node.clone(), type_name, shape, &signature)),
        )
        .await;
        let resolved: Vec<Value> = resolved.into_iter().collect::<Result<_, _>>()?;

        let resolved = Arc::new(resolved);
        self.cache.bulk_insert(bulk_key, generation, resolved.clone());
        Ok(resolved)
    }

    async fn resolve_node(
        &self,
        node: Arc<Node>,
        type_name: &str,
        shape: &FieldShape,
        signature: &str,
    ) -> Result<Value, ResolveError> {
        let fresh = self
            .resolve_object(type_name.to_owned(), node.to_value(), shape.clone())
            .boxed();
        if node.digest().is_empty() {
            let value = fresh.await?;
            self.tracker.track_inline_objects(&value);
            return Ok(value);
        }

        let key = NodeKey {
            id: node.id.clone(),
            digest: node.digest().to_owned(),
            shape: signature.to_owned(),
        };
        let (pending, owner) = {
            let mut entries = self.cache.nodes();
            match entries.get(&key) {
                Some(NodeEntry::Resolved(value)) => return Ok(value.clone()),
                Some(NodeEntry::Pending(pending)) => (pending.clone(), false),
                None => {
                    let pending = fresh.shared();
                    entries.insert(key.clone(), NodeEntry::Pending(pending.clone()));
                    (pending, true)
                }
            }
        };

        let result = pending.await;
        if owner {
            let mut entries = self.cache.nodes();
            match &result {
                Ok(value) => {
                    entries.insert(key, NodeEntry::Resolved(value.clone()));
                    drop(entries);
                    self.tracker.track_inline_objects(value);
                }
                Err(_) => {
                    entries.remove(&key);
                }
            }
        }
        result
    }

    /// `source` with the fields of `shape` resolved. Fields the type does
    /// not define are left alone.
    fn resolve_object(
        &self,
        type_name: String,
        source: Value,
        shape: FieldShape,
    ) -> BoxFuture<'static, Result<Value, ResolveError>> {
        let this = self.clone();
        async move {
            let Some(fields) = this.schema.fields_of(&type_name) else {
                return Ok(source);
            };
            let requests: Vec<_> = shape
                .iter()
                .filter_map(|(name, sub)| {
                    let def = fields.get(name)?.clone();
                    Some(this.resolve_field(&type_name, source.clone(), def, sub.cloned()))
                })
                .collect();
            let results = join_all(requests).await;

            let Value::Object(mut out) = source else {
                return Ok(source);
            };
            for result in results {
                let (name, value) = result?;
                if let Some(value) = value {
                    out.insert(name, value);
                }
            }
            Ok(Value::Object(out))
        }
        .boxed()
    }

    fn resolve_field(
        &self,
        type_name: &str,
        source: Value,
        def: FieldDef,
        sub: Option<FieldShape>,
    ) -> BoxFuture<'static, Result<(String, Option<Value>), ResolveError>> {
        let this = self.clone();
        let type_name = type_name.to_owned();
        async move {
            let params = ResolveParams {
                source,
                args: default_args(&def),
                context: this.context.clone(),
                info: ResolveInfo {
                    field_name: def.name.clone(),
                    parent_type: type_name.clone(),
                    return_type: def.ty.clone(),
                    schema: this.schema.clone(),
                },
            };
            let value = def
                .resolver
                .resolve(params)
                .await
                .map_err(|e| e.in_field(&type_name, &def.name))?;

            let value = match (value, sub) {
                (Some(value), Some(sub)) if !value.is_null() => {
                    let inner = def.ty.named_type().to_owned();
                    Some(this.resolve_nested(inner, value, sub).await?)
                }
                (value, _) => value,
            };
            Ok((def.name, value))
        }
        .boxed()
    }

    /// Recurse into object values and lists of them, however deeply nested.
    fn resolve_nested(
        &self,
        type_name: String,
        value: Value,
        shape: FieldShape,
    ) -> BoxFuture<'static, Result<Value, ResolveError>> {
        let this = self.clone();
        async move {
            match value {
                Value::Array(items) => {
                    let items = join_all(
                        items
                            .into_iter()
                            .map(|item| this.resolve_nested(type_name.clone(), item, shape.clone())),
                    )
                    .await;
                    Ok(Value::Array(items.into_iter().collect::<Result<_, _>>()?))
                }
                Value::Object(_) if matches!(this.schema.get_type(&type_name), Some(TypeDef::Object(_))) => {
                    this.resolve_object(type_name, value, shape).await
                }
                other => Ok(other),
            }
        }
        .boxed()
    }
}

/// Argument defaults only; node resolution passes no query arguments.
fn default_args(def: &FieldDef) -> Map<String, Value> {
    def.args
        .values()
        .filter_map(|a| a.default_value.clone().map(|v| (a.name.clone(), v)))
        .collect()
}

fn bulk_key(type_name: &str, first_only: bool, len: usize, shape: &FieldShape) -> String {
    let mut key = Map::new();
    key.insert("typeName".into(), Value::String(type_name.to_owned()));
    key.insert("firstOnly".into(), Value::Bool(first_only));
    key.insert("nodesLength".into(), Value::from(len));
    key.insert("fields".into(), shape.to_value());
    Value::Object(key).to_string()
}
