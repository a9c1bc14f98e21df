//! Execution of compiled operations.
//!
//! Root node fields (`all<Type>`, `<type>(id:)`) go through
//! [`NodeResolver::resolve_nodes`] with a shape built from the selection:
//! fields requested without arguments are resolved and cached there, and
//! execution then reads them straight off the resolved nodes. Everything
//! else runs its field resolver with the query's arguments.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::plan::{Condition, Field, Operation, Selection};
use super::validate::TYPENAME_FIELD;
use crate::resolve::{FieldShape, NodeResolver};
use crate::schema::{FieldDef, NodeQuery, ResolveInfo, ResolveParams, TypeDef, TypeRef};

/// A field that failed; its value in `data` is `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Response keys and list indices joined by `.`.
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone)]
pub struct Executor {
    resolver: NodeResolver,
}

impl Executor {
    pub fn new(resolver: NodeResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &NodeResolver {
        &self.resolver
    }

    /// Run `operation`. A failing field is reported and nulled; its
    /// siblings still complete.
    pub async fn execute(&self, operation: &Operation, variables: Map<String, Value>) -> ExecutionResult {
        let variables = operation.coerce_variables(variables);
        let errors = Mutex::new(Vec::new());
        let run = Run {
            resolver: &self.resolver,
            variables: &variables,
            errors: &errors,
        };

        let root = self.resolver.schema().query_type_name().to_owned();
        let selections: Vec<&Selection> = operation.selections.iter().collect();
        let data = run
            .selection_set(root, Value::Object(Map::new()), selections, None, String::new())
            .await;

        let errors = errors.into_inner().unwrap_or_else(PoisonError::into_inner);
        ExecutionResult { data, errors }
    }
}

/// State shared by every field of one execution.
#[derive(Clone, Copy)]
struct Run<'a> {
    resolver: &'a NodeResolver,
    variables: &'a Map<String, Value>,
    errors: &'a Mutex<Vec<FieldError>>,
}

impl<'a> Run<'a> {
    fn fail(self, path: &str, message: String) {
        tracing::debug!(path, "{message}");
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(FieldError {
                path: path.to_owned(),
                message,
            });
    }

    fn selection_set(
        self,
        type_name: String,
        value: Value,
        selections: Vec<&'a Selection>,
        shape: Option<&'a FieldShape>,
        path: String,
    ) -> BoxFuture<'a, Value> {
        async move {
            if value.is_null() {
                return Value::Null;
            }
            let Some(concrete) = self.concrete_type(&type_name, &value) else {
                self.fail(
                    &path,
                    format!("Abstract type `{type_name}` must resolve to an object type at runtime."),
                );
                return Value::Null;
            };

            let mut grouped = IndexMap::new();
            self.collect_fields(&concrete, selections, &mut grouped);

            let fields = join_all(grouped.into_iter().map(|(key, fields)| {
                let field_path = join_path(&path, &key);
                let (concrete, value) = (&concrete, &value);
                async move { (key, self.field(concrete, value, fields, shape, field_path).await) }
            }))
            .await;
            Value::Object(fields.into_iter().collect())
        }
        .boxed()
    }

    async fn field(
        self,
        parent_type: &str,
        parent: &Value,
        fields: Vec<&'a Field>,
        shape: Option<&'a FieldShape>,
        path: String,
    ) -> Value {
        let Some(first) = fields.first().copied() else {
            return Value::Null;
        };
        if first.name == TYPENAME_FIELD {
            return Value::String(parent_type.to_owned());
        }
        let schema = self.resolver.schema();
        let Some(def) = schema.field(parent_type, &first.name) else {
            return Value::Null;
        };
        let selections: Vec<&'a Selection> = fields.iter().flat_map(|f| f.selections.iter()).collect();

        if let Some(query) = &def.node_query {
            return self.node_query(query, first, selections, path).await;
        }

        let prefetched = shape.filter(|s| s.contains(&first.name));
        let value = if prefetched.is_some() {
            parent.get(&first.name).cloned().unwrap_or(Value::Null)
        } else {
            let params = ResolveParams {
                source: parent.clone(),
                args: self.arguments(def, first),
                context: self.resolver.context().clone(),
                info: ResolveInfo {
                    field_name: def.name.clone(),
                    parent_type: parent_type.to_owned(),
                    return_type: def.ty.clone(),
                    schema: schema.clone(),
                },
            };
            match def.resolver.resolve(params).await {
                Ok(value) => value.unwrap_or(Value::Null),
                Err(err) => {
                    self.fail(&path, err.in_field(parent_type, &def.name).to_string());
                    return Value::Null;
                }
            }
        };

        let sub_shape = prefetched.and_then(|s| s.sub(&first.name));
        self.complete(def.ty.clone(), value, selections, sub_shape, path).await
    }

    /// `all<Type>` and `<type>(id:)`.
    async fn node_query(
        self,
        query: &'a NodeQuery,
        field: &'a Field,
        selections: Vec<&'a Selection>,
        path: String,
    ) -> Value {
        let args: Map<String, Value> = field
            .arguments
            .iter()
            .map(|(name, value)| (name.clone(), value.resolve(self.variables)))
            .collect();

        let mut shape = self.prefetch_shape(&query.type_name, &selections);
        if query.first_only {
            shape.insert("id", None);
        }
        let nodes = self
            .resolver
            .context()
            .node_model
            .nodes_of_type(&query.type_name)
            .await;
        let resolved = match self
            .resolver
            .resolve_nodes(&nodes, &query.type_name, query.first_only, &shape)
            .await
        {
            Ok(resolved) => resolved,
            Err(err) => {
                self.fail(&path, err.to_string());
                return Value::Null;
            }
        };

        let shape = &shape;
        if query.first_only {
            let id = args.get("id").and_then(Value::as_str);
            let found = resolved
                .iter()
                .find(|node| id.is_none_or(|id| node.get("id").and_then(Value::as_str) == Some(id)));
            return match found {
                Some(node) => {
                    self.selection_set(query.type_name.clone(), node.clone(), selections, Some(shape), path)
                        .await
                }
                None => Value::Null,
            };
        }

        let skip = args.get("skip").and_then(Value::as_u64).unwrap_or(0) as usize;
        let limit = args
            .get("limit")
            .and_then(Value::as_u64)
            .map_or(usize::MAX, |l| l as usize);
        let items = join_all(resolved.iter().enumerate().skip(skip).take(limit).map(|(i, node)| {
            self.selection_set(
                query.type_name.clone(),
                node.clone(),
                selections.clone(),
                Some(shape),
                join_path(&path, &i.to_string()),
            )
        }))
        .await;
        Value::Array(items)
    }

    fn complete(
        self,
        ty: TypeRef,
        value: Value,
        selections: Vec<&'a Selection>,
        shape: Option<&'a FieldShape>,
        path: String,
    ) -> BoxFuture<'a, Value> {
        async move {
            if value.is_null() {
                return Value::Null;
            }
            match ty {
                TypeRef::NonNull(inner) => self.complete(*inner, value, selections, shape, path).await,
                TypeRef::List(inner) => {
                    let items = match value {
                        Value::Array(items) => items,
                        single => vec![single],
                    };
                    let items = join_all(items.into_iter().enumerate().map(|(i, item)| {
                        self.complete(
                            (*inner).clone(),
                            item,
                            selections.clone(),
                            shape,
                            join_path(&path, &i.to_string()),
                        )
                    }))
                    .await;
                    Value::Array(items)
                }
                TypeRef::Named(name) => {
                    let is_leaf = self
                        .resolver
                        .schema()
                        .get_type(&name)
                        .is_none_or(TypeDef::is_leaf);
                    if is_leaf || selections.is_empty() {
                        value
                    } else {
                        self.selection_set(name, value, selections, shape, path).await
                    }
                }
            }
        }
        .boxed()
    }

    /// Object type of `value` when it is returned as `type_name`.
    fn concrete_type(self, type_name: &str, value: &Value) -> Option<String> {
        let schema = self.resolver.schema();
        let def = schema.get_type(type_name)?;
        if !def.is_abstract() {
            return Some(type_name.to_owned());
        }
        let candidates = [
            value.pointer("/internal/type").and_then(Value::as_str).map(str::to_owned),
            value.get(TYPENAME_FIELD).and_then(Value::as_str).map(str::to_owned),
            def.resolve_type().and_then(|r| r.resolve(value)),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|c| schema.object(c).is_some() && schema.is_possible_type(type_name, c))
    }

    fn collect_fields(
        self,
        type_name: &str,
        selections: impl IntoIterator<Item = &'a Selection>,
        out: &mut IndexMap<String, Vec<&'a Field>>,
    ) {
        for selection in selections {
            match selection {
                Selection::Field(field) => {
                    if self.included(&field.conditions) {
                        out.entry(field.response_key().to_owned())
                            .or_default()
                            .push(field);
                    }
                }
                Selection::InlineFragment(fragment) => {
                    let applies = fragment
                        .type_condition
                        .as_deref()
                        .is_none_or(|c| self.resolver.schema().is_possible_type(c, type_name));
                    if applies && self.included(&fragment.conditions) {
                        self.collect_fields(type_name, &fragment.selections, out);
                    }
                }
            }
        }
    }

    fn included(self, conditions: &[Condition]) -> bool {
        conditions.iter().all(|c| c.passes(self.variables))
    }

    fn arguments(self, def: &FieldDef, field: &Field) -> Map<String, Value> {
        let mut args: Map<String, Value> = def
            .args
            .values()
            .filter_map(|a| a.default_value.clone().map(|v| (a.name.clone(), v)))
            .collect();
        for (name, value) in &field.arguments {
            args.insert(name.clone(), value.resolve(self.variables));
        }
        args
    }

    /// Fields of `type_name` that can be resolved ahead of execution.
    ///
    /// A field qualifies when no occurrence of it passes arguments. Object
    /// fields carry their nested shape; other fields are leaves.
    fn prefetch_shape(self, type_name: &str, selections: &[&Selection]) -> FieldShape {
        let mut shape = FieldShape::new();
        let mut with_args = HashSet::new();
        self.collect_shape(type_name, selections.iter().copied(), &mut shape, &mut with_args);
        for name in &with_args {
            shape.remove(name);
        }
        shape
    }

    fn collect_shape<'s>(
        self,
        type_name: &str,
        selections: impl IntoIterator<Item = &'s Selection>,
        shape: &mut FieldShape,
        with_args: &mut HashSet<String>,
    ) {
        let schema = self.resolver.schema();
        for selection in selections {
            match selection {
                Selection::Field(field) => {
                    let Some(def) = schema.field(type_name, &field.name) else {
                        continue;
                    };
                    if !field.arguments.is_empty() {
                        with_args.insert(field.name.clone());
                        continue;
                    }
                    let nested = def.ty.named_type();
                    if !field.selections.is_empty() && schema.object(nested).is_some() {
                        let selections: Vec<&Selection> = field.selections.iter().collect();
                        let sub = self.prefetch_shape(nested, &selections);
                        shape.insert(field.name.clone(), Some(sub));
                    } else {
                        shape.insert(field.name.clone(), None);
                    }
                }
                Selection::InlineFragment(fragment) => {
                    if fragment.type_condition.as_deref().is_none_or(|c| c == type_name) {
                        self.collect_shape(type_name, &fragment.selections, shape, with_args);
                    }
                }
            }
        }
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}
