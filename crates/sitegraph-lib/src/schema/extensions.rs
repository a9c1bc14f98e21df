//! Field extensions: named, reusable field behaviors applied with a
//! directive on a field definition (`date: Date @dateformat`).
//!
//! An extension receives the directive options and the field as composed so
//! far, and returns the extended field. Resolvers installed by an extension
//! wrap the field's previous resolver, so extensions stack.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::date::{format_date, parse_date};
use super::types::{ArgDef, FieldDef, FieldResolver, TypeDef, TypeRef};
use super::context::{ResolveParams, Resolver};

pub trait FieldExtension: Send + Sync {
    fn name(&self) -> &str;

    /// Arguments added to the extended field.
    fn args(&self) -> Vec<ArgDef> {
        Vec::new()
    }

    fn extend(&self, options: &Map<String, Value>, field: &FieldDef) -> FieldDef;
}

pub fn builtin_extensions() -> Vec<Arc<dyn FieldExtension>> {
    vec![
        Arc::new(DateformatExtension),
        Arc::new(LinkExtension),
        Arc::new(ProxyExtension),
    ]
}

/// Directives that may appear on field definitions without being extensions.
pub(crate) const RESERVED_FIELD_DIRECTIVES: [&str; 1] = ["deprecated"];

/// `@dateformat(formatString, locale)`: format dates with moment tokens.
///
/// Directive options are the defaults; query arguments override them.
pub struct DateformatExtension;

impl FieldExtension for DateformatExtension {
    fn name(&self) -> &str {
        "dateformat"
    }

    fn args(&self) -> Vec<ArgDef> {
        vec![
            ArgDef::new("formatString", TypeRef::named("String")),
            ArgDef::new("locale", TypeRef::named("String")),
        ]
    }

    fn extend(&self, options: &Map<String, Value>, field: &FieldDef) -> FieldDef {
        let default_format = options
            .get("formatString")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let prev = field.resolver.clone();

        let mut field = field.clone();
        for arg in self.args() {
            let arg = match options.get(&arg.name) {
                Some(default) if !default.is_null() => arg.with_default(default.clone()),
                _ => arg,
            };
            field.args.entry(arg.name.clone()).or_insert(arg);
        }
        field.resolver = FieldResolver::Computed(Resolver::new(move |params: ResolveParams| {
            let prev = prev.clone();
            let format = params
                .arg_str("formatString")
                .map(str::to_owned)
                .or_else(|| default_format.clone());
            async move {
                let value = prev.resolve(params).await?.unwrap_or(Value::Null);
                Ok(match format {
                    Some(format) => format_value(value, &format),
                    None => value,
                })
            }
        }));
        field
    }
}

fn format_value(value: Value, format: &str) -> Value {
    match value {
        Value::String(text) => match parse_date(&text) {
            Some(dt) => Value::String(format_date(&dt, format)),
            None => Value::String(text),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(|v| format_value(v, format)).collect()),
        other => other,
    }
}

/// `@link(by, from)`: treat the stored value as a foreign key into nodes.
///
/// `by` names the node property matched against (default `id`); `from` names
/// the source property holding the keys (default: the field's own name).
pub struct LinkExtension;

impl FieldExtension for LinkExtension {
    fn name(&self) -> &str {
        "link"
    }

    fn extend(&self, options: &Map<String, Value>, field: &FieldDef) -> FieldDef {
        let by = options
            .get("by")
            .and_then(Value::as_str)
            .unwrap_or("id")
            .to_owned();
        let from = options
            .get("from")
            .and_then(Value::as_str)
            .unwrap_or(&field.name)
            .to_owned();
        let target = field.ty.named_type().to_owned();

        let mut field = field.clone();
        field.resolver = FieldResolver::Computed(Resolver::new(move |params: ResolveParams| {
            let by = by.clone();
            let from = from.clone();
            let target = target.clone();
            async move {
                let keys = get_path(&params.source, &from).cloned().unwrap_or(Value::Null);
                let candidates = match params.info.schema.get_type(&target) {
                    Some(TypeDef::Object(_)) if by != "id" => {
                        params.context.node_model.get_all_nodes(Some(&target)).await
                    }
                    _ if by != "id" => params.context.node_model.get_all_nodes(None).await,
                    _ => Vec::new(),
                };
                let link = |key: &Value| {
                    let found = candidates
                        .iter()
                        .find(|n| get_path(n, &by).is_some_and(|v| v == key));
                    found.cloned()
                };
                Ok(match keys {
                    Value::Null => Value::Null,
                    Value::Array(keys) if by == "id" => {
                        let ids: Vec<String> = keys
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_owned)
                            .collect();
                        Value::Array(params.context.node_model.get_nodes_by_ids(&ids).await)
                    }
                    Value::Array(keys) => Value::Array(keys.iter().filter_map(link).collect()),
                    Value::String(id) if by == "id" => params
                        .context
                        .node_model
                        .get_node_by_id(&id)
                        .await
                        .unwrap_or(Value::Null),
                    key => link(&key).unwrap_or(Value::Null),
                })
            }
        }));
        field
    }
}

/// `@proxy(from)`: resolve the field from another (possibly nested) property.
pub struct ProxyExtension;

impl FieldExtension for ProxyExtension {
    fn name(&self) -> &str {
        "proxy"
    }

    fn extend(&self, options: &Map<String, Value>, field: &FieldDef) -> FieldDef {
        let Some(from) = options.get("from").and_then(Value::as_str).map(str::to_owned) else {
            return field.clone();
        };
        let prev = field.resolver.clone();

        let mut field = field.clone();
        field.resolver = FieldResolver::Computed(Resolver::new(move |mut params: ResolveParams| {
            let prev = prev.clone();
            let value = get_path(&params.source, &from).cloned().unwrap_or(Value::Null);
            if let Value::Object(source) = &mut params.source {
                source.insert(params.info.field_name.clone(), value);
            }
            async move { Ok(prev.resolve(params).await?.unwrap_or(Value::Null)) }
        }));
        field
    }
}

/// Dot-separated property lookup. Array segments may be indices.
pub(crate) fn get_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
