//! Type inference over stored nodes.
//!
//! All nodes of one type are sampled together. Each field gets the most
//! specific type consistent with every observed value; values of
//! incompatible kinds are a conflict, reported and typed as `JSON`.

mod conflicts;

#[cfg(test)]
mod conflicts_tests;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use sitegraph_core::utils::to_pascal_case;
use sitegraph_core::{NODE_LINK_SUFFIX, Node};

pub use conflicts::{ObservedShape, TypeConflict, TypeConflictReporter};

use crate::schema::date::is_date;
use crate::schema::{FieldDef, ObjectType, TypeRef};

/// Fields every node carries outside its content; typed by the `Node` interface.
pub const NODE_FIELDS: [&str; 4] = ["id", "parent", "children", "internal"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Boolean,
    Number,
    String,
    Object,
    Array,
}

#[derive(Clone, Copy)]
struct Sample<'a> {
    value: &'a Value,
    node_id: &'a str,
}

/// Infers the object types for one node type.
pub struct TypeInferrer<'a> {
    /// Node id → type name, for typing `___NODE` links.
    link_types: &'a HashMap<String, String>,
    /// Names taken by node types; nested object types must not reuse them.
    node_types: HashSet<&'a str>,
    reporter: &'a mut TypeConflictReporter,
    root: String,
    nested: Vec<ObjectType>,
}

impl<'a> TypeInferrer<'a> {
    pub fn new(
        link_types: &'a HashMap<String, String>,
        reporter: &'a mut TypeConflictReporter,
    ) -> Self {
        Self {
            link_types,
            node_types: link_types.values().map(String::as_str).collect(),
            reporter,
            root: String::new(),
            nested: Vec::new(),
        }
    }

    /// Object types for `type_name`: the node type first, then nested types.
    ///
    /// The node type holds content fields only; the composer adds the
    /// `Node` interface fields.
    pub fn infer(mut self, type_name: &str, nodes: &[Arc<Node>]) -> Vec<ObjectType> {
        self.root = type_name.to_owned();
        let objects: Vec<(&Map<String, Value>, &str)> =
            nodes.iter().map(|n| (&n.fields, n.id.as_str())).collect();
        let root = self.infer_object(type_name, type_name, &objects);

        let mut out = Vec::with_capacity(self.nested.len() + 1);
        out.push(root);
        out.append(&mut self.nested);
        out
    }

    fn infer_object(
        &mut self,
        type_name: &str,
        path: &str,
        objects: &[(&Map<String, Value>, &str)],
    ) -> ObjectType {
        // Bookkeeping names are reserved on the node itself only; nested
        // objects keep every key.
        let at_root = path == self.root;
        let mut keys: IndexSet<&str> = IndexSet::new();
        for (map, _) in objects {
            keys.extend(
                map.keys()
                    .map(String::as_str)
                    .filter(|k| !at_root || !NODE_FIELDS.contains(k)),
            );
        }

        let mut object = ObjectType::new(type_name);
        for key in keys {
            let samples: Vec<Sample> = objects
                .iter()
                .filter_map(|(map, node_id)| {
                    map.get(key).map(|value| Sample { value, node_id })
                })
                .collect();

            let field = match key.strip_suffix(NODE_LINK_SUFFIX) {
                Some(link_name) if !link_name.is_empty() => self.infer_link(link_name, key, &samples),
                _ => self.infer_property(type_name, path, key, &samples),
            };
            object.fields.insert(field.name.clone(), field);
        }
        object
    }

    fn infer_property(
        &mut self,
        parent_type: &str,
        path: &str,
        key: &str,
        samples: &[Sample],
    ) -> FieldDef {
        let name = sanitize_field_name(key);
        let ty = self.infer_field(parent_type, &format!("{path}.{key}"), &name, samples, 0);
        let mut field = FieldDef::new(name, ty);
        if field.name != key {
            field.extensions.insert("proxy".into(), options(&[("from", key)]));
        }
        if field.ty.named_type() == "Date" {
            field.extensions.insert("dateformat".into(), Map::new());
        }
        field
    }

    fn infer_field(
        &mut self,
        parent_type: &str,
        path: &str,
        field_name: &str,
        samples: &[Sample],
        depth: usize,
    ) -> TypeRef {
        let mut kinds: IndexMap<Kind, Sample> = IndexMap::new();
        for sample in samples {
            if let Some(kind) = kind_of(sample.value) {
                kinds.entry(kind).or_insert(*sample);
            }
        }

        let kind = match kinds.len() {
            0 => return TypeRef::named("JSON"),
            1 => kinds.keys().next().copied(),
            _ => None,
        };
        let Some(kind) = kind else {
            self.report_conflict(path, &kinds, depth);
            return TypeRef::named("JSON");
        };

        let present = samples.iter().filter(|s| kind_of(s.value).is_some());
        match kind {
            Kind::Boolean => TypeRef::named("Boolean"),
            Kind::Number => {
                let all_int = present.clone().all(|s| is_int(s.value));
                TypeRef::named(if all_int { "Int" } else { "Float" })
            }
            Kind::String => {
                let all_dates = present
                    .clone()
                    .all(|s| s.value.as_str().is_some_and(is_date));
                TypeRef::named(if all_dates { "Date" } else { "String" })
            }
            Kind::Object => {
                let name = self.nested_type_name(parent_type, field_name);
                let objects: Vec<(&Map<String, Value>, &str)> = present
                    .filter_map(|s| s.value.as_object().map(|m| (m, s.node_id)))
                    .collect();
                let nested = self.infer_object(&name, path, &objects);
                self.nested.push(nested);
                TypeRef::named(name)
            }
            Kind::Array => {
                let items: Vec<Sample> = present
                    .flat_map(|s| {
                        s.value
                            .as_array()
                            .into_iter()
                            .flatten()
                            .map(move |value| Sample {
                                value,
                                node_id: s.node_id,
                            })
                    })
                    .collect();
                TypeRef::list(self.infer_field(parent_type, path, field_name, &items, depth + 1))
            }
        }
    }

    /// `{Parent}{Field}`, numbered when a node type already has that name.
    fn nested_type_name(&self, parent_type: &str, field_name: &str) -> String {
        let base = format!("{}{}", parent_type, to_pascal_case(field_name));
        if !self.node_types.contains(base.as_str()) {
            return base;
        }
        let mut suffix = 2;
        let mut name = format!("{base}{suffix}");
        while self.node_types.contains(name.as_str()) {
            suffix += 1;
            name = format!("{base}{suffix}");
        }
        tracing::debug!(node_type = %base, nested = %name, "renamed nested type clashing with a node type");
        name
    }

    fn infer_link(&mut self, link_name: &str, key: &str, samples: &[Sample]) -> FieldDef {
        let mut is_list = false;
        let mut targets: IndexSet<&str> = IndexSet::new();
        for sample in samples {
            let ids: Vec<&Value> = match sample.value {
                Value::Array(items) => {
                    is_list = true;
                    items.iter().collect()
                }
                other => vec![other],
            };
            for id in ids.into_iter().filter_map(Value::as_str) {
                if let Some(target) = self.link_types.get(id) {
                    targets.insert(target);
                }
            }
        }

        let target = match targets.len() {
            1 => targets[0],
            _ => "Node",
        };
        let ty = if is_list {
            TypeRef::list(TypeRef::named(target))
        } else {
            TypeRef::named(target)
        };
        FieldDef::new(sanitize_field_name(link_name), ty)
            .with_extension("link", options(&[("from", key)]))
    }

    fn report_conflict(&mut self, path: &str, kinds: &IndexMap<Kind, Sample>, depth: usize) {
        let observed = kinds
            .values()
            .map(|sample| ObservedShape {
                shape: wrap_list(describe(sample.value), depth),
                node_id: sample.node_id.to_owned(),
                example: sample.value.clone(),
            })
            .collect();
        self.reporter.add_conflict(TypeConflict {
            type_name: self.root.clone(),
            field_path: path.to_owned(),
            observed,
        });
    }
}

/// `None` for values that carry no type information.
fn kind_of(value: &Value) -> Option<Kind> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(Kind::Boolean),
        Value::Number(_) => Some(Kind::Number),
        Value::String(_) => Some(Kind::String),
        Value::Object(_) => Some(Kind::Object),
        Value::Array(items) if items.iter().all(Value::is_null) => None,
        Value::Array(_) => Some(Kind::Array),
    }
}

fn is_int(value: &Value) -> bool {
    value
        .as_i64()
        .is_some_and(|n| i32::try_from(n).is_ok())
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "boolean".into(),
        Value::Number(_) => "number".into(),
        Value::String(s) if is_date(s) => "date".into(),
        Value::String(_) => "string".into(),
        Value::Object(_) => "object".into(),
        Value::Array(items) => match items.iter().find(|v| !v.is_null()) {
            Some(item) => format!("[{}]", describe(item)),
            None => "[]".into(),
        },
    }
}

fn wrap_list(shape: String, depth: usize) -> String {
    format!("{}{}{}", "[".repeat(depth), shape, "]".repeat(depth))
}

/// Make a property name a valid field name: invalid characters become `_`,
/// and a leading digit gets a `_` prefix.
pub fn sanitize_field_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c == '_' || c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

fn options(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), Value::String((*v).to_owned())))
        .collect()
}
