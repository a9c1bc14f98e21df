//! The field-selection shape requested from resolved nodes.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde_json::{Map, Value};

/// Requested fields, each either a leaf or a nested shape.
///
/// Fields are kept sorted so equal requests have equal signatures no matter
/// how the query spelled them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldShape {
    fields: BTreeMap<String, Option<FieldShape>>,
}

impl FieldShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    pub fn nested(mut self, name: impl Into<String>, shape: FieldShape) -> Self {
        self.insert(name, Some(shape));
        self
    }

    /// Add a field. Requesting a field twice merges the nested shapes.
    pub fn insert(&mut self, name: impl Into<String>, shape: Option<FieldShape>) {
        match self.fields.entry(name.into()) {
            Entry::Vacant(entry) => {
                entry.insert(shape);
            }
            Entry::Occupied(mut entry) => {
                if let Some(shape) = shape {
                    match entry.get_mut() {
                        Some(existing) => existing.merge(shape),
                        slot @ None => *slot = Some(shape),
                    }
                }
            }
        }
    }

    pub fn merge(&mut self, other: FieldShape) {
        for (name, shape) in other.fields {
            self.insert(name, shape);
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<FieldShape>> {
        self.fields.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Nested shape of `name`; `None` for leaves and absent fields.
    pub fn sub(&self, name: &str) -> Option<&FieldShape> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldShape>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Shape as JSON: leaves are `true`, nested shapes are objects.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| {
                let value = v.as_ref().map_or(Value::Bool(true), FieldShape::to_value);
                (k.clone(), value)
            })
            .collect();
        Value::Object(map)
    }

    /// Canonical text for cache keys.
    pub fn signature(&self) -> String {
        self.to_value().to_string()
    }
}
