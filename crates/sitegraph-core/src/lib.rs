#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for sitegraph content nodes.
//!
//! A [`Node`] is one content record contributed by a plugin. Nodes are
//! superseded, never mutated in place: a change produces a new node with the
//! same id and a new content digest, and the digest is what caches key on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod colors;
pub mod utils;

pub use colors::Colors;

/// Suffix marking a field that holds node ids to be resolved as links.
pub const NODE_LINK_SUFFIX: &str = "___NODE";

/// Bookkeeping every node carries next to its content fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Internal {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub content_digest: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// A content record in the node store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    pub internal: Internal,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            children: Vec::new(),
            internal: Internal {
                type_name: type_name.into(),
                ..Internal::default()
            },
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.internal.owner = owner.into();
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.internal.media_type = Some(media_type.into());
        self
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.internal.content_digest = digest.into();
        self
    }

    /// Fill in `internal.contentDigest` from the content fields if the
    /// producer did not set one.
    pub fn ensure_digest(mut self) -> Self {
        if self.internal.content_digest.is_empty() {
            self.internal.content_digest = content_digest(&self.fields);
        }
        self
    }

    pub fn type_name(&self) -> &str {
        &self.internal.type_name
    }

    pub fn digest(&self) -> &str {
        &self.internal.content_digest
    }

    /// Read a top-level property the way a stored-field resolver sees it.
    ///
    /// `id`, `parent`, `children` and `internal` are properties like any other.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.clone())),
            "parent" => Some(
                self.parent
                    .as_ref()
                    .map_or(Value::Null, |p| Value::String(p.clone())),
            ),
            "children" => Some(Value::Array(
                self.children.iter().cloned().map(Value::String).collect(),
            )),
            "internal" => Some(self.internal_value()),
            _ => self.fields.get(name).cloned(),
        }
    }

    /// Whole node as one JSON object, bookkeeping fields first.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for key in ["id", "parent", "children", "internal"] {
            if let Some(value) = self.get(key) {
                map.insert(key.to_owned(), value);
            }
        }
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    fn internal_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(self.internal.type_name.clone()));
        map.insert(
            "contentDigest".into(),
            Value::String(self.internal.content_digest.clone()),
        );
        map.insert("owner".into(), Value::String(self.internal.owner.clone()));
        if let Some(media_type) = &self.internal.media_type {
            map.insert("mediaType".into(), Value::String(media_type.clone()));
        }
        Value::Object(map)
    }
}

/// Stable fingerprint of a field map: CRC32 over the key-sorted JSON text.
pub fn content_digest(fields: &Map<String, Value>) -> String {
    let mut text = String::new();
    write_canonical(&mut text, &Value::Object(fields.clone()));
    format!("{:08x}", crc32fast::hash(text.as_bytes()))
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(out, &map[key]);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Parse a JSON array of nodes, as plugins hand them over.
pub fn parse_nodes(json: &str) -> Result<Vec<Node>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod utils_tests;
