use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

/// Remembers which sub-objects of a resolved node are inline data.
///
/// Inline objects belong structurally to their root node, as opposed to
/// values a resolver computed or linked in. Paths are dot-separated field
/// names with array indices as segments (`frontmatter.authors.0`).
#[derive(Debug, Default)]
pub struct NodeTracker {
    inline: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl NodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every inline object reachable from a resolved root node.
    ///
    /// `internal` is bookkeeping and never tracked. Values without an `id`
    /// are ignored.
    pub fn track_inline_objects(&self, node: &Value) {
        let Some(map) = node.as_object() else {
            return;
        };
        let Some(id) = map.get("id").and_then(Value::as_str) else {
            return;
        };

        let mut paths = BTreeSet::new();
        for (key, value) in map {
            if key == "internal" {
                continue;
            }
            collect_paths(value, key, &mut paths);
        }

        let mut inline = self.inline.lock().unwrap_or_else(PoisonError::into_inner);
        inline.insert(id.to_owned(), paths);
    }

    /// Inline object paths recorded for `id`, sorted.
    pub fn inline_paths(&self, id: &str) -> Vec<String> {
        let inline = self.inline.lock().unwrap_or_else(PoisonError::into_inner);
        inline
            .get(id)
            .map(|paths| paths.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_inline_object(&self, id: &str, path: &str) -> bool {
        let inline = self.inline.lock().unwrap_or_else(PoisonError::into_inner);
        inline.get(id).is_some_and(|paths| paths.contains(path))
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        let inline = self.inline.lock().unwrap_or_else(PoisonError::into_inner);
        inline.contains_key(id)
    }

    pub fn clear(&self) {
        self.inline
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn collect_paths(value: &Value, path: &str, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            out.insert(path.to_owned());
            for (key, child) in map {
                collect_paths(child, &format!("{path}.{key}"), out);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_paths(item, &format!("{path}.{i}"), out);
            }
        }
        _ => {}
    }
}
