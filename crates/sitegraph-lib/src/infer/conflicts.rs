//! Type conflicts found while inferring field types.
//!
//! Conflicts are collected for a whole build and reported together, so a
//! user sees every offending field at once.

use std::fmt::Write;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// One competing shape observed for a field, with an example.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedShape {
    pub shape: String,
    pub node_id: String,
    pub example: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeConflict {
    pub type_name: String,
    /// Dot-separated path starting at the node type: `PostsJson.meta.likes`.
    pub field_path: String,
    pub observed: Vec<ObservedShape>,
}

#[derive(Debug, Clone, Default)]
pub struct TypeConflictReporter {
    conflicts: IndexMap<String, TypeConflict>,
}

impl TypeConflictReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a conflict. A second report for the same path adds the shapes
    /// not seen yet.
    pub fn add_conflict(&mut self, conflict: TypeConflict) {
        match self.conflicts.get_mut(&conflict.field_path) {
            Some(existing) => {
                for shape in conflict.observed {
                    if !existing.observed.iter().any(|o| o.shape == shape.shape) {
                        existing.observed.push(shape);
                    }
                }
            }
            None => {
                self.conflicts.insert(conflict.field_path.clone(), conflict);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &TypeConflict> {
        self.conflicts.values()
    }

    pub fn into_conflicts(self) -> Vec<TypeConflict> {
        self.conflicts.into_values().collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::from(
            "There are conflicting field types in your data. \
             Conflicting fields are typed as `JSON`; declare their type explicitly to fix this.\n",
        );
        for conflict in self.conflicts.values() {
            let _ = write!(out, "\n{}:\n", conflict.field_path);
            for observed in &conflict.observed {
                let _ = writeln!(out, " - type: {}", observed.shape);
                let _ = writeln!(out, "   value: {}", observed.example);
                let _ = writeln!(out, "   source: node \"{}\"", observed.node_id);
            }
        }
        out
    }

    /// Log every collected conflict as one warning.
    pub fn print_conflicts(&self) {
        if self.is_empty() {
            return;
        }
        tracing::warn!(count = self.len(), "{}", self.render());
    }
}
