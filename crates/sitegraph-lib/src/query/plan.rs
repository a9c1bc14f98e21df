//! Compiled operations, detached from the syntax tree.
//!
//! Fragment spreads are expanded into inline fragments at compile time, so
//! an [`Operation`] is self-contained and can be sent across tasks.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::parser::ast;

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: Option<String>,
    pub variables: Vec<VariableDef>,
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(Field),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, InputValue)>,
    pub conditions: Vec<Condition>,
    pub selections: Vec<Selection>,
}

impl Field {
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<String>,
    pub conditions: Vec<Condition>,
    pub selections: Vec<Selection>,
}

/// `@include(if:)` / `@skip(if:)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Include(InputValue),
    Skip(InputValue),
}

impl Condition {
    pub fn passes(&self, variables: &Map<String, Value>) -> bool {
        match self {
            Condition::Include(value) => value.resolve(variables) == Value::Bool(true),
            Condition::Skip(value) => value.resolve(variables) != Value::Bool(true),
        }
    }
}

/// Argument value; variables are substituted at execution.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Variable(String),
    Const(Value),
    List(Vec<InputValue>),
    Object(Vec<(String, InputValue)>),
}

impl InputValue {
    fn from_ast(value: &ast::Value) -> Self {
        match value {
            ast::Value::Variable(var) => {
                InputValue::Variable(var.name().map(|t| t.text().to_string()).unwrap_or_default())
            }
            ast::Value::List(list) => InputValue::List(list.values().map(|v| Self::from_ast(&v)).collect()),
            ast::Value::Object(object) => InputValue::Object(
                object
                    .fields()
                    .filter_map(|f| Some((f.name()?.text().to_string(), Self::from_ast(&f.value()?))))
                    .collect(),
            ),
            other => InputValue::Const(other.to_json(&Map::new())),
        }
    }

    /// Missing variables resolve to `null`.
    pub fn resolve(&self, variables: &Map<String, Value>) -> Value {
        match self {
            InputValue::Variable(name) => variables.get(name).cloned().unwrap_or(Value::Null),
            InputValue::Const(value) => value.clone(),
            InputValue::List(items) => Value::Array(items.iter().map(|i| i.resolve(variables)).collect()),
            InputValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.resolve(variables)))
                    .collect(),
            ),
        }
    }
}

impl Operation {
    /// Compile `op`, expanding spreads from `fragments`.
    ///
    /// Returns `None` when a spread names a fragment that is not available.
    pub fn build(
        op: &ast::OperationDefinition,
        fragments: &IndexMap<String, ast::FragmentDefinition>,
    ) -> Option<Self> {
        let mut builder = Builder {
            fragments,
            expanding: Vec::new(),
        };
        let selections = match op.selection_set() {
            Some(set) => builder.selection_set(&set)?,
            None => Vec::new(),
        };
        let variables = op
            .variable_definitions()
            .filter_map(|var| {
                Some(VariableDef {
                    name: var.variable()?.name()?.text().to_string(),
                    default_value: var.default_value().map(|v| v.to_json(&Map::new())),
                })
            })
            .collect();
        Some(Self {
            name: op.name().map(|t| t.text().to_string()),
            variables,
            selections,
        })
    }

    /// `provided` with declared defaults filled in.
    pub fn coerce_variables(&self, mut provided: Map<String, Value>) -> Map<String, Value> {
        for var in &self.variables {
            if let Some(default) = &var.default_value {
                provided.entry(var.name.clone()).or_insert_with(|| default.clone());
            }
        }
        provided
    }
}

struct Builder<'f> {
    fragments: &'f IndexMap<String, ast::FragmentDefinition>,
    /// Fragments being expanded; a spread of one of these is dropped.
    expanding: Vec<String>,
}

impl Builder<'_> {
    fn selection_set(&mut self, set: &ast::SelectionSet) -> Option<Vec<Selection>> {
        let mut out = Vec::new();
        for selection in set.selections() {
            match &selection {
                ast::Selection::Field(field) => {
                    let Some(name) = field.name() else { continue };
                    let selections = match field.selection_set() {
                        Some(set) => self.selection_set(&set)?,
                        None => Vec::new(),
                    };
                    out.push(Selection::Field(Field {
                        alias: field.alias().map(|t| t.text().to_string()),
                        name: name.text().to_string(),
                        arguments: field
                            .arguments()
                            .filter_map(|arg| {
                                Some((arg.name()?.text().to_string(), InputValue::from_ast(&arg.value()?)))
                            })
                            .collect(),
                        conditions: conditions(field.directives()),
                        selections,
                    }));
                }
                ast::Selection::FragmentSpread(spread) => {
                    let Some(name) = spread.name() else { continue };
                    let name = name.text().to_string();
                    let fragment = self.fragments.get(&name)?;
                    if self.expanding.contains(&name) {
                        continue;
                    }
                    self.expanding.push(name);
                    let selections = match fragment.selection_set() {
                        Some(set) => self.selection_set(&set),
                        None => Some(Vec::new()),
                    };
                    self.expanding.pop();
                    out.push(Selection::InlineFragment(InlineFragment {
                        type_condition: fragment
                            .type_condition()
                            .and_then(|t| t.name())
                            .map(|t| t.text().to_string()),
                        conditions: conditions(spread.directives()),
                        selections: selections?,
                    }));
                }
                ast::Selection::InlineFragment(fragment) => {
                    let selections = match fragment.selection_set() {
                        Some(set) => self.selection_set(&set)?,
                        None => Vec::new(),
                    };
                    out.push(Selection::InlineFragment(InlineFragment {
                        type_condition: fragment
                            .type_condition()
                            .and_then(|t| t.name())
                            .map(|t| t.text().to_string()),
                        conditions: conditions(fragment.directives()),
                        selections,
                    }));
                }
            }
        }
        Some(out)
    }
}

fn conditions(directives: impl Iterator<Item = ast::Directive>) -> Vec<Condition> {
    directives
        .filter_map(|directive| {
            let name = directive.name()?;
            let value = InputValue::from_ast(&directive.argument("if")?);
            match name.text() {
                "include" => Some(Condition::Include(value)),
                "skip" => Some(Condition::Skip(value)),
                _ => None,
            }
        })
        .collect()
}
