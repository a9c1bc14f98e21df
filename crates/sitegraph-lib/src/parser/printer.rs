//! Canonical re-printing of executable definitions.
//!
//! Output is normalized: two-space indentation, one selection per line,
//! comments and commas dropped. Type-system definitions are emitted as
//! their source text.

use std::fmt::Write;

use super::ast::{
    Argument, Definition, Directive, FragmentDefinition, OperationDefinition, Selection,
    SelectionSet, Type, Value, VariableDefinition,
};

pub fn print_definition(def: &Definition) -> String {
    match def {
        Definition::Operation(op) => print_operation(op),
        Definition::Fragment(fragment) => print_fragment(fragment),
        other => other.as_cst().text().to_string().trim().to_string(),
    }
}

fn print_operation(op: &OperationDefinition) -> String {
    let mut out = String::new();
    let vars: Vec<String> = op.variable_definitions().map(|v| print_variable(&v)).collect();
    let directives = print_directives(op.directives());

    let shorthand = op.name().is_none() && vars.is_empty() && directives.is_empty();
    if !shorthand {
        out.push_str(op.operation_type().as_str());
        if let Some(name) = op.name() {
            out.push(' ');
            out.push_str(name.text());
        }
        if !vars.is_empty() {
            let _ = write!(out, "({})", vars.join(", "));
        }
        out.push_str(&directives);
        out.push(' ');
    }

    match op.selection_set() {
        Some(set) => out.push_str(&print_selection_set(&set, 0)),
        None => out.push_str("{}"),
    }
    out
}

fn print_fragment(fragment: &FragmentDefinition) -> String {
    let mut out = String::from("fragment");
    if let Some(name) = fragment.name() {
        out.push(' ');
        out.push_str(name.text());
    }
    if let Some(cond) = fragment.type_condition().and_then(|c| c.name()) {
        let _ = write!(out, " on {}", cond.text());
    }
    out.push_str(&print_directives(fragment.directives()));
    out.push(' ');
    match fragment.selection_set() {
        Some(set) => out.push_str(&print_selection_set(&set, 0)),
        None => out.push_str("{}"),
    }
    out
}

fn print_variable(var: &VariableDefinition) -> String {
    let mut out = String::from("$");
    if let Some(name) = var.variable().and_then(|v| v.name()) {
        out.push_str(name.text());
    }
    out.push_str(": ");
    if let Some(ty) = var.ty() {
        out.push_str(&print_type(&ty));
    }
    if let Some(default) = var.default_value() {
        let _ = write!(out, " = {}", print_value(&default));
    }
    out
}

/// `{ ... }` with closing brace at `indent` levels.
pub fn print_selection_set(set: &SelectionSet, indent: usize) -> String {
    print_selection_block(std::slice::from_ref(set), indent)
}

/// One block holding the selections of every set in order.
pub fn print_selection_block(sets: &[SelectionSet], indent: usize) -> String {
    let mut out = String::from("{\n");
    for set in sets {
        for selection in set.selections() {
            out.push_str(&print_selection(&selection, indent + 1));
            out.push('\n');
        }
    }
    out.push_str(&"  ".repeat(indent));
    out.push('}');
    out
}

fn print_selection(selection: &Selection, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    match selection {
        Selection::Field(field) => {
            let mut out = pad;
            if let Some(alias) = field.alias() {
                let _ = write!(out, "{}: ", alias.text());
            }
            if let Some(name) = field.name() {
                out.push_str(name.text());
            }
            out.push_str(&print_arguments(field.arguments()));
            out.push_str(&print_directives(field.directives()));
            if let Some(set) = field.selection_set() {
                out.push(' ');
                out.push_str(&print_selection_set(&set, indent));
            }
            out
        }
        Selection::FragmentSpread(spread) => {
            let mut out = pad;
            out.push_str("...");
            if let Some(name) = spread.name() {
                out.push_str(name.text());
            }
            out.push_str(&print_directives(spread.directives()));
            out
        }
        Selection::InlineFragment(fragment) => {
            let mut out = pad;
            out.push_str("...");
            if let Some(cond) = fragment.type_condition().and_then(|c| c.name()) {
                let _ = write!(out, " on {}", cond.text());
            }
            out.push_str(&print_directives(fragment.directives()));
            out.push(' ');
            match fragment.selection_set() {
                Some(set) => out.push_str(&print_selection_set(&set, indent)),
                None => out.push_str("{}"),
            }
            out
        }
    }
}

fn print_arguments(args: impl Iterator<Item = Argument>) -> String {
    let printed: Vec<String> = args
        .map(|arg| {
            let name = arg.name().map(|t| t.text().to_string()).unwrap_or_default();
            let value = arg.value().map(|v| print_value(&v)).unwrap_or_default();
            format!("{}: {}", name, value)
        })
        .collect();
    if printed.is_empty() {
        String::new()
    } else {
        format!("({})", printed.join(", "))
    }
}

fn print_directives(directives: impl Iterator<Item = Directive>) -> String {
    let mut out = String::new();
    for directive in directives {
        out.push_str(" @");
        if let Some(name) = directive.name() {
            out.push_str(name.text());
        }
        out.push_str(&print_arguments(directive.arguments()));
    }
    out
}

pub fn print_value(value: &Value) -> String {
    match value {
        Value::Variable(v) => format!("${}", v.name().map(|t| t.text().to_string()).unwrap_or_default()),
        Value::String(s) => serde_json::Value::String(s.value()).to_string(),
        Value::List(list) => {
            let items: Vec<String> = list.values().map(|v| print_value(&v)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(obj) => {
            let fields: Vec<String> = obj
                .fields()
                .map(|f| {
                    let name = f.name().map(|t| t.text().to_string()).unwrap_or_default();
                    let value = f.value().map(|v| print_value(&v)).unwrap_or_default();
                    format!("{}: {}", name, value)
                })
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        scalar => scalar.as_cst().text().to_string().trim().to_string(),
    }
}

pub fn print_type(ty: &Type) -> String {
    match ty {
        Type::Named(named) => named.name().map(|t| t.text().to_string()).unwrap_or_default(),
        Type::List(list) => format!(
            "[{}]",
            list.inner().map(|t| print_type(&t)).unwrap_or_default()
        ),
        Type::NonNull(non_null) => format!(
            "{}!",
            non_null.inner().map(|t| print_type(&t)).unwrap_or_default()
        ),
    }
}
