//! SDL printing of composed schemas.

use std::fmt::Write;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::types::{ArgDef, FieldDef, TypeDef};
use super::{QUERY_TYPE, STANDARD_SCALARS, Schema};

pub(super) fn print_schema(schema: &Schema) -> String {
    let mut out = String::new();
    if schema.query_type_name() != QUERY_TYPE {
        let _ = writeln!(out, "schema {{\n  query: {}\n}}\n", schema.query_type_name());
    }
    let printed: Vec<String> = schema
        .types()
        .filter(|t| !STANDARD_SCALARS.contains(&t.name()))
        .map(print_type)
        .collect();
    out.push_str(&printed.join("\n\n"));
    out.push('\n');
    out
}

pub(super) fn print_type(def: &TypeDef) -> String {
    let mut out = String::new();
    if let Some(description) = def.description() {
        print_description(&mut out, description, "");
    }
    match def {
        TypeDef::Object(t) => {
            let _ = write!(out, "type {}{}", t.name, implements(&t.interfaces));
            if t.dont_infer {
                out.push_str(" @dontInfer");
            }
            print_fields(&mut out, &t.fields);
        }
        TypeDef::Interface(t) => {
            let _ = write!(out, "interface {}{}", t.name, implements(&t.interfaces));
            print_fields(&mut out, &t.fields);
        }
        TypeDef::Union(t) => {
            let _ = write!(out, "union {} = {}", t.name, t.members.join(" | "));
        }
        TypeDef::Enum(t) => {
            let _ = write!(out, "enum {} {{", t.name);
            for value in &t.values {
                let _ = write!(out, "\n  {}", value);
            }
            out.push_str("\n}");
        }
        TypeDef::Scalar(t) => {
            let _ = write!(out, "scalar {}", t.name);
        }
        TypeDef::InputObject(t) => {
            let _ = write!(out, "input {} {{", t.name);
            for field in t.fields.values() {
                out.push('\n');
                if let Some(description) = &field.description {
                    print_description(&mut out, description, "  ");
                }
                let _ = write!(out, "  {}", print_arg(field));
            }
            out.push_str("\n}");
        }
    }
    out
}

fn implements(interfaces: &[String]) -> String {
    if interfaces.is_empty() {
        String::new()
    } else {
        format!(" implements {}", interfaces.join(" & "))
    }
}

fn print_fields(out: &mut String, fields: &IndexMap<String, FieldDef>) {
    if fields.is_empty() {
        return;
    }
    out.push_str(" {");
    for field in fields.values() {
        out.push('\n');
        if let Some(description) = &field.description {
            print_description(out, description, "  ");
        }
        let _ = write!(out, "  {}", field.name);
        if !field.args.is_empty() {
            let args: Vec<String> = field.args.values().map(print_arg).collect();
            let _ = write!(out, "({})", args.join(", "));
        }
        let _ = write!(out, ": {}", field.ty);
        for (name, options) in &field.extensions {
            let _ = write!(out, " @{}{}", name, print_options(options));
        }
    }
    out.push_str("\n}");
}

fn print_arg(arg: &ArgDef) -> String {
    match &arg.default_value {
        Some(default) => format!("{}: {} = {}", arg.name, arg.ty, print_value(default)),
        None => format!("{}: {}", arg.name, arg.ty),
    }
}

fn print_options(options: &Map<String, Value>) -> String {
    if options.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = options
        .iter()
        .map(|(k, v)| format!("{}: {}", k, print_value(v)))
        .collect();
    format!("({})", pairs.join(", "))
}

fn print_description(out: &mut String, description: &str, indent: &str) {
    if description.contains('\n') {
        let _ = writeln!(out, "{indent}\"\"\"");
        for line in description.lines() {
            let _ = writeln!(out, "{indent}{line}");
        }
        let _ = writeln!(out, "{indent}\"\"\"");
    } else {
        let _ = writeln!(out, "{indent}{}", Value::String(description.to_owned()));
    }
}

/// JSON value as a GraphQL literal: object keys are bare names.
pub(crate) fn print_value(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(print_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let pairs: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, print_value(v)))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        }
        scalar => scalar.to_string(),
    }
}
