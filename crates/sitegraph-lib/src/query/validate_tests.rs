use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::json;
use sitegraph_core::Node;

use super::errors::extract_error;
use super::validate::{Violation, validate_definition};
use crate::diagnostics::DiagnosticKind;
use crate::infer::TypeConflictReporter;
use crate::parser::parse;
use crate::schema::composer::NodesByType;
use crate::schema::{Schema, SchemaComposer};

fn schema() -> Schema {
    let mut by_type = NodesByType::new();
    by_type.insert(
        "Post".into(),
        vec![Arc::new(
            Node::new("1", "Post")
                .with_field("title", json!("Hello"))
                .with_field("tags", json!(["a"]))
                .ensure_digest(),
        )],
    );
    SchemaComposer::new()
        .compose(&by_type, &mut TypeConflictReporter::new())
        .unwrap()
}

fn validate(source: &str, fragments: &[&str]) -> Vec<Violation> {
    let (doc, diagnostics) = parse(source).unwrap();
    assert!(diagnostics.is_empty(), "{}", diagnostics.render(source));
    let fragments: IndexSet<String> = fragments.iter().map(|s| s.to_string()).collect();
    let def = doc.definitions().next().unwrap();
    validate_definition(&schema(), &def, &fragments)
}

fn messages(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.message.as_str()).collect()
}

#[test]
fn valid_query_has_no_violations() {
    let violations = validate(
        "query Index($on: Boolean) { allPost(limit: 1, skip: 0) { __typename id title tags @include(if: $on) } post(id: \"1\") { ...Post } }",
        &["Post"],
    );

    assert_eq!(messages(&violations), Vec::<&str>::new());
}

#[test]
fn inline_fragment_without_condition_keeps_the_parent_type() {
    let violations = validate("{ allPost { ... @skip(if: false) { title nope } } }", &[]);

    assert_eq!(messages(&violations), ["Unknown field `nope` on type `Post`."]);
}

#[test]
fn known_directive_with_unknown_argument() {
    let violations = validate("{ allPost { title @skip(when: true) } }", &[]);

    assert_eq!(
        messages(&violations),
        ["Unknown argument `when` for directive @skip."]
    );
    assert_eq!(violations[0].kind, DiagnosticKind::UnknownArgument);
}

#[test]
fn fragment_on_unknown_type_stops_there() {
    let violations = validate("fragment F on Missing { whatever }", &[]);

    assert_eq!(messages(&violations), ["Unknown type `Missing`."]);
}

#[test]
fn fragment_fields_are_checked_against_its_type() {
    let violations = validate("fragment F on Post { title body }", &[]);

    assert_eq!(messages(&violations), ["Unknown field `body` on type `Post`."]);
}

#[test]
fn mutations_are_rejected() {
    let violations = validate("mutation Save { savePost { id } }", &[]);

    assert_eq!(messages(&violations), ["Schema is not configured for mutations."]);
    assert_eq!(violations[0].kind, DiagnosticKind::UnknownType);
}

#[test]
fn raw_error_round_trips_through_extraction() {
    let source = "query Index {\n  allPost {\n    foo\n  }\n}\n";
    let violations = validate(source, &[]);

    let raw = violations[0].to_raw_error("Index", source);
    let extracted = extract_error(&raw);

    assert_eq!(extracted.message, "Unknown field `foo` on type `Post`.");
    assert_eq!(extracted.doc_name, "Index");
    assert!(extracted.code_block.starts_with("GraphQL request (3:5)\n3:     foo\n"));
}

#[test]
fn misspelled_field_carries_a_suggestion() {
    let violations = validate("{ allPost { titel } }", &[]);

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, DiagnosticKind::UnknownField);
    assert_eq!(violations[0].suggestion.as_deref(), Some("title"));
}
