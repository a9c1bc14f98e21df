use std::sync::Arc;

use indoc::indoc;
use serde_json::json;
use sitegraph_core::Node;

use super::compiler::{CompileResult, QueryCompiler};
use crate::diagnostics::{DiagnosticKind, Location, Severity};
use crate::infer::TypeConflictReporter;
use crate::schema::composer::NodesByType;
use crate::schema::{Schema, SchemaComposer};

fn schema() -> Arc<Schema> {
    let mut by_type = NodesByType::new();
    by_type.insert(
        "Post".into(),
        vec![Arc::new(
            Node::new("1", "Post")
                .with_field("title", json!("Hello"))
                .with_field("author___NODE", json!("a1"))
                .ensure_digest(),
        )],
    );
    by_type.insert(
        "Author".into(),
        vec![Arc::new(
            Node::new("a1", "Author")
                .with_field("name", json!("Ann"))
                .ensure_digest(),
        )],
    );
    let schema = SchemaComposer::new()
        .compose(&by_type, &mut TypeConflictReporter::new())
        .unwrap();
    Arc::new(schema)
}

fn compile(files: &[(&str, &str)]) -> CompileResult {
    let mut compiler = QueryCompiler::new(schema());
    for (path, text) in files {
        compiler.add_file(path, text);
    }
    compiler.compile().unwrap()
}

fn messages(result: &CompileResult) -> Vec<&str> {
    result.errors.iter().map(|e| e.message.as_str()).collect()
}

#[test]
fn valid_queries_compile() {
    let result = compile(&[
        (
            "src/pages/index.js",
            "query Index { allPost(limit: 2) { title author { name } } }",
        ),
        (
            "src/pages/titles.js",
            "query Titles { allPost { ...PostTitle } }\nfragment PostTitle on Post { title }",
        ),
    ]);

    assert!(result.is_ok(), "{:?}", messages(&result));
    assert_eq!(result.queries.keys().collect::<Vec<_>>(), ["Index", "Titles"]);
    let index = result.query("Index").unwrap();
    assert_eq!(index.path, "src/pages/index.js");
    assert_eq!(index.operation.name.as_deref(), Some("Index"));
}

#[test]
fn unknown_field_points_at_the_field() {
    let result = compile(&[(
        "src/pages/index.js",
        indoc! {"
            query Index {
              allPost {
                title
                foo
              }
            }
        "},
    )]);

    assert_eq!(messages(&result), ["Unknown field `foo` on type `Post`."]);
    let error = &result.errors[0];
    assert_eq!(error.doc_name, "Index");
    assert_eq!(error.location, Some(Location { line: 4, column: 5 }));
    assert!(result.queries.is_empty());

    let diagnostics = &result.diagnostics["src/pages/index.js"];
    let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, [DiagnosticKind::UnknownField]);
}

#[test]
fn each_kind_of_unknown_name_is_reported() {
    let result = compile(&[(
        "src/pages/index.js",
        indoc! {"
            query Index {
              allPost(first: 1) {
                title @upper
                ...Missing
                ... on Nope { id }
              }
            }
        "},
    )]);

    assert_eq!(
        messages(&result),
        [
            "Unknown argument `first` for field Query.allPost.",
            "Unknown directive `@upper`.",
            "Unknown fragment `Missing`.",
            "Unknown type `Nope`.",
        ]
    );
    assert_eq!(result.errors[0].location, Some(Location { line: 2, column: 11 }));
    assert_eq!(result.errors[1].location, Some(Location { line: 3, column: 12 }));
}

#[test]
fn selections_must_match_field_types() {
    let result = compile(&[(
        "q.graphql",
        "query Index { allPost { title { length } author } }",
    )]);

    assert_eq!(
        messages(&result),
        [
            "Field `title` of type `String` must not have a selection since type `String` has no subfields.",
            "Field `author` of type `Author` must have a selection of subfields.",
        ]
    );
}

#[test]
fn second_root_query_is_dropped_with_a_warning() {
    let result = compile(&[(
        "src/pages/index.js",
        indoc! {"
            query Index { allPost { title } }
            query Other { allAuthor { name } }
        "},
    )]);

    assert!(result.is_ok());
    assert!(result.query("Index").is_some());
    assert!(result.query("Other").is_none());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with(
        r#"Multiple "root" queries found in file: "Other" and "Index"."#
    ));
    let diagnostics = &result.diagnostics["src/pages/index.js"];
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().severity(), Severity::Warning);
}

#[test]
fn duplicate_documents_keep_the_first() {
    let result = compile(&[
        ("a.graphql", "query Index { allPost { title } }"),
        ("b.graphql", "query Index { allAuthor { name } }"),
    ]);

    assert_eq!(result.errors.len(), 1);
    assert!(
        result.errors[0]
            .formatted_message
            .contains("Duplicate document `Index`: defined in `a.graphql` and again in `b.graphql`.")
    );
    assert_eq!(result.query("Index").unwrap().path, "a.graphql");
    let kinds: Vec<_> = result.diagnostics["b.graphql"].iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, [DiagnosticKind::DuplicateDocument]);
}

#[test]
fn syntax_errors_skip_the_file() {
    let result = compile(&[
        ("broken.graphql", "query Broken { allPost { title }"),
        ("ok.graphql", "query Fine { allAuthor { name } }"),
    ]);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].doc_name, "");
    assert!(result.errors[0].location.is_some());
    assert!(result.errors[0].formatted_message.contains("file: broken.graphql"));
    assert_eq!(result.queries.keys().collect::<Vec<_>>(), ["Fine"]);

    let kinds: Vec<_> = result.diagnostics["broken.graphql"].iter().map(|d| d.kind()).collect();
    assert!(kinds.contains(&DiagnosticKind::UnclosedBrace));
    assert!(!result.diagnostics.contains_key("ok.graphql"));
}

#[test]
fn invalid_fragment_fails_its_users() {
    let result = compile(&[(
        "q.graphql",
        "fragment Bad on Post { nope }\nquery Index { allPost { ...Bad } }",
    )]);

    assert_eq!(messages(&result), ["Unknown field `nope` on type `Post`."]);
    assert_eq!(result.errors[0].doc_name, "Bad");
    assert!(result.queries.is_empty());
}

#[test]
fn anonymous_query_is_named_after_its_source() {
    let mut compiler = QueryCompiler::new(schema());
    compiler.add_inline("{ allPost { title } }");

    let result = compiler.compile().unwrap();

    assert!(result.query("<query>").is_some());
}

#[test]
fn fuel_exhaustion_fails_the_compile() {
    let mut compiler = QueryCompiler::new(schema()).with_exec_fuel(Some(3));
    compiler.add_inline("query Index { allPost { title author { name } } }");

    assert!(matches!(compiler.compile(), Err(crate::Error::ExecFuelExhausted)));
}
