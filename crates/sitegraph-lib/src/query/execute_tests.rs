use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use sitegraph_core::Node;

use super::compiler::QueryCompiler;
use super::execute::{ExecutionResult, Executor, FieldError};
use crate::infer::TypeConflictReporter;
use crate::resolve::{NodeResolver, ResolveError, ResolverCache};
use crate::schema::composer::NodesByType;
use crate::schema::{ArgDef, FieldDef, Resolver, ResolverContext, SchemaComposer, TypeRef};
use crate::store::{NodeStore, NodeTracker};

async fn executor() -> Executor {
    let store = Arc::new(NodeStore::new());
    let posts = [
        ("1", "First", "2021-03-02"),
        ("2", "Second", "2022-07-14"),
        ("3", "Third", "2023-11-30"),
    ];
    for (id, title, date) in posts {
        store
            .create_node(
                Node::new(id, "Post")
                    .with_field("title", json!(title))
                    .with_field("date", json!(date))
                    .with_field("author___NODE", json!("a1"))
                    .ensure_digest(),
            )
            .await
            .unwrap();
    }
    store
        .create_node(
            Node::new("a1", "Author")
                .with_field("name", json!("Ann"))
                .ensure_digest(),
        )
        .await
        .unwrap();

    let broken = FieldDef::new("broken", TypeRef::named("String"))
        .with_arg(ArgDef::new("times", TypeRef::named("Int")))
        .with_resolver(Resolver::sync(|_| Err(ResolveError::msg("nope"))));
    let mut composer = SchemaComposer::new();
    composer.add_node_fields("Post", IndexMap::from([("broken".to_owned(), broken)]));

    let mut by_type = NodesByType::new();
    for type_name in store.types().await {
        let nodes = store.get_nodes_by_type(&type_name).await;
        by_type.insert(type_name, nodes);
    }
    let schema = composer
        .compose(&by_type, &mut TypeConflictReporter::new())
        .unwrap();

    Executor::new(NodeResolver::new(
        Arc::new(schema),
        ResolverContext::new(store),
        Arc::new(ResolverCache::new()),
        Arc::new(NodeTracker::new()),
    ))
}

async fn run(query: &str, variables: Value) -> ExecutionResult {
    let executor = executor().await;
    let mut compiler = QueryCompiler::new(executor.resolver().schema().clone());
    compiler.add_inline(query);
    let compiled = compiler.compile().unwrap();
    assert!(compiled.is_ok(), "{:?}", compiled.errors);
    let (_, query) = compiled.queries.first().unwrap();
    let variables = match variables {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    executor.execute(&query.operation, variables).await
}

#[tokio::test]
async fn all_nodes_with_skip_and_limit() {
    let result = run("{ allPost(skip: 1, limit: 1) { id heading: title } }", Value::Null).await;

    assert_eq!(result.errors, []);
    assert_eq!(result.data, json!({ "allPost": [{ "id": "2", "heading": "Second" }] }));
}

#[tokio::test]
async fn variables_and_their_defaults() {
    let query = "query Posts($n: Int = 2) { allPost(limit: $n) { title } }";

    let defaulted = run(query, Value::Null).await;
    let provided = run(query, json!({ "n": 1 })).await;

    assert_eq!(defaulted.data, json!({ "allPost": [{ "title": "First" }, { "title": "Second" }] }));
    assert_eq!(provided.data, json!({ "allPost": [{ "title": "First" }] }));
}

#[tokio::test]
async fn single_node_by_id() {
    let result = run(r#"{ post(id: "3") { title } missing: post(id: "9") { title } }"#, Value::Null).await;

    assert_eq!(result.data, json!({ "post": { "title": "Third" }, "missing": null }));
}

#[tokio::test]
async fn dates_format_on_request() {
    let result = run(
        r#"{ post(id: "1") { raw: date year: date(formatString: "YYYY") long: date(formatString: "MMMM Do") } }"#,
        Value::Null,
    )
    .await;

    assert_eq!(result.errors, []);
    assert_eq!(
        result.data,
        json!({ "post": { "raw": "2021-03-02", "year": "2021", "long": "March 2nd" } })
    );
}

#[tokio::test]
async fn linked_nodes_resolve() {
    let result = run(r#"{ post(id: "2") { author { __typename name } } }"#, Value::Null).await;

    assert_eq!(
        result.data,
        json!({ "post": { "author": { "__typename": "Author", "name": "Ann" } } })
    );
}

#[tokio::test]
async fn typename_and_conditions() {
    let result = run(
        "query Q($full: Boolean!) { post { __typename title @include(if: $full) id @skip(if: $full) } }",
        json!({ "full": true }),
    )
    .await;

    assert_eq!(result.data, json!({ "post": { "__typename": "Post", "title": "First" } }));
}

#[tokio::test]
async fn failing_field_is_nulled_and_reported() {
    let result = run(
        "{ allPost(limit: 2) { title broken(times: 2) } allAuthor { name } }",
        Value::Null,
    )
    .await;

    assert_eq!(
        result.data,
        json!({
            "allPost": [
                { "title": "First", "broken": null },
                { "title": "Second", "broken": null },
            ],
            "allAuthor": [{ "name": "Ann" }],
        })
    );
    assert_eq!(
        result.errors,
        [
            FieldError {
                path: "allPost.0.broken".into(),
                message: "failed to resolve `Post.broken`: nope".into(),
            },
            FieldError {
                path: "allPost.1.broken".into(),
                message: "failed to resolve `Post.broken`: nope".into(),
            },
        ]
    );
}

#[tokio::test]
async fn result_serializes_without_empty_errors() {
    let result = run(r#"{ post(id: "1") { title } }"#, Value::Null).await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "data": { "post": { "title": "First" } } })
    );
}
