use std::fs;

use sitegraph_lib::query::QueryCompiler;
use sitegraph_lib::{BuildContext, build};
use tempfile::TempDir;

use super::error::CliError;
use super::site::{load_queries, load_site};

const NODES: &str = r#"[
  { "id": "1", "internal": { "type": "Post" }, "title": "Hello" },
  { "id": "2", "internal": { "type": "Post" }, "title": "World" }
]"#;

async fn compiler() -> QueryCompiler {
    let ctx = BuildContext::default();
    build(&ctx, None).await.unwrap();
    ctx.query_compiler().await.unwrap()
}

#[tokio::test]
async fn nodes_and_config_are_loaded() {
    let dir = TempDir::new().unwrap();
    let nodes = dir.path().join("nodes.json");
    let config = dir.path().join("site.json");
    fs::write(&nodes, NODES).unwrap();
    fs::write(&config, r#"{ "execFuel": 100 }"#).unwrap();

    let ctx = load_site(Some(&nodes), Some(&config)).await.unwrap();

    assert_eq!(ctx.store().len().await, 2);
    assert_eq!(ctx.config().exec_fuel, Some(100));
}

#[tokio::test]
async fn unreadable_inputs_name_the_file() {
    let dir = TempDir::new().unwrap();
    let nodes = dir.path().join("nodes.json");
    fs::write(&nodes, "{ not json").unwrap();
    let missing = dir.path().join("missing.json");

    let bad = load_site(Some(&nodes), None).await.unwrap_err();
    let absent = load_site(None, Some(&missing)).await.unwrap_err();

    assert!(matches!(bad, CliError::Nodes { .. }));
    assert!(bad.to_string().starts_with("invalid nodes in '"));
    assert!(matches!(absent, CliError::Read { .. }));
    assert!(absent.to_string().contains("missing.json"));
}

#[tokio::test]
async fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("site.json");
    fs::write(&config, r#"{ "recursionFuel": 0 }"#).unwrap();

    let err = load_site(None, Some(&config)).await.unwrap_err();

    assert_eq!(err.to_string(), "`recursionFuel` must be greater than zero");
}

#[tokio::test]
async fn directories_contribute_query_files_in_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.graphql"), "query B { __typename }").unwrap();
    fs::write(dir.path().join("a.gql"), "query A { __typename }").unwrap();
    fs::write(dir.path().join("notes.md"), "not a query").unwrap();
    let mut compiler = compiler().await;

    load_queries(&mut compiler, Some(dir.path()), None).unwrap();

    let names: Vec<_> = compiler
        .sources()
        .iter()
        .map(|s| s.display_name().rsplit('/').next().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(names, ["a.gql", "b.graphql"]);
}

#[tokio::test]
async fn inline_text_wins_and_something_is_required() {
    let dir = TempDir::new().unwrap();
    let mut compiler = compiler().await;

    load_queries(&mut compiler, Some(dir.path()), Some("{ __typename }")).unwrap();
    assert_eq!(compiler.sources().len(), 1);

    let mut empty = self::compiler().await;
    assert!(matches!(load_queries(&mut empty, None, None), Err(CliError::QueryRequired)));
    assert!(matches!(
        load_queries(&mut empty, Some(dir.path()), None),
        Err(CliError::NoQueryFiles(_))
    ));
}
