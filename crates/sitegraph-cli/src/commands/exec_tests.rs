use std::fs;

use serde_json::{Value, json};
use tempfile::TempDir;

use super::error::CliError;
use super::exec::{ExecArgs, exec, parse_vars};

const NODES: &str = r#"[
  { "id": "1", "internal": { "type": "Post" }, "title": "Hello" },
  { "id": "2", "internal": { "type": "Post" }, "title": "World" }
]"#;

fn args(dir: &TempDir, query: &str) -> ExecArgs {
    let nodes = dir.path().join("nodes.json");
    fs::write(&nodes, NODES).unwrap();
    ExecArgs {
        query_path: None,
        query_text: Some(query.to_owned()),
        nodes_path: Some(nodes),
        config: None,
        operation: None,
        vars: None,
        compact: true,
        color: false,
    }
}

#[tokio::test]
async fn runs_an_inline_query() {
    let dir = TempDir::new().unwrap();

    let output = exec(&args(&dir, "{ allPost(limit: 1) { title } }")).await.unwrap();

    assert_eq!(output, r#"{"data":{"allPost":[{"title":"Hello"}]}}"#);
}

#[tokio::test]
async fn variables_and_operation_selection() {
    let dir = TempDir::new().unwrap();
    let mut args = args(
        &dir,
        "query One($id: String) { post(id: $id) { title } } ",
    );
    args.vars = Some(r#"{ "id": "2" }"#.to_owned());
    args.operation = Some("One".to_owned());

    let output = exec(&args).await.unwrap();

    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value, json!({ "data": { "post": { "title": "World" } } }));
}

#[tokio::test]
async fn unknown_operation_lists_the_available_ones() {
    let dir = TempDir::new().unwrap();
    let mut args = args(&dir, "query Posts { allPost { id } }");
    args.operation = Some("Pages".to_owned());

    let err = exec(&args).await.unwrap_err();

    assert_eq!(err.to_string(), "unknown operation `Pages`; available: Posts");
}

#[tokio::test]
async fn compile_errors_fail_the_run() {
    let dir = TempDir::new().unwrap();

    let err = exec(&args(&dir, "{ allPost { nope } }")).await.unwrap_err();

    assert!(matches!(err, CliError::QueryFailed { errors: 1, .. }));
}

#[test]
fn variables_must_be_an_object() {
    assert!(parse_vars(None).unwrap().is_empty());
    assert_eq!(parse_vars(Some(r#"{"n": 1}"#)).unwrap()["n"], json!(1));
    assert_eq!(
        parse_vars(Some("[1]")).unwrap_err().to_string(),
        "--vars must be a JSON object: got [1]"
    );
    assert!(matches!(parse_vars(Some("{")), Err(CliError::Vars(_))));
}
