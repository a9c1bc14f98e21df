use std::fs;

use serde_json::json;
use sitegraph_core::Colors;
use sitegraph_lib::infer::{ObservedShape, TypeConflict};
use tempfile::TempDir;

use super::error::CliError;
use super::infer::{InferArgs, infer, render_conflicts};

fn args(dir: &TempDir, nodes: &str, type_name: Option<&str>) -> InferArgs {
    let path = dir.path().join("nodes.json");
    fs::write(&path, nodes).unwrap();
    InferArgs {
        nodes_path: Some(path),
        config: None,
        type_name: type_name.map(str::to_owned),
        color: false,
    }
}

#[tokio::test]
async fn prints_the_composed_schema() {
    let dir = TempDir::new().unwrap();
    let nodes = r#"[{ "id": "1", "internal": { "type": "Post" }, "title": "Hello", "views": 3 }]"#;

    let output = infer(&args(&dir, nodes, None)).await.unwrap();

    assert!(output.sdl.contains("type Post implements Node"));
    assert!(output.sdl.contains("allPost"));
    assert!(output.conflicts.is_empty());
}

#[tokio::test]
async fn one_type_on_request() {
    let dir = TempDir::new().unwrap();
    let nodes = r#"[{ "id": "1", "internal": { "type": "Post" }, "title": "Hello" }]"#;

    let output = infer(&args(&dir, nodes, Some("Post"))).await.unwrap();
    let missing = infer(&args(&dir, nodes, Some("Page"))).await;

    assert!(output.sdl.starts_with("type Post implements Node"));
    assert!(!output.sdl.contains("type Query"));
    assert!(matches!(missing, Err(CliError::UnknownType(name)) if name == "Page"));
}

#[tokio::test]
async fn conflicts_go_to_their_own_output() {
    let dir = TempDir::new().unwrap();
    let nodes = r#"[
      { "id": "1", "internal": { "type": "Post" }, "likes": 5 },
      { "id": "2", "internal": { "type": "Post" }, "likes": "five" }
    ]"#;

    let output = infer(&args(&dir, nodes, None)).await.unwrap();

    assert!(output.conflicts.starts_with("warning: conflicting types for Post.likes"));
}

#[test]
fn conflict_rendering() {
    let conflicts = [TypeConflict {
        type_name: "Post".into(),
        field_path: "Post.likes".into(),
        observed: vec![
            ObservedShape {
                shape: "number".into(),
                node_id: "1".into(),
                example: json!(5),
            },
            ObservedShape {
                shape: "string".into(),
                node_id: "2".into(),
                example: json!("five"),
            },
        ],
    }];

    insta::assert_snapshot!(render_conflicts(&conflicts, Colors::OFF), @r#"
    warning: conflicting types for Post.likes, typed as JSON
      - number 5 (node "1")
      - string "five" (node "2")
    "#);
    let colored = render_conflicts(&conflicts, Colors::ON);
    assert!(colored.starts_with("\x1b[33mwarning\x1b[0m"));
}
