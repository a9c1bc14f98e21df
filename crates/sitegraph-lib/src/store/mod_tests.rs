use serde_json::json;
use sitegraph_core::Node;

use super::{NodeStore, NodeStoreError};

fn post(id: &str, title: &str) -> Node {
    Node::new(id, "Post")
        .with_owner("source-filesystem")
        .with_field("title", json!(title))
}

#[tokio::test]
async fn create_and_query_by_type() {
    let store = NodeStore::new();
    store.create_node(post("1", "One")).await.unwrap();
    store.create_node(Node::new("a", "Author")).await.unwrap();
    store.create_node(post("2", "Two")).await.unwrap();

    let ids: Vec<String> = store
        .get_nodes_by_type("Post")
        .await
        .iter()
        .map(|n| n.id.clone())
        .collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(store.types().await, ["Post", "Author"]);
    assert_eq!(store.len().await, 3);
    assert!(store.get_nodes_by_type("Missing").await.is_empty());
}

#[tokio::test]
async fn create_fills_digest() {
    let store = NodeStore::new();
    let node = store.create_node(post("1", "One")).await.unwrap();

    assert_eq!(node.digest().len(), 8);
}

#[tokio::test]
async fn superseding_keeps_position_and_changes_digest() {
    let store = NodeStore::new();
    let first = store.create_node(post("1", "One")).await.unwrap();
    store.create_node(post("2", "Two")).await.unwrap();
    let updated = store.create_node(post("1", "Uno")).await.unwrap();

    assert_ne!(first.digest(), updated.digest());
    let nodes = store.get_nodes().await;
    assert_eq!(nodes[0].id, "1");
    assert_eq!(nodes[0].get("title"), Some(json!("Uno")));
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn superseding_with_new_type_moves_index() {
    let store = NodeStore::new();
    store.create_node(post("1", "One")).await.unwrap();
    store
        .create_node(Node::new("1", "Page").with_owner("source-filesystem"))
        .await
        .unwrap();

    assert!(store.get_nodes_by_type("Post").await.is_empty());
    assert_eq!(store.get_nodes_by_type("Page").await.len(), 1);
    assert_eq!(store.types().await, ["Page"]);
}

#[tokio::test]
async fn foreign_owner_is_rejected() {
    let store = NodeStore::new();
    store.create_node(post("1", "One")).await.unwrap();
    let err = store
        .create_node(Node::new("1", "Post").with_owner("other-plugin"))
        .await
        .unwrap_err();

    insta::assert_snapshot!(err, @"node `1` is owned by `source-filesystem`, not `other-plugin`");
}

#[tokio::test]
async fn invalid_nodes_are_rejected() {
    let store = NodeStore::new();

    assert_eq!(
        store.create_node(Node::new("", "Post")).await.unwrap_err(),
        NodeStoreError::MissingId
    );
    assert_eq!(
        store.create_node(Node::new("x", "")).await.unwrap_err(),
        NodeStoreError::MissingType("x".into())
    );
}

#[tokio::test]
async fn delete_bumps_generation() {
    let store = NodeStore::new();
    store.create_node(post("1", "One")).await.unwrap();
    let before = store.generation();

    assert!(store.delete_node("1").await.is_some());
    assert!(store.delete_node("1").await.is_none());
    assert!(store.generation() > before);
    assert!(store.is_empty().await);
    assert!(store.types().await.is_empty());
}
