use serde_json::json;

use super::NodeTracker;

#[test]
fn records_nested_objects_and_array_items() {
    let tracker = NodeTracker::new();
    tracker.track_inline_objects(&json!({
        "id": "post-1",
        "title": "Hello",
        "frontmatter": { "author": { "name": "Ann" }, "tags": ["a", "b"] },
        "images": [{ "src": "a.png" }, "plain"],
        "internal": { "type": "Post" }
    }));

    insta::assert_debug_snapshot!(tracker.inline_paths("post-1"), @r#"
    [
        "frontmatter",
        "frontmatter.author",
        "images.0",
    ]
    "#);
    assert!(tracker.is_inline_object("post-1", "frontmatter.author"));
    assert!(!tracker.is_inline_object("post-1", "internal"));
}

#[test]
fn retracking_replaces_paths() {
    let tracker = NodeTracker::new();
    tracker.track_inline_objects(&json!({ "id": "n", "a": {} }));
    tracker.track_inline_objects(&json!({ "id": "n", "b": {} }));

    assert_eq!(tracker.inline_paths("n"), ["b"]);
}

#[test]
fn ignores_values_without_id() {
    let tracker = NodeTracker::new();
    tracker.track_inline_objects(&json!({ "a": {} }));
    tracker.track_inline_objects(&json!("scalar"));

    assert!(!tracker.is_tracked(""));
    assert!(tracker.inline_paths("a").is_empty());
}

#[test]
fn clear_forgets_everything() {
    let tracker = NodeTracker::new();
    tracker.track_inline_objects(&json!({ "id": "n", "a": {} }));
    tracker.clear();

    assert!(!tracker.is_tracked("n"));
}
