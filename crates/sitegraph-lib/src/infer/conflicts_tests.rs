use serde_json::json;

use super::{ObservedShape, TypeConflict, TypeConflictReporter};

fn shape(shape: &str, node_id: &str) -> ObservedShape {
    ObservedShape {
        shape: shape.into(),
        node_id: node_id.into(),
        example: json!(null),
    }
}

#[test]
fn same_path_merges_new_shapes() {
    let mut reporter = TypeConflictReporter::new();
    reporter.add_conflict(TypeConflict {
        type_name: "Post".into(),
        field_path: "Post.likes".into(),
        observed: vec![shape("number", "1"), shape("string", "2")],
    });
    reporter.add_conflict(TypeConflict {
        type_name: "Post".into(),
        field_path: "Post.likes".into(),
        observed: vec![shape("string", "3"), shape("boolean", "4")],
    });

    assert_eq!(reporter.len(), 1);
    let shapes: Vec<&str> = reporter
        .conflicts()
        .flat_map(|c| c.observed.iter().map(|o| o.shape.as_str()))
        .collect();
    assert_eq!(shapes, ["number", "string", "boolean"]);
}

#[test]
fn conflicts_keep_report_order() {
    let mut reporter = TypeConflictReporter::new();
    for path in ["B.x", "A.y"] {
        reporter.add_conflict(TypeConflict {
            type_name: path[..1].into(),
            field_path: path.into(),
            observed: vec![shape("number", "1")],
        });
    }

    let paths: Vec<String> = reporter
        .into_conflicts()
        .into_iter()
        .map(|c| c.field_path)
        .collect();
    assert_eq!(paths, ["B.x", "A.y"]);
}

#[test]
fn empty_reporter_prints_nothing() {
    let reporter = TypeConflictReporter::new();
    assert!(reporter.is_empty());
    reporter.print_conflicts();
}
