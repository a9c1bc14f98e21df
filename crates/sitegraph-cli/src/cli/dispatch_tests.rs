use std::path::PathBuf;

use super::commands::{build_cli, check_command, exec_command, infer_command};
use super::*;

#[test]
fn infer_requires_nodes() {
    assert!(infer_command().try_get_matches_from(["infer"]).is_err());

    let m = infer_command()
        .try_get_matches_from(["infer", "nodes.json", "-t", "Post", "--color", "never"])
        .unwrap();
    let params = InferParams::from_matches(&m);

    assert_eq!(params.nodes_path, Some(PathBuf::from("nodes.json")));
    assert_eq!(params.type_name.as_deref(), Some("Post"));
    assert_eq!(params.config, None);
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn check_extracts_query_and_flags() {
    let m = check_command()
        .try_get_matches_from(["check", "queries/", "-n", "nodes.json", "--strict", "-c", "site.json"])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert_eq!(params.query_path, Some(PathBuf::from("queries/")));
    assert_eq!(params.query_text, None);
    assert_eq!(params.nodes_path, Some(PathBuf::from("nodes.json")));
    assert_eq!(params.config, Some(PathBuf::from("site.json")));
    assert!(params.strict);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn query_path_and_text_conflict() {
    let result = check_command().try_get_matches_from(["check", "a.graphql", "-q", "{ x }"]);

    assert!(result.is_err());
}

#[test]
fn exec_extracts_runtime_options() {
    let m = exec_command()
        .try_get_matches_from([
            "exec",
            "-q",
            "{ allPost { id } }",
            "--nodes",
            "nodes.json",
            "-o",
            "Posts",
            "--vars",
            r#"{"n":1}"#,
            "--compact",
            "--color",
            "always",
        ])
        .unwrap();
    let params = ExecParams::from_matches(&m);

    assert_eq!(params.query_path, None);
    assert_eq!(params.query_text.as_deref(), Some("{ allPost { id } }"));
    assert_eq!(params.operation.as_deref(), Some("Posts"));
    assert_eq!(params.vars.as_deref(), Some(r#"{"n":1}"#));
    assert!(params.compact);
    assert_eq!(params.color, ColorChoice::Always);
}

#[test]
fn color_values_are_checked() {
    let result = exec_command().try_get_matches_from(["exec", "--color", "sometimes"]);

    assert!(result.is_err());
}

#[test]
fn cli_requires_a_subcommand() {
    assert!(build_cli().try_get_matches_from(["sitegraph"]).is_err());
    build_cli().debug_assert();
}
