//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("sitegraph")
        .about("Infer, check and run content queries for a static site")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(infer_command())
        .subcommand(check_command())
        .subcommand(exec_command())
}

/// Print the schema built from a node dump.
pub fn infer_command() -> Command {
    Command::new("infer")
        .about("Print the schema inferred from a node dump")
        .after_help(
            r#"EXAMPLES:
  sitegraph infer nodes.json              # whole schema as SDL
  sitegraph infer nodes.json -t Post      # one type
  sitegraph infer nodes.json -c site.json # with type mapping"#,
        )
        .arg(nodes_path_arg())
        .arg(config_arg())
        .arg(type_arg())
        .arg(color_arg())
}

/// Compile queries against the schema.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate queries against the schema")
        .override_usage(
            "\
  sitegraph check <QUERY> [-n <FILE>]
  sitegraph check -q <TEXT> [-n <FILE>]",
        )
        .after_help(
            r#"EXAMPLES:
  sitegraph check src/queries/ -n nodes.json    # every .graphql file
  sitegraph check page.graphql -n nodes.json
  sitegraph check -q '{ allPost { title } }' -n nodes.json"#,
        )
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(nodes_arg())
        .arg(config_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Run a query and print the result.
pub fn exec_command() -> Command {
    Command::new("exec")
        .about("Run a query and print the result as JSON")
        .override_usage(
            "\
  sitegraph exec <QUERY> -n <FILE>
  sitegraph exec -q <TEXT> -n <FILE>",
        )
        .after_help(
            r#"EXAMPLES:
  sitegraph exec page.graphql -n nodes.json
  sitegraph exec -q '{ allPost(limit: 2) { title } }' -n nodes.json --compact
  sitegraph exec -q 'query P($id: String) { post(id: $id) { title } }' -n nodes.json --vars '{"id":"1"}'"#,
        )
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(nodes_arg())
        .arg(config_arg())
        .arg(operation_arg())
        .arg(vars_arg())
        .arg(compact_arg())
        .arg(color_arg())
}
