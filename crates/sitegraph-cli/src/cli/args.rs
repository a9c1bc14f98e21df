//! Argument builders shared by the subcommands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

fn path_option(id: &'static str, short: char, long: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .long(long)
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
}

fn flag(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).action(ArgAction::SetTrue).help(help)
}

/// Positional node dump, for `infer`.
pub fn nodes_path_arg() -> Arg {
    Arg::new("nodes_path")
        .value_name("NODES")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON array of nodes")
}

/// `-n/--nodes`, the node dump for query commands.
pub fn nodes_arg() -> Arg {
    path_option("nodes_path", 'n', "nodes").help("JSON array of nodes to build the schema from")
}

pub fn query_path_arg() -> Arg {
    Arg::new("query_path")
        .value_name("QUERY")
        .value_parser(value_parser!(PathBuf))
        .help("Query file, directory of .graphql files, or - for stdin")
}

pub fn query_text_arg() -> Arg {
    Arg::new("query_text")
        .short('q')
        .long("query")
        .value_name("TEXT")
        .conflicts_with("query_path")
        .help("Inline query text")
}

pub fn config_arg() -> Arg {
    path_option("config", 'c', "config").help("Site config (JSON)")
}

pub fn type_arg() -> Arg {
    Arg::new("type_name")
        .short('t')
        .long("type")
        .value_name("NAME")
        .help("Print only this type")
}

pub fn operation_arg() -> Arg {
    Arg::new("operation")
        .short('o')
        .long("operation")
        .value_name("NAME")
        .help("Operation to run when the query defines several")
}

pub fn vars_arg() -> Arg {
    Arg::new("vars")
        .long("vars")
        .value_name("JSON")
        .help("Query variables as a JSON object")
}

pub fn compact_arg() -> Arg {
    flag("compact", "Print JSON on one line")
}

/// `--strict`: warnings fail the check.
pub fn strict_arg() -> Arg {
    flag("strict", "Treat warnings as errors")
}

pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
