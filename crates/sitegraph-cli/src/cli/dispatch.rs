//! Reads parsed matches into per-command params, then into command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::exec::ExecArgs;
use crate::commands::infer::InferArgs;

pub struct InferParams {
    pub nodes_path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub type_name: Option<String>,
    pub color: ColorChoice,
}

impl InferParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            nodes_path: path(m, "nodes_path"),
            config: path(m, "config"),
            type_name: text(m, "type_name"),
            color: parse_color(m),
        }
    }
}

impl From<InferParams> for InferArgs {
    fn from(p: InferParams) -> Self {
        Self {
            nodes_path: p.nodes_path,
            config: p.config,
            type_name: p.type_name,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub nodes_path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            query_path: path(m, "query_path"),
            query_text: text(m, "query_text"),
            nodes_path: path(m, "nodes_path"),
            config: path(m, "config"),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            nodes_path: p.nodes_path,
            config: p.config,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ExecParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub nodes_path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub operation: Option<String>,
    pub vars: Option<String>,
    pub compact: bool,
    pub color: ColorChoice,
}

impl ExecParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            query_path: path(m, "query_path"),
            query_text: text(m, "query_text"),
            nodes_path: path(m, "nodes_path"),
            config: path(m, "config"),
            operation: text(m, "operation"),
            vars: text(m, "vars"),
            compact: m.get_flag("compact"),
            color: parse_color(m),
        }
    }
}

impl From<ExecParams> for ExecArgs {
    fn from(p: ExecParams) -> Self {
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            nodes_path: p.nodes_path,
            config: p.config,
            operation: p.operation,
            vars: p.vars,
            compact: p.compact,
            color: p.color.should_colorize(),
        }
    }
}

fn path(m: &ArgMatches, id: &str) -> Option<PathBuf> {
    m.get_one::<PathBuf>(id).cloned()
}

fn text(m: &ArgMatches, id: &str) -> Option<String> {
    m.get_one::<String>(id).cloned()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match text(m, "color").as_deref() {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
