use std::io;
use std::path::PathBuf;

use sitegraph_lib::ConfigError;

/// Everything a command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("invalid nodes in '{}': {source}", .path.display())]
    Nodes {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no .graphql files found in '{}'", .0.display())]
    NoQueryFiles(PathBuf),

    #[error("query is required: use a positional argument or -q/--query")]
    QueryRequired,

    #[error("--vars must be a JSON object: {0}")]
    Vars(String),

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("unknown operation `{name}`; available: {available}")]
    UnknownOperation { name: String, available: String },

    #[error("the query defines several operations ({0}); pick one with --operation")]
    AmbiguousOperation(String),

    #[error("the query defines no operation")]
    NoOperation,

    #[error("queries failed with {errors} error(s) and {warnings} warning(s)")]
    QueryFailed { errors: usize, warnings: usize },

    #[error("failed to serialize the result: {0}")]
    Output(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] sitegraph_lib::Error),
}
