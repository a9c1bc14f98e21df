//! sitegraph: the data layer of a static site build.
//!
//! Content nodes contributed by plugins land in a [`NodeStore`]. The schema
//! build infers object types from those nodes, merges user and third-party
//! type definitions on top, and produces one executable [`Schema`]. Page
//! queries are compiled against that schema and executed through a cached
//! node resolver; failures are mapped back to positioned diagnostics.
//!
//! # Example
//!
//! ```
//! use sitegraph_core::Node;
//! use sitegraph_lib::{BuildContext, build};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let ctx = BuildContext::default();
//! ctx.create_node(Node::new("1", "Post").with_field("title", "Hi".into()))
//!     .await
//!     .unwrap();
//! let report = build(&ctx, None).await.unwrap();
//! assert!(report.conflicts.is_empty());
//! # });
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod build;
pub mod config;
pub mod diagnostics;
pub mod infer;
pub mod parser;
pub mod plugins;
pub mod query;
pub mod resolve;
pub mod schema;
pub mod store;


/// Result type for passes that produce both output and diagnostics.
///
/// Recoverable problems go into the diagnostics; fatal errors (like fuel
/// exhaustion) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use build::{BuildContext, BuildReport, build, rebuild_with_site_page};
pub use config::{ConfigError, SiteConfig};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use resolve::ResolveError;
pub use schema::Schema;
pub use store::{NodeStore, NodeStoreError};

/// Errors that halt a build or a query compilation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    /// The parser produced a tree without a document root.
    #[error("malformed syntax tree")]
    MalformedTree,

    #[error("type definitions failed to parse with {} errors", .0.error_count())]
    SchemaParseError(Diagnostics),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("schema has not been built")]
    SchemaNotBuilt,

    #[error(transparent)]
    NodeStore(#[from] NodeStoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("plugin `{plugin}` failed in `{api}`: {message}")]
    Plugin {
        plugin: String,
        api: String,
        message: String,
    },
}

/// Result type for build and query operations.
pub type Result<T> = std::result::Result<T, Error>;
