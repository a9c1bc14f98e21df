//! Page queries: compilation, error reporting and execution.
//!
//! Stages: parse → register → validate → plan. Syntax errors are reported
//! through [`graphql_validation_error`]; schema violations are rendered as
//! compiler error text and mapped back to their document through
//! [`graphql_error`]. Queries that pass become [`Operation`] plans the
//! [`Executor`] runs.

pub mod compiler;
pub mod errors;
pub mod execute;
pub mod plan;
pub mod source_map;
pub mod validate;

#[cfg(test)]
mod compiler_tests;
#[cfg(test)]
mod execute_tests;
#[cfg(test)]
mod plan_tests;
#[cfg(test)]
mod validate_tests;

pub use compiler::{CompileResult, CompiledQuery, QueryCompiler};
pub use errors::{
    ExtractedError, QueryError, extract_error, find_location, graphql_error,
    graphql_validation_error, multiple_root_queries_error,
};
pub use execute::{ExecutionResult, Executor, FieldError};
pub use plan::Operation;
pub use source_map::{Source, SourceId, SourceKind, SourceMap};
pub use validate::{Violation, validate_definition};
