//! Grammar productions for GraphQL documents.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! One grammar covers executable documents (queries, fragments) and
//! type-system documents (SDL), since third-party schemas and user type
//! definitions share the parser with page queries.

mod executable;
mod type_system;
mod values;
