//! Compilation of query files against a built schema.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::errors::{QueryError, graphql_error, graphql_validation_error, multiple_root_queries_error};
use super::plan::Operation;
use super::source_map::{SourceId, SourceMap};
use super::validate::validate_definition;
use crate::Result;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::ast::{Definition, Document, FragmentDefinition, OperationDefinition};
use crate::parser::printer::print_definition;
use crate::parser::{DEFAULT_EXEC_FUEL, DEFAULT_RECURSION_FUEL, parse_with_fuel};
use crate::schema::Schema;

/// A query that passed validation.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub name: String,
    pub path: String,
    /// The operation as re-printed, without fragments.
    pub text: String,
    pub operation: Operation,
}

#[derive(Debug, Clone, Default)]
pub struct CompileResult {
    pub queries: IndexMap<String, CompiledQuery>,
    pub errors: Vec<QueryError>,
    pub warnings: Vec<String>,
    /// Positioned findings per file, warnings included.
    pub diagnostics: IndexMap<String, Diagnostics>,
}

impl CompileResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn query(&self, name: &str) -> Option<&CompiledQuery> {
        self.queries.get(name)
    }

    fn diagnostics_for(&mut self, path: &str) -> &mut Diagnostics {
        self.diagnostics.entry(path.to_owned()).or_default()
    }
}

/// Parses, registers and validates every query source of a build.
///
/// Operation and fragment names are global across all files.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    schema: Arc<Schema>,
    sources: SourceMap,
    exec_fuel: Option<u32>,
    recursion_fuel: Option<u32>,
}

/// A parsed source that had no syntax errors.
struct ParsedFile {
    path: String,
    source: String,
    document: Document,
}

impl QueryCompiler {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            sources: SourceMap::new(),
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
        }
    }

    pub fn with_exec_fuel(mut self, fuel: Option<u32>) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn with_recursion_fuel(mut self, fuel: Option<u32>) -> Self {
        self.recursion_fuel = fuel;
        self
    }

    pub fn add_file(&mut self, path: &str, text: &str) -> SourceId {
        self.sources.add_file(path, text)
    }

    pub fn add_inline(&mut self, text: &str) -> SourceId {
        self.sources.add_inline(text)
    }

    pub fn add_stdin(&mut self, text: &str) -> SourceId {
        self.sources.add_stdin(text)
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Compile every added source.
    ///
    /// Query problems are returned in the result; only fuel exhaustion
    /// fails the call.
    pub fn compile(&self) -> Result<CompileResult> {
        let mut result = CompileResult::default();

        let files = self.parse_sources(&mut result)?;
        let (doc_paths, defs) = register(&files, &mut result);

        let fragment_names: IndexSet<String> = defs
            .iter()
            .filter(|(_, def)| matches!(def, Definition::Fragment(_)))
            .map(|(name, _)| name.clone())
            .collect();

        let mut invalid = IndexSet::new();
        for (name, def) in &defs {
            let violations = validate_definition(&self.schema, def, &fragment_names);
            if violations.is_empty() {
                continue;
            }
            invalid.insert(name.clone());
            let Some(path) = doc_paths.get(name) else { continue };
            let source = files
                .iter()
                .find(|f| &f.path == path)
                .map_or("", |f| f.source.as_str());
            for violation in violations {
                let report = result
                    .diagnostics_for(path)
                    .report(violation.kind, violation.range)
                    .raw_message(violation.message.clone());
                match &violation.suggestion {
                    Some(similar) => report.hint(format!("did you mean `{similar}`?")).emit(),
                    None => report.emit(),
                }
                let error = graphql_error(&doc_paths, &defs, &violation.to_raw_error(name, source));
                tracing::debug!(document = %name, path = %path, "{}", error.message);
                result.errors.push(error);
            }
        }

        let fragments: IndexMap<String, FragmentDefinition> = defs
            .iter()
            .filter(|(name, _)| !invalid.contains(*name))
            .filter_map(|(name, def)| match def {
                Definition::Fragment(fragment) => Some((name.clone(), fragment.clone())),
                _ => None,
            })
            .collect();

        for (name, def) in &defs {
            let Definition::Operation(op) = def else { continue };
            if invalid.contains(name) {
                continue;
            }
            let Some(operation) = Operation::build(op, &fragments) else {
                tracing::debug!(document = %name, "skipped: spreads an invalid fragment");
                continue;
            };
            let path = doc_paths.get(name).cloned().unwrap_or_default();
            result.queries.insert(
                name.clone(),
                CompiledQuery {
                    name: name.clone(),
                    path,
                    text: print_definition(def),
                    operation,
                },
            );
        }

        tracing::debug!(
            queries = result.queries.len(),
            errors = result.errors.len(),
            "compiled queries"
        );
        Ok(result)
    }

    fn parse_sources(&self, result: &mut CompileResult) -> Result<Vec<ParsedFile>> {
        let mut files = Vec::new();
        for source in self.sources.iter() {
            let path = source.display_name().to_owned();
            let (document, diagnostics) =
                parse_with_fuel(source.as_str(), self.exec_fuel, self.recursion_fuel)?;
            let diagnostics = diagnostics.filtered();
            if let Some(error) = graphql_validation_error(&diagnostics, &path, &document) {
                tracing::debug!(path = %path, "query file has syntax errors");
                result.errors.push(error);
                result.diagnostics_for(&path).extend(diagnostics);
                continue;
            }
            files.push(ParsedFile {
                path,
                source: source.as_str().to_owned(),
                document,
            });
        }
        Ok(files)
    }
}

/// Name every executable definition, dropping extra root queries and
/// duplicate names. Unnamed operations are named after their file.
fn register(
    files: &[ParsedFile],
    result: &mut CompileResult,
) -> (IndexMap<String, String>, IndexMap<String, Definition>) {
    let mut doc_paths: IndexMap<String, String> = IndexMap::new();
    let mut defs: IndexMap<String, Definition> = IndexMap::new();

    for file in files {
        let mut root: Option<OperationDefinition> = None;
        for def in file.document.definitions().filter(Definition::is_executable) {
            if let Definition::Operation(op) = &def {
                if let Some(first) = &root {
                    let warning = multiple_root_queries_error(&file.path, op, first);
                    tracing::warn!("{warning}");
                    result
                        .diagnostics_for(&file.path)
                        .report(DiagnosticKind::MultipleRootQueries, op.as_cst().text_range())
                        .message("only the first root query of a file is registered")
                        .related_to("first root query", first.as_cst().text_range())
                        .emit();
                    result.warnings.push(warning);
                    continue;
                }
                root = Some(op.clone());
            }

            let name_token = def.name();
            let name = name_token
                .as_ref()
                .map_or_else(|| file.path.clone(), |t| t.text().to_string());
            if let Some(existing) = doc_paths.get(&name) {
                let raw = format!(
                    "Duplicate document `{name}`: defined in `{existing}` and again in `{}`.",
                    file.path
                );
                let range = name_token.map_or(def.as_cst().text_range(), |t| t.text_range());
                result
                    .diagnostics_for(&file.path)
                    .report(DiagnosticKind::DuplicateDocument, range)
                    .message(format!("`{name}`"))
                    .hint("document names must be unique across the site; rename one of them")
                    .emit();
                let error = graphql_error(&doc_paths, &defs, &raw);
                tracing::debug!(document = %name, "{}", error.message);
                result.errors.push(error);
                continue;
            }
            doc_paths.insert(name.clone(), file.path.clone());
            defs.insert(name, def);
        }
    }
    (doc_paths, defs)
}
