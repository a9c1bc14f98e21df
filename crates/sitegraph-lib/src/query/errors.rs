//! Query errors mapped back to the file and position they came from.
//!
//! Compilation failures arrive as raw text naming the failing document.
//! [`graphql_error`] pulls the message and document name out of that text,
//! finds the offending name inside the document and renders a code frame
//! around it. When nothing can be located, the whole document is shown
//! instead. Every report here is plain data; callers decide how to surface it.

use std::ops::ControlFlow;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex_automata::meta::Regex;
use rowan::TextRange;
use sitegraph_core::utils::{to_camel_case, upper_first};

use crate::diagnostics::{Diagnostics, Location, code_frame, line_col, numbered_listing};
use crate::parser::ast::{Argument, Definition, Directive, Document, Field, OperationDefinition};
use crate::parser::printer::{print_definition, print_selection_block};
use crate::parser::visit::{Visitor, walk_directive, walk_field};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryError {
    /// Message, file and code frame, ready to print.
    pub formatted_message: String,
    /// Name of the failing document; empty when unknown.
    pub doc_name: String,
    pub message: String,
    pub code_block: String,
    /// Position the code frame points at, if one was found.
    pub location: Option<Location>,
}

/// Pieces of a raw compiler error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedError {
    pub message: String,
    pub doc_name: String,
    pub code_block: String,
}

static DOCUMENT_ERROR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?sm)Error:.(RelayParser|GraphQLParser):(.*)Source: document.`(.*)`.file.*(GraphQL.request.*^\s*$)")
        .ok()
});

type Extractor = fn(&str, Candidate<'_>) -> Option<TextRange>;

/// Message patterns in the order they are tried. The first capture group
/// is the name to look for.
static LOCATION_RULES: LazyLock<Vec<(Regex, Extractor)>> = LazyLock::new(|| {
    let rules: [(&str, Extractor); 3] = [
        (r"(?i)Unknown field `(.+)` on type `(.+)`", field_name),
        (r"(?i)Unknown argument `(.+)`", argument_name),
        (r"(?i)Unknown directive `@(.+)`", directive_name),
    ];
    rules
        .into_iter()
        .filter_map(|(pattern, extract)| Some((Regex::new(pattern).ok()?, extract)))
        .collect()
});

const COMPILE_ERROR_HEADER: &str = "There was an error while compiling your site's GraphQL queries.";

const DUPLICATE_DOCUMENT_HINT: &str =
    "Query and fragment names are global; rename one of the documents to fix this.\n";

/// Split a raw compiler error into message, document name and code block.
///
/// When the text does not have the expected layout, the whole text
/// becomes the message.
pub fn extract_error(raw: &str) -> ExtractedError {
    let mut extracted = ExtractedError::default();
    if let Some(caps) = DOCUMENT_ERROR.as_ref().and_then(|re| re.captures_iter(raw).last()) {
        let group = |i: usize| caps.get_group(i).map_or("", |span| &raw[span.start..span.end]);
        extracted.message = group(2).to_owned();
        extracted.doc_name = group(3).to_owned();
        extracted.code_block = group(4).to_owned();
    }
    if extracted.message.is_empty() {
        extracted.message = raw.to_owned();
    }
    extracted.message = extracted.message.trim().to_owned();
    extracted
}

#[derive(Clone, Copy)]
enum Candidate<'a> {
    Field(&'a Field),
    Argument(&'a Argument),
    Directive(&'a Directive),
}

fn field_name(name: &str, candidate: Candidate<'_>) -> Option<TextRange> {
    let Candidate::Field(field) = candidate else {
        return None;
    };
    field.name().filter(|t| t.text() == name).map(|t| t.text_range())
}

fn argument_name(name: &str, candidate: Candidate<'_>) -> Option<TextRange> {
    let Candidate::Argument(arg) = candidate else {
        return None;
    };
    arg.name().filter(|t| t.text() == name).map(|t| t.text_range())
}

fn directive_name(name: &str, candidate: Candidate<'_>) -> Option<TextRange> {
    let Candidate::Directive(directive) = candidate else {
        return None;
    };
    directive.name().filter(|t| t.text() == name).map(|t| t.text_range())
}

/// Depth-first search for the first node any matching rule accepts.
struct LocationFinder {
    targets: Vec<(String, Extractor)>,
    found: Option<TextRange>,
}

impl LocationFinder {
    fn new(message: &str) -> Self {
        let targets = LOCATION_RULES
            .iter()
            .filter_map(|(re, extract)| {
                let mut caps = re.create_captures();
                re.captures(message, &mut caps);
                let span = caps.get_group(1)?;
                Some((message[span.start..span.end].to_owned(), *extract))
            })
            .collect();
        Self { targets, found: None }
    }

    fn check(&mut self, candidate: Candidate<'_>) -> ControlFlow<()> {
        for (name, extract) in &self.targets {
            if let Some(range) = extract(name, candidate) {
                self.found = Some(range);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}

impl Visitor for LocationFinder {
    fn visit_field(&mut self, field: &Field) -> ControlFlow<()> {
        self.check(Candidate::Field(field))?;
        walk_field(self, field)
    }

    fn visit_argument(&mut self, arg: &Argument) -> ControlFlow<()> {
        self.check(Candidate::Argument(arg))
    }

    fn visit_directive(&mut self, directive: &Directive) -> ControlFlow<()> {
        self.check(Candidate::Directive(directive))?;
        walk_directive(self, directive)
    }
}

/// Range of the name `message` complains about, searched in pre-order.
pub fn find_location(message: &str, def: &Definition) -> Option<TextRange> {
    let mut finder = LocationFinder::new(message);
    if finder.targets.is_empty() {
        return None;
    }
    let _ = finder.visit_definition(def);
    finder.found
}

/// Text of the whole document `def` was parsed from.
fn document_source(def: &Definition) -> Option<String> {
    def.as_cst().ancestors().last().map(|root| root.text().to_string())
}

fn definition_frame(def: &Definition, message: &str, path: &str) -> (String, Option<Location>) {
    let located = find_location(message, def).zip(document_source(def));
    match located {
        Some((range, source)) => (
            code_frame(&source, message, Some(path), range, false),
            Some(line_col(&source, range.start())),
        ),
        // A re-printed definition has its own positions, so nothing is marked.
        None => (numbered_listing(&print_definition(def)), None),
    }
}

fn format_error(message: &str, path: &str, code_frame: &str) -> String {
    format!("{message}\n\n  file: {path}\n\n{code_frame}\n")
}

/// Turn a raw compiler error into a located report.
///
/// `doc_paths` maps document names to the file declaring them and `defs`
/// maps them to their parsed definitions.
pub fn graphql_error(
    doc_paths: &IndexMap<String, String>,
    defs: &IndexMap<String, Definition>,
    raw: &str,
) -> QueryError {
    let ExtractedError {
        message, doc_name, ..
    } = extract_error(raw);

    let known = doc_paths.get(&doc_name).zip(defs.get(&doc_name));
    if let Some((path, def)) = known.filter(|_| !doc_name.is_empty()) {
        let (code_block, location) = definition_frame(def, &message, path);
        return QueryError {
            formatted_message: format_error(&message, path, &code_block),
            doc_name,
            message,
            code_block,
            location,
        };
    }

    let mut formatted_message = format!("{COMPILE_ERROR_HEADER}\n  {message}\n    ");
    if raw.contains("Duplicate document") {
        formatted_message.push_str(DUPLICATE_DOCUMENT_HINT);
    }
    QueryError {
        formatted_message,
        doc_name,
        message,
        code_block: String::new(),
        location: None,
    }
}

/// Report the first error of `errors`, framed inside `doc`.
pub fn graphql_validation_error(errors: &Diagnostics, path: &str, doc: &Document) -> Option<QueryError> {
    let error = errors.iter().find(|d| d.is_error())?;
    let source = doc.as_cst().text().to_string();
    let code_block = code_frame(&source, error.message(), Some(path), error.range(), false);
    Some(QueryError {
        formatted_message: format_error(error.message(), path, &code_block),
        doc_name: String::new(),
        message: error.message().to_owned(),
        code_block,
        location: Some(line_col(&source, error.range().start())),
    })
}

/// Warning for a file declaring a second root query `def` after `other_def`.
///
/// Shows both queries as written and the single query that should replace
/// them, with both root selections merged.
pub fn multiple_root_queries_error(
    path: &str,
    def: &OperationDefinition,
    other_def: &OperationDefinition,
) -> String {
    let name = operation_name(def);
    let other_name = operation_name(other_def);
    let unified_name = format!("{}And{}", to_camel_case(&name), upper_first(&to_camel_case(&other_name)));

    let message = format!(
        "Multiple \"root\" queries found in file: \"{name}\" and \"{other_name}\". \
         Only the first (\"{other_name}\") will be registered."
    );
    let instead = format!(
        "{}\n\n{}",
        print_definition(&Definition::Operation(other_def.clone())),
        print_definition(&Definition::Operation(def.clone())),
    );
    let sets: Vec<_> = [other_def, def].iter().filter_map(|op| op.selection_set()).collect();
    let merged = format!("query {unified_name} {}", print_selection_block(&sets, 0));

    let frames = format!(
        "  Instead of:\n\n{}\n  Do:\n\n{}",
        numbered_listing(&instead),
        numbered_listing(&merged)
    );
    format_error(&message, path, &frames)
}

fn operation_name(op: &OperationDefinition) -> String {
    op.name().map(|t| t.text().to_string()).unwrap_or_default()
}
