//! Validation of executable definitions against the composed schema.

use indexmap::IndexSet;
use rowan::TextRange;
use sitegraph_core::utils::find_similar;

use crate::diagnostics::{DiagnosticKind, line_col};
use crate::parser::ast::{
    Definition, Directive, Field, FragmentDefinition, OperationDefinition, SelectionSet,
};
use crate::parser::{OperationType, Selection};
use crate::schema::Schema;

/// Directives the executor understands.
const KNOWN_DIRECTIVES: [&str; 2] = ["include", "skip"];

pub(crate) const TYPENAME_FIELD: &str = "__typename";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: DiagnosticKind,
    pub message: String,
    pub range: TextRange,
    /// A close match for a misspelled name.
    pub suggestion: Option<String>,
}

impl Violation {
    /// The compiler error text for this violation inside document `doc_name`.
    ///
    /// `source` is the text the violation's range points into.
    pub fn to_raw_error(&self, doc_name: &str, source: &str) -> String {
        let at = line_col(source, self.range.start());
        let line = source.lines().nth(at.line as usize - 1).unwrap_or_default();
        format!(
            "Error: RelayParser: {}\nSource: document `{doc_name}` file: `GraphQL request`.\n\nGraphQL request ({at})\n{}: {line}\n\n",
            self.message, at.line
        )
    }
}

/// Schema violations of one operation or fragment, in document order.
///
/// Spreads are checked by name only; each fragment is validated on its own.
pub fn validate_definition(schema: &Schema, def: &Definition, fragments: &IndexSet<String>) -> Vec<Violation> {
    let mut validator = Validator {
        schema,
        fragments,
        violations: Vec::new(),
    };
    match def {
        Definition::Operation(op) => validator.operation(op),
        Definition::Fragment(fragment) => validator.fragment(fragment),
        _ => {}
    }
    validator.violations
}

struct Validator<'a> {
    schema: &'a Schema,
    fragments: &'a IndexSet<String>,
    violations: Vec<Violation>,
}

impl Validator<'_> {
    fn report(&mut self, kind: DiagnosticKind, range: TextRange, message: String) {
        self.violations.push(Violation {
            kind,
            message,
            range,
            suggestion: None,
        });
    }

    fn operation(&mut self, op: &OperationDefinition) {
        for directive in op.directives() {
            self.directive(&directive);
        }
        let op_type = op.operation_type();
        if op_type != OperationType::Query {
            let range = op.as_cst().text_range();
            self.report(
                DiagnosticKind::UnknownType,
                range,
                format!("Schema is not configured for {}s.", op_type.as_str()),
            );
            return;
        }
        let root = self.schema.query_type_name().to_owned();
        if let Some(set) = op.selection_set() {
            self.selection_set(&root, &set);
        }
    }

    fn fragment(&mut self, fragment: &FragmentDefinition) {
        for directive in fragment.directives() {
            self.directive(&directive);
        }
        let Some(type_name) = fragment.type_condition().and_then(|t| t.name()) else {
            return;
        };
        if self.schema.get_type(type_name.text()).is_none() {
            self.report(
                DiagnosticKind::UnknownType,
                type_name.text_range(),
                format!("Unknown type `{}`.", type_name.text()),
            );
            return;
        }
        if let Some(set) = fragment.selection_set() {
            self.selection_set(type_name.text(), &set);
        }
    }

    fn selection_set(&mut self, parent: &str, set: &SelectionSet) {
        for selection in set.selections() {
            match &selection {
                Selection::Field(field) => self.field(parent, field),
                Selection::FragmentSpread(spread) => {
                    for directive in spread.directives() {
                        self.directive(&directive);
                    }
                    let Some(name) = spread.name() else { continue };
                    if !self.fragments.contains(name.text()) {
                        self.report(
                            DiagnosticKind::UnknownFragment,
                            name.text_range(),
                            format!("Unknown fragment `{}`.", name.text()),
                        );
                    }
                }
                Selection::InlineFragment(fragment) => {
                    for directive in fragment.directives() {
                        self.directive(&directive);
                    }
                    let target = match fragment.type_condition().and_then(|t| t.name()) {
                        Some(name) if self.schema.get_type(name.text()).is_none() => {
                            self.report(
                                DiagnosticKind::UnknownType,
                                name.text_range(),
                                format!("Unknown type `{}`.", name.text()),
                            );
                            continue;
                        }
                        Some(name) => name.text().to_owned(),
                        None => parent.to_owned(),
                    };
                    if let Some(set) = fragment.selection_set() {
                        self.selection_set(&target, &set);
                    }
                }
            }
        }
    }

    fn field(&mut self, parent: &str, field: &Field) {
        let Some(name) = field.name() else { return };
        for directive in field.directives() {
            self.directive(&directive);
        }
        if name.text() == TYPENAME_FIELD {
            return;
        }

        let Some(def) = self.schema.field(parent, name.text()) else {
            let known: Vec<&str> = self
                .schema
                .fields_of(parent)
                .map(|fields| fields.keys().map(String::as_str).collect())
                .unwrap_or_default();
            let max_distance = (name.text().len() / 3).max(2);
            self.violations.push(Violation {
                kind: DiagnosticKind::UnknownField,
                message: format!("Unknown field `{}` on type `{parent}`.", name.text()),
                range: name.text_range(),
                suggestion: find_similar(name.text(), &known, max_distance).map(str::to_owned),
            });
            return;
        };

        for arg in field.arguments() {
            let Some(arg_name) = arg.name() else { continue };
            if !def.args.contains_key(arg_name.text()) {
                self.report(
                    DiagnosticKind::UnknownArgument,
                    arg_name.text_range(),
                    format!("Unknown argument `{}` for field {parent}.{}.", arg_name.text(), name.text()),
                );
            }
        }

        let type_name = def.ty.named_type().to_owned();
        let is_leaf = self.schema.get_type(&type_name).is_none_or(|t| t.is_leaf());
        match (is_leaf, field.selection_set()) {
            (true, Some(set)) => self.report(
                DiagnosticKind::LeafSelection,
                set.as_cst().text_range(),
                format!(
                    "Field `{}` of type `{}` must not have a selection since type `{type_name}` has no subfields.",
                    name.text(),
                    def.ty
                ),
            ),
            (false, None) => self.report(
                DiagnosticKind::MissingSelection,
                name.text_range(),
                format!(
                    "Field `{}` of type `{}` must have a selection of subfields.",
                    name.text(),
                    def.ty
                ),
            ),
            (false, Some(set)) => self.selection_set(&type_name, &set),
            (true, None) => {}
        }
    }

    fn directive(&mut self, directive: &Directive) {
        let Some(name) = directive.name() else { return };
        if !KNOWN_DIRECTIVES.contains(&name.text()) {
            self.report(
                DiagnosticKind::UnknownDirective,
                name.text_range(),
                format!("Unknown directive `@{}`.", name.text()),
            );
            return;
        }
        for arg in directive.arguments() {
            let Some(arg_name) = arg.name() else { continue };
            if arg_name.text() != "if" {
                self.report(
                    DiagnosticKind::UnknownArgument,
                    arg_name.text_range(),
                    format!("Unknown argument `{}` for directive @{}.", arg_name.text(), name.text()),
                );
            }
        }
    }
}
