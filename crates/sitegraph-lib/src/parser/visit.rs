//! AST visitor for executable definitions.
//!
//! Implement `Visitor` and override `visit_*` methods. Call the matching
//! `walk_*` inside an override to continue into children. Returning
//! `ControlFlow::Break` stops the whole walk, so a visitor searching for the
//! first match in pre-order can bail out as soon as it finds one.

use std::ops::ControlFlow;

use super::ast::{
    Argument, Definition, Directive, Field, FragmentSpread, InlineFragment, Selection,
    SelectionSet, VariableDefinition,
};

pub trait Visitor: Sized {
    fn visit_definition(&mut self, def: &Definition) -> ControlFlow<()> {
        walk_definition(self, def)
    }

    fn visit_variable_definition(&mut self, _var: &VariableDefinition) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_selection_set(&mut self, set: &SelectionSet) -> ControlFlow<()> {
        walk_selection_set(self, set)
    }

    fn visit_field(&mut self, field: &Field) -> ControlFlow<()> {
        walk_field(self, field)
    }

    fn visit_argument(&mut self, _arg: &Argument) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_directive(&mut self, directive: &Directive) -> ControlFlow<()> {
        walk_directive(self, directive)
    }

    fn visit_fragment_spread(&mut self, spread: &FragmentSpread) -> ControlFlow<()> {
        for directive in spread.directives() {
            self.visit_directive(&directive)?;
        }
        ControlFlow::Continue(())
    }

    fn visit_inline_fragment(&mut self, fragment: &InlineFragment) -> ControlFlow<()> {
        walk_inline_fragment(self, fragment)
    }
}

pub fn walk_definition<V: Visitor>(visitor: &mut V, def: &Definition) -> ControlFlow<()> {
    match def {
        Definition::Operation(op) => {
            for var in op.variable_definitions() {
                visitor.visit_variable_definition(&var)?;
            }
            for directive in op.directives() {
                visitor.visit_directive(&directive)?;
            }
            if let Some(set) = op.selection_set() {
                visitor.visit_selection_set(&set)?;
            }
        }
        Definition::Fragment(fragment) => {
            for directive in fragment.directives() {
                visitor.visit_directive(&directive)?;
            }
            if let Some(set) = fragment.selection_set() {
                visitor.visit_selection_set(&set)?;
            }
        }
        _ => {}
    }
    ControlFlow::Continue(())
}

pub fn walk_selection_set<V: Visitor>(visitor: &mut V, set: &SelectionSet) -> ControlFlow<()> {
    for selection in set.selections() {
        match &selection {
            Selection::Field(field) => visitor.visit_field(field)?,
            Selection::FragmentSpread(spread) => visitor.visit_fragment_spread(spread)?,
            Selection::InlineFragment(fragment) => visitor.visit_inline_fragment(fragment)?,
        }
    }
    ControlFlow::Continue(())
}

pub fn walk_field<V: Visitor>(visitor: &mut V, field: &Field) -> ControlFlow<()> {
    for arg in field.arguments() {
        visitor.visit_argument(&arg)?;
    }
    for directive in field.directives() {
        visitor.visit_directive(&directive)?;
    }
    if let Some(set) = field.selection_set() {
        visitor.visit_selection_set(&set)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_directive<V: Visitor>(visitor: &mut V, directive: &Directive) -> ControlFlow<()> {
    for arg in directive.arguments() {
        visitor.visit_argument(&arg)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_inline_fragment<V: Visitor>(
    visitor: &mut V,
    fragment: &InlineFragment,
) -> ControlFlow<()> {
    for directive in fragment.directives() {
        visitor.visit_directive(&directive)?;
    }
    if let Some(set) = fragment.selection_set() {
        visitor.visit_selection_set(&set)?;
    }
    ControlFlow::Continue(())
}
