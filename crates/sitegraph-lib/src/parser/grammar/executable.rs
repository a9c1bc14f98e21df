use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{DEFINITION_RECOVERY, DESCRIPTION_FIRST, SELECTION_RECOVERY};

const OPERATION_KEYWORDS: [&str; 3] = ["query", "mutation", "subscription"];

const TYPE_SYSTEM_KEYWORDS: [&str; 9] = [
    "schema",
    "type",
    "interface",
    "union",
    "enum",
    "scalar",
    "input",
    "directive",
    "extend",
];

impl Parser<'_> {
    pub(crate) fn parse_document(&mut self) {
        self.start_node(SyntaxKind::Document);

        while !self.should_stop() {
            if self.currently_at_definition_start() {
                self.parse_definition();
            } else {
                self.error_until_next_definition();
            }
        }

        self.eat_trivia();
        self.finish_node();
    }

    fn parse_definition(&mut self) {
        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_operation();
            return;
        }
        if self.currently_is_one_of(DESCRIPTION_FIRST) {
            self.parse_type_system_definition();
            return;
        }

        let keyword = self.current_text();
        if OPERATION_KEYWORDS.contains(&keyword) {
            self.parse_operation();
        } else if keyword == "fragment" {
            self.parse_fragment_definition();
        } else {
            self.parse_type_system_definition();
        }
    }

    pub(crate) fn currently_at_definition_start(&mut self) -> bool {
        if self.currently_is_one_of(DEFINITION_RECOVERY) {
            return true;
        }
        if !self.currently_is(SyntaxKind::Name) {
            return false;
        }
        let keyword = self.current_text();
        OPERATION_KEYWORDS.contains(&keyword)
            || keyword == "fragment"
            || TYPE_SYSTEM_KEYWORDS.contains(&keyword)
    }

    fn error_until_next_definition(&mut self) {
        self.start_node(SyntaxKind::Error);
        self.error_msg(
            DiagnosticKind::ExpectedDefinition,
            "an operation, fragment or type definition",
        );
        while !self.should_stop() && !self.currently_at_definition_start() {
            self.bump();
        }
        self.finish_node();
    }

    /// `query Name($v: T) @dir { ... }` or the `{ ... }` shorthand.
    fn parse_operation(&mut self) {
        self.start_node(SyntaxKind::OperationDefinition);

        if self.currently_is(SyntaxKind::Name) {
            self.bump(); // operation keyword
            self.eat_token(SyntaxKind::Name);
            if self.currently_is(SyntaxKind::ParenOpen) {
                self.parse_variable_definitions();
            }
            self.parse_directives(false);
        }

        self.parse_required_selection_set();
        self.finish_node();
    }

    fn parse_variable_definitions(&mut self) {
        self.start_node(SyntaxKind::VariableDefinitions);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump(); // '('

        while !self.should_stop() && !self.currently_is(SyntaxKind::ParenClose) {
            if self.currently_is(SyntaxKind::Dollar) {
                self.parse_variable_definition();
            } else if self.currently_is(SyntaxKind::BraceOpen) {
                break;
            } else {
                self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, "expected `$variable`");
            }
        }

        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    fn parse_variable_definition(&mut self) {
        self.start_node(SyntaxKind::VariableDefinition);
        self.parse_variable();
        self.expect(SyntaxKind::Colon, "`:` after variable");
        self.parse_type();
        if self.currently_is(SyntaxKind::Equals) {
            self.parse_default_value();
        }
        self.parse_directives(true);
        self.finish_node();
    }

    pub(crate) fn parse_variable(&mut self) {
        self.assert_current(SyntaxKind::Dollar);
        self.start_node(SyntaxKind::Variable);
        self.bump(); // '$'
        self.expect_name("variable name after `$`");
        self.finish_node();
    }

    pub(crate) fn parse_required_selection_set(&mut self) {
        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_selection_set();
        } else {
            self.error(DiagnosticKind::ExpectedSelectionSet);
        }
    }

    pub(crate) fn parse_selection_set(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        self.start_node(SyntaxKind::SelectionSet);
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump(); // '{'

        while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
            match self.current() {
                SyntaxKind::Name => self.parse_field(),
                SyntaxKind::Spread => self.parse_fragment_selection(),
                _ => self.error_recover(
                    DiagnosticKind::UnexpectedToken,
                    "expected a field or fragment",
                    SELECTION_RECOVERY,
                ),
            }
        }

        self.close_delimiter(SyntaxKind::BraceClose);
        self.finish_node();
        self.exit_recursion();
    }

    /// `alias: name(args) @dir { ... }`
    fn parse_field(&mut self) {
        self.start_node(SyntaxKind::Field);

        if self.next_is(SyntaxKind::Colon) {
            self.start_node(SyntaxKind::Alias);
            self.bump(); // alias
            self.bump(); // ':'
            self.finish_node();
            self.expect_name("field name after alias");
        } else {
            self.bump();
        }

        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_arguments(false);
        }
        self.parse_directives(false);
        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_selection_set();
        }

        self.finish_node();
    }

    /// `...Name` or `... on Type { ... }` or `... @dir { ... }`
    fn parse_fragment_selection(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump(); // '...'

        if self.currently_is(SyntaxKind::Name) && self.current_text() != "on" {
            self.start_node_at(checkpoint, SyntaxKind::FragmentSpread);
            self.bump();
            self.parse_directives(false);
            self.finish_node();
            return;
        }

        self.start_node_at(checkpoint, SyntaxKind::InlineFragment);
        if self.at_keyword("on") {
            self.parse_type_condition();
        }
        self.parse_directives(false);
        self.parse_required_selection_set();
        self.finish_node();
    }

    fn parse_type_condition(&mut self) {
        self.start_node(SyntaxKind::TypeCondition);
        self.bump(); // 'on'
        self.parse_named_type();
        self.finish_node();
    }

    /// `fragment Name on Type @dir { ... }`
    fn parse_fragment_definition(&mut self) {
        self.start_node(SyntaxKind::FragmentDefinition);
        self.bump(); // 'fragment'

        if self.at_keyword("on") {
            self.error_msg(DiagnosticKind::ExpectedName, "fragment name before `on`");
        } else {
            self.expect_name("fragment name");
        }

        if self.at_keyword("on") {
            self.parse_type_condition();
        } else {
            self.error_msg(DiagnosticKind::ExpectedType, "`on Type` after fragment name");
        }
        self.parse_directives(false);
        self.parse_required_selection_set();
        self.finish_node();
    }
}
