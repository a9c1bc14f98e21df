use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::ARGUMENT_RECOVERY;

impl Parser<'_> {
    /// `(name: value, ...)`. `constant` forbids variables (SDL, default values).
    pub(crate) fn parse_arguments(&mut self, constant: bool) {
        self.start_node(SyntaxKind::Arguments);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump(); // '('

        while !self.should_stop() && !self.currently_is(SyntaxKind::ParenClose) {
            if self.currently_is(SyntaxKind::Name) {
                self.parse_argument(constant);
            } else if self.currently_is(SyntaxKind::BraceClose) {
                break;
            } else {
                self.error_recover(
                    DiagnosticKind::ExpectedName,
                    "argument name",
                    ARGUMENT_RECOVERY,
                );
            }
        }

        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    fn parse_argument(&mut self, constant: bool) {
        self.start_node(SyntaxKind::Argument);
        self.bump(); // name
        if self.expect(SyntaxKind::Colon, "`:` after argument name") {
            self.parse_value(constant);
        }
        self.finish_node();
    }

    /// Zero or more `@name(args)`.
    pub(crate) fn parse_directives(&mut self, constant: bool) {
        while !self.should_stop() && self.currently_is(SyntaxKind::At) {
            self.start_node(SyntaxKind::Directive);
            self.bump(); // '@'
            self.expect_name("directive name after `@`");
            if self.currently_is(SyntaxKind::ParenOpen) {
                self.parse_arguments(constant);
            }
            self.finish_node();
        }
    }

    pub(crate) fn parse_default_value(&mut self) {
        self.start_node(SyntaxKind::DefaultValue);
        self.bump(); // '='
        self.parse_value(true);
        self.finish_node();
    }

    pub(crate) fn parse_value(&mut self, constant: bool) {
        if !self.enter_recursion() {
            return;
        }

        match self.current() {
            SyntaxKind::Dollar => {
                if constant {
                    let range = self.current_span();
                    self.diagnostics
                        .report(DiagnosticKind::VariableInConstant, range)
                        .emit();
                }
                self.parse_variable();
            }
            SyntaxKind::IntNumber => self.bump_wrapped(SyntaxKind::IntValue),
            SyntaxKind::FloatNumber => self.bump_wrapped(SyntaxKind::FloatValue),
            SyntaxKind::StringText | SyntaxKind::BlockStringText => {
                self.bump_wrapped(SyntaxKind::StringValue)
            }
            SyntaxKind::UnterminatedString => {
                self.error(DiagnosticKind::UnterminatedString);
                self.bump_wrapped(SyntaxKind::StringValue);
            }
            SyntaxKind::Name => {
                let kind = match self.current_text() {
                    "true" | "false" => SyntaxKind::BooleanValue,
                    "null" => SyntaxKind::NullValue,
                    _ => SyntaxKind::EnumValue,
                };
                self.bump_wrapped(kind);
            }
            SyntaxKind::BracketOpen => self.parse_list_value(constant),
            SyntaxKind::BraceOpen => self.parse_object_value(constant),
            _ => self.error(DiagnosticKind::ExpectedValue),
        }

        self.exit_recursion();
    }

    fn bump_wrapped(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    fn parse_list_value(&mut self, constant: bool) {
        self.start_node(SyntaxKind::ListValue);
        self.push_delimiter(SyntaxKind::BracketOpen);
        self.bump(); // '['

        while !self.should_stop()
            && !self.currently_is(SyntaxKind::BracketClose)
            && !self.currently_is(SyntaxKind::ParenClose)
            && !self.currently_is(SyntaxKind::BraceClose)
        {
            let before = self.position();
            self.parse_value(constant);
            if self.position() == before {
                self.error_and_bump(DiagnosticKind::ExpectedValue);
            }
        }

        self.close_delimiter(SyntaxKind::BracketClose);
        self.finish_node();
    }

    fn parse_object_value(&mut self, constant: bool) {
        self.start_node(SyntaxKind::ObjectValue);
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump(); // '{'

        while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
            if !self.currently_is(SyntaxKind::Name) {
                self.error_and_bump_msg(DiagnosticKind::ExpectedName, "object field name");
                continue;
            }
            self.start_node(SyntaxKind::ObjectField);
            self.bump(); // name
            if self.expect(SyntaxKind::Colon, "`:` after object field name") {
                self.parse_value(constant);
            }
            self.finish_node();
        }

        self.close_delimiter(SyntaxKind::BraceClose);
        self.finish_node();
    }

    /// `Name`, `[Type]`, either followed by `!`.
    pub(crate) fn parse_type(&mut self) {
        if !self.enter_recursion() {
            return;
        }

        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::Name => self.parse_named_type(),
            SyntaxKind::BracketOpen => {
                self.start_node(SyntaxKind::ListType);
                self.push_delimiter(SyntaxKind::BracketOpen);
                self.bump(); // '['
                self.parse_type();
                self.close_delimiter(SyntaxKind::BracketClose);
                self.finish_node();
            }
            _ => {
                self.error(DiagnosticKind::ExpectedType);
                self.exit_recursion();
                return;
            }
        }

        if self.currently_is(SyntaxKind::Bang) {
            self.start_node_at(checkpoint, SyntaxKind::NonNullType);
            self.bump();
            self.finish_node();
        }

        self.exit_recursion();
    }

    pub(crate) fn parse_named_type(&mut self) {
        if !self.currently_is(SyntaxKind::Name) {
            self.error(DiagnosticKind::ExpectedType);
            return;
        }
        self.bump_wrapped(SyntaxKind::NamedType);
    }
}
