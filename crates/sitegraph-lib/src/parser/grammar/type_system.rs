use rowan::Checkpoint;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::DESCRIPTION_FIRST;

impl Parser<'_> {
    /// Type-system definition or extension, with an optional description.
    ///
    /// The description and `extend` keyword are parsed before the definition
    /// kind is known, then wrapped retroactively.
    pub(crate) fn parse_type_system_definition(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_description();
        let is_extension = self.at_keyword("extend");
        if is_extension {
            self.bump();
        }

        match self.current_text() {
            "schema" => self.parse_schema_definition(checkpoint),
            "type" => self.parse_object_like(checkpoint, SyntaxKind::ObjectTypeDefinition),
            "interface" => self.parse_object_like(checkpoint, SyntaxKind::InterfaceTypeDefinition),
            "union" => self.parse_union_definition(checkpoint),
            "enum" => self.parse_enum_definition(checkpoint),
            "scalar" => {
                self.start_node_at(checkpoint, SyntaxKind::ScalarTypeDefinition);
                self.bump();
                self.expect_name("scalar name");
                self.parse_directives(true);
                self.finish_node();
            }
            "input" => self.parse_input_definition(checkpoint),
            "directive" if !is_extension => self.parse_directive_definition(checkpoint),
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::Error);
                self.error_msg(
                    DiagnosticKind::ExpectedDefinition,
                    "a type definition after description or `extend`",
                );
                if !self.should_stop() && !self.currently_at_definition_start() {
                    self.bump();
                }
                self.finish_node();
            }
        }
    }

    fn parse_description(&mut self) {
        if !self.currently_is_one_of(DESCRIPTION_FIRST) {
            return;
        }
        if self.currently_is(SyntaxKind::UnterminatedString) {
            self.error(DiagnosticKind::UnterminatedString);
        }
        self.start_node(SyntaxKind::Description);
        self.bump();
        self.finish_node();
    }

    fn parse_schema_definition(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::SchemaDefinition);
        self.bump(); // 'schema'
        self.parse_directives(true);

        if self.currently_is(SyntaxKind::BraceOpen) {
            self.push_delimiter(SyntaxKind::BraceOpen);
            self.bump();
            while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
                if !self.currently_is(SyntaxKind::Name) {
                    self.error_and_bump_msg(DiagnosticKind::ExpectedName, "operation type");
                    continue;
                }
                self.start_node(SyntaxKind::RootOperationType);
                self.bump(); // query | mutation | subscription
                self.expect(SyntaxKind::Colon, "`:` after operation type");
                self.parse_named_type();
                self.finish_node();
            }
            self.close_delimiter(SyntaxKind::BraceClose);
        }

        self.finish_node();
    }

    /// `type` and `interface` share one shape.
    fn parse_object_like(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.start_node_at(checkpoint, kind);
        self.bump(); // keyword
        self.expect_name("type name");

        if self.at_keyword("implements") {
            self.parse_implements_interfaces();
        }
        self.parse_directives(true);
        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_fields_definition();
        }

        self.finish_node();
    }

    fn parse_implements_interfaces(&mut self) {
        self.start_node(SyntaxKind::ImplementsInterfaces);
        self.bump(); // 'implements'
        self.eat_token(SyntaxKind::Amp);
        self.parse_named_type();
        loop {
            if self.eat_token(SyntaxKind::Amp) {
                self.parse_named_type();
                continue;
            }
            // Legacy space-separated form.
            if self.currently_is(SyntaxKind::Name) {
                self.parse_named_type();
                continue;
            }
            break;
        }
        self.finish_node();
    }

    fn parse_fields_definition(&mut self) {
        self.start_node(SyntaxKind::FieldsDefinition);
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump(); // '{'

        while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
            if self.currently_is(SyntaxKind::Name) || self.currently_is_one_of(DESCRIPTION_FIRST) {
                self.parse_field_definition();
            } else {
                self.error_and_bump_msg(DiagnosticKind::ExpectedName, "field name");
            }
        }

        self.close_delimiter(SyntaxKind::BraceClose);
        self.finish_node();
    }

    fn parse_field_definition(&mut self) {
        self.start_node(SyntaxKind::FieldDefinition);
        self.parse_description();
        self.expect_name("field name");
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_arguments_definition();
        }
        if self.expect(SyntaxKind::Colon, "`:` before field type") {
            self.parse_type();
        }
        self.parse_directives(true);
        self.finish_node();
    }

    fn parse_arguments_definition(&mut self) {
        self.start_node(SyntaxKind::ArgumentsDefinition);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump(); // '('

        while !self.should_stop() && !self.currently_is(SyntaxKind::ParenClose) {
            if self.currently_is(SyntaxKind::Name) || self.currently_is_one_of(DESCRIPTION_FIRST) {
                self.parse_input_value_definition();
            } else if self.currently_is(SyntaxKind::BraceClose) {
                break;
            } else {
                self.error_and_bump_msg(DiagnosticKind::ExpectedName, "argument name");
            }
        }

        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    fn parse_input_value_definition(&mut self) {
        self.start_node(SyntaxKind::InputValueDefinition);
        self.parse_description();
        self.expect_name("argument name");
        if self.expect(SyntaxKind::Colon, "`:` before argument type") {
            self.parse_type();
        }
        if self.currently_is(SyntaxKind::Equals) {
            self.parse_default_value();
        }
        self.parse_directives(true);
        self.finish_node();
    }

    fn parse_union_definition(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::UnionTypeDefinition);
        self.bump(); // 'union'
        self.expect_name("union name");
        self.parse_directives(true);

        if self.currently_is(SyntaxKind::Equals) {
            self.bump();
            self.start_node(SyntaxKind::UnionMembers);
            self.eat_token(SyntaxKind::Pipe);
            self.parse_named_type();
            while self.eat_token(SyntaxKind::Pipe) {
                self.parse_named_type();
            }
            self.finish_node();
        }

        self.finish_node();
    }

    fn parse_enum_definition(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::EnumTypeDefinition);
        self.bump(); // 'enum'
        self.expect_name("enum name");
        self.parse_directives(true);

        if self.currently_is(SyntaxKind::BraceOpen) {
            self.push_delimiter(SyntaxKind::BraceOpen);
            self.bump();
            while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
                if !self.currently_is(SyntaxKind::Name)
                    && !self.currently_is_one_of(DESCRIPTION_FIRST)
                {
                    self.error_and_bump_msg(DiagnosticKind::ExpectedName, "enum value");
                    continue;
                }
                self.start_node(SyntaxKind::EnumValueDefinition);
                self.parse_description();
                self.expect_name("enum value");
                self.parse_directives(true);
                self.finish_node();
            }
            self.close_delimiter(SyntaxKind::BraceClose);
        }

        self.finish_node();
    }

    fn parse_input_definition(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::InputObjectTypeDefinition);
        self.bump(); // 'input'
        self.expect_name("input name");
        self.parse_directives(true);

        if self.currently_is(SyntaxKind::BraceOpen) {
            self.start_node(SyntaxKind::FieldsDefinition);
            self.push_delimiter(SyntaxKind::BraceOpen);
            self.bump();
            while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
                if self.currently_is(SyntaxKind::Name)
                    || self.currently_is_one_of(DESCRIPTION_FIRST)
                {
                    self.parse_input_value_definition();
                } else {
                    self.error_and_bump_msg(DiagnosticKind::ExpectedName, "input field name");
                }
            }
            self.close_delimiter(SyntaxKind::BraceClose);
            self.finish_node();
        }

        self.finish_node();
    }

    /// `directive @name(args) repeatable on A | B`
    fn parse_directive_definition(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::DirectiveDefinition);
        self.bump(); // 'directive'
        self.expect(SyntaxKind::At, "`@` before directive name");
        self.expect_name("directive name");
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_arguments_definition();
        }
        if self.at_keyword("repeatable") {
            self.bump();
        }
        if self.at_keyword("on") {
            self.bump();
            self.eat_token(SyntaxKind::Pipe);
            self.expect_name("directive location");
            while self.eat_token(SyntaxKind::Pipe) {
                self.expect_name("directive location");
            }
        } else {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected `on` and locations");
        }
        self.finish_node();
    }
}
