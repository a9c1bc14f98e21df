//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use super::lexer::{block_string_value, unescape_string};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Document, Document);
ast_node!(OperationDefinition, OperationDefinition);
ast_node!(FragmentDefinition, FragmentDefinition);
ast_node!(VariableDefinition, VariableDefinition);
ast_node!(Variable, Variable);
ast_node!(SelectionSet, SelectionSet);
ast_node!(Field, Field);
ast_node!(Argument, Argument);
ast_node!(FragmentSpread, FragmentSpread);
ast_node!(InlineFragment, InlineFragment);
ast_node!(TypeCondition, TypeCondition);
ast_node!(Directive, Directive);
ast_node!(IntValue, IntValue);
ast_node!(FloatValue, FloatValue);
ast_node!(StringValue, StringValue);
ast_node!(BooleanValue, BooleanValue);
ast_node!(NullValue, NullValue);
ast_node!(EnumValue, EnumValue);
ast_node!(ListValue, ListValue);
ast_node!(ObjectValue, ObjectValue);
ast_node!(ObjectField, ObjectField);
ast_node!(NamedType, NamedType);
ast_node!(ListType, ListType);
ast_node!(NonNullType, NonNullType);
ast_node!(Description, Description);
ast_node!(SchemaDefinition, SchemaDefinition);
ast_node!(RootOperationType, RootOperationType);
ast_node!(ObjectTypeDefinition, ObjectTypeDefinition);
ast_node!(InterfaceTypeDefinition, InterfaceTypeDefinition);
ast_node!(UnionTypeDefinition, UnionTypeDefinition);
ast_node!(EnumTypeDefinition, EnumTypeDefinition);
ast_node!(EnumValueDefinition, EnumValueDefinition);
ast_node!(ScalarTypeDefinition, ScalarTypeDefinition);
ast_node!(InputObjectTypeDefinition, InputObjectTypeDefinition);
ast_node!(FieldDefinition, FieldDefinition);
ast_node!(InputValueDefinition, InputValueDefinition);
ast_node!(DirectiveDefinition, DirectiveDefinition);

fn name_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| t.kind() == SyntaxKind::Name)
}

fn first_name(node: &SyntaxNode) -> Option<SyntaxToken> {
    name_tokens(node).next()
}

/// Name token of a keyword-led definition, skipping `extend` and the keyword.
fn definition_name(node: &SyntaxNode) -> Option<SyntaxToken> {
    let mut names = name_tokens(node);
    let first = names.next()?;
    if first.text() == "extend" {
        names.nth(1)
    } else {
        names.next()
    }
}

fn is_extension(node: &SyntaxNode) -> bool {
    first_name(node).is_some_and(|t| t.text() == "extend")
}

fn description(node: &SyntaxNode) -> Option<String> {
    node.children()
        .find_map(Description::cast)
        .map(|d| d.value())
}

fn directives(node: &SyntaxNode) -> impl Iterator<Item = Directive> {
    node.children().filter_map(Directive::cast)
}

/// Top-level definition in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
    Schema(SchemaDefinition),
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    Scalar(ScalarTypeDefinition),
    InputObject(InputObjectTypeDefinition),
    Directive(DirectiveDefinition),
}

impl Definition {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::OperationDefinition => {
                OperationDefinition::cast(node).map(Definition::Operation)
            }
            SyntaxKind::FragmentDefinition => FragmentDefinition::cast(node).map(Definition::Fragment),
            SyntaxKind::SchemaDefinition => SchemaDefinition::cast(node).map(Definition::Schema),
            SyntaxKind::ObjectTypeDefinition => ObjectTypeDefinition::cast(node).map(Definition::Object),
            SyntaxKind::InterfaceTypeDefinition => {
                InterfaceTypeDefinition::cast(node).map(Definition::Interface)
            }
            SyntaxKind::UnionTypeDefinition => UnionTypeDefinition::cast(node).map(Definition::Union),
            SyntaxKind::EnumTypeDefinition => EnumTypeDefinition::cast(node).map(Definition::Enum),
            SyntaxKind::ScalarTypeDefinition => ScalarTypeDefinition::cast(node).map(Definition::Scalar),
            SyntaxKind::InputObjectTypeDefinition => {
                InputObjectTypeDefinition::cast(node).map(Definition::InputObject)
            }
            SyntaxKind::DirectiveDefinition => {
                DirectiveDefinition::cast(node).map(Definition::Directive)
            }
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Definition::Operation(n) => n.as_cst(),
            Definition::Fragment(n) => n.as_cst(),
            Definition::Schema(n) => n.as_cst(),
            Definition::Object(n) => n.as_cst(),
            Definition::Interface(n) => n.as_cst(),
            Definition::Union(n) => n.as_cst(),
            Definition::Enum(n) => n.as_cst(),
            Definition::Scalar(n) => n.as_cst(),
            Definition::InputObject(n) => n.as_cst(),
            Definition::Directive(n) => n.as_cst(),
        }
    }

    /// Name of the defined thing; `None` for shorthand queries and `schema`.
    pub fn name(&self) -> Option<SyntaxToken> {
        match self {
            Definition::Operation(n) => n.name(),
            Definition::Fragment(n) => n.name(),
            Definition::Schema(_) => None,
            Definition::Directive(n) => n.name(),
            other => definition_name(other.as_cst()),
        }
    }

    pub fn is_executable(&self) -> bool {
        matches!(self, Definition::Operation(_) | Definition::Fragment(_))
    }
}

impl Document {
    pub fn definitions(&self) -> impl Iterator<Item = Definition> + '_ {
        self.0.children().filter_map(Definition::cast)
    }

    pub fn operations(&self) -> impl Iterator<Item = OperationDefinition> + '_ {
        self.0.children().filter_map(OperationDefinition::cast)
    }

    pub fn fragments(&self) -> impl Iterator<Item = FragmentDefinition> + '_ {
        self.0.children().filter_map(FragmentDefinition::cast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }
}

impl OperationDefinition {
    /// `query` for the `{ ... }` shorthand.
    pub fn operation_type(&self) -> OperationType {
        match first_name(&self.0).as_ref().map(|t| t.text()) {
            Some("mutation") => OperationType::Mutation,
            Some("subscription") => OperationType::Subscription,
            _ => OperationType::Query,
        }
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        name_tokens(&self.0).nth(1)
    }

    pub fn variable_definitions(&self) -> impl Iterator<Item = VariableDefinition> + '_ {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::VariableDefinitions)
            .flat_map(|n| n.children().filter_map(VariableDefinition::cast))
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        directives(&self.0)
    }

    pub fn selection_set(&self) -> Option<SelectionSet> {
        self.0.children().find_map(SelectionSet::cast)
    }
}

impl FragmentDefinition {
    pub fn name(&self) -> Option<SyntaxToken> {
        name_tokens(&self.0).nth(1)
    }

    pub fn type_condition(&self) -> Option<NamedType> {
        self.0
            .children()
            .find_map(TypeCondition::cast)
            .and_then(|c| c.named_type())
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        directives(&self.0)
    }

    pub fn selection_set(&self) -> Option<SelectionSet> {
        self.0.children().find_map(SelectionSet::cast)
    }
}

impl VariableDefinition {
    pub fn variable(&self) -> Option<Variable> {
        self.0.children().find_map(Variable::cast)
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }

    pub fn default_value(&self) -> Option<Value> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::DefaultValue)
            .and_then(|n| n.children().find_map(Value::cast))
    }
}

impl Variable {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }
}

/// One entry of a selection set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl Selection {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Field => Field::cast(node).map(Selection::Field),
            SyntaxKind::FragmentSpread => FragmentSpread::cast(node).map(Selection::FragmentSpread),
            SyntaxKind::InlineFragment => InlineFragment::cast(node).map(Selection::InlineFragment),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Selection::Field(n) => n.as_cst(),
            Selection::FragmentSpread(n) => n.as_cst(),
            Selection::InlineFragment(n) => n.as_cst(),
        }
    }
}

impl SelectionSet {
    pub fn selections(&self) -> impl Iterator<Item = Selection> + '_ {
        self.0.children().filter_map(Selection::cast)
    }
}

impl Field {
    pub fn alias(&self) -> Option<SyntaxToken> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::Alias)
            .and_then(|n| first_name(&n))
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    /// Key the field's value is returned under: alias if present, else name.
    pub fn response_key(&self) -> Option<String> {
        self.alias()
            .or_else(|| self.name())
            .map(|t| t.text().to_string())
    }

    pub fn arguments(&self) -> impl Iterator<Item = Argument> + '_ {
        arguments(&self.0)
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        directives(&self.0)
    }

    pub fn selection_set(&self) -> Option<SelectionSet> {
        self.0.children().find_map(SelectionSet::cast)
    }
}

fn arguments(node: &SyntaxNode) -> impl Iterator<Item = Argument> + '_ {
    node.children()
        .filter(|n| n.kind() == SyntaxKind::Arguments)
        .flat_map(|n| n.children().filter_map(Argument::cast))
}

impl Argument {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    pub fn value(&self) -> Option<Value> {
        self.0.children().find_map(Value::cast)
    }
}

impl FragmentSpread {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        directives(&self.0)
    }
}

impl InlineFragment {
    pub fn type_condition(&self) -> Option<NamedType> {
        self.0
            .children()
            .find_map(TypeCondition::cast)
            .and_then(|c| c.named_type())
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        directives(&self.0)
    }

    pub fn selection_set(&self) -> Option<SelectionSet> {
        self.0.children().find_map(SelectionSet::cast)
    }
}

impl TypeCondition {
    pub fn named_type(&self) -> Option<NamedType> {
        self.0.children().find_map(NamedType::cast)
    }
}

impl Directive {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    pub fn arguments(&self) -> impl Iterator<Item = Argument> + '_ {
        arguments(&self.0)
    }

    pub fn argument(&self, name: &str) -> Option<Value> {
        self.arguments()
            .find(|a| a.name().is_some_and(|t| t.text() == name))
            .and_then(|a| a.value())
    }
}

/// Input value literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Variable(Variable),
    Int(IntValue),
    Float(FloatValue),
    String(StringValue),
    Boolean(BooleanValue),
    Null(NullValue),
    Enum(EnumValue),
    List(ListValue),
    Object(ObjectValue),
}

impl Value {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Variable => Variable::cast(node).map(Value::Variable),
            SyntaxKind::IntValue => IntValue::cast(node).map(Value::Int),
            SyntaxKind::FloatValue => FloatValue::cast(node).map(Value::Float),
            SyntaxKind::StringValue => StringValue::cast(node).map(Value::String),
            SyntaxKind::BooleanValue => BooleanValue::cast(node).map(Value::Boolean),
            SyntaxKind::NullValue => NullValue::cast(node).map(Value::Null),
            SyntaxKind::EnumValue => EnumValue::cast(node).map(Value::Enum),
            SyntaxKind::ListValue => ListValue::cast(node).map(Value::List),
            SyntaxKind::ObjectValue => ObjectValue::cast(node).map(Value::Object),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Value::Variable(n) => n.as_cst(),
            Value::Int(n) => n.as_cst(),
            Value::Float(n) => n.as_cst(),
            Value::String(n) => n.as_cst(),
            Value::Boolean(n) => n.as_cst(),
            Value::Null(n) => n.as_cst(),
            Value::Enum(n) => n.as_cst(),
            Value::List(n) => n.as_cst(),
            Value::Object(n) => n.as_cst(),
        }
    }

    /// Literal as JSON. Variables are looked up in `variables`; missing ones
    /// become `null`.
    pub fn to_json(
        &self,
        variables: &serde_json::Map<String, serde_json::Value>,
    ) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Variable(v) => v
                .name()
                .and_then(|n| variables.get(n.text()).cloned())
                .unwrap_or(Json::Null),
            Value::Int(v) => v.value().map_or(Json::Null, Json::from),
            Value::Float(v) => v
                .value()
                .and_then(serde_json::Number::from_f64)
                .map_or(Json::Null, Json::Number),
            Value::String(v) => Json::String(v.value()),
            Value::Boolean(v) => Json::Bool(v.value()),
            Value::Null(_) => Json::Null,
            Value::Enum(v) => v
                .name()
                .map_or(Json::Null, |t| Json::String(t.text().to_string())),
            Value::List(v) => Json::Array(v.values().map(|i| i.to_json(variables)).collect()),
            Value::Object(v) => Json::Object(
                v.fields()
                    .filter_map(|f| {
                        let name = f.name()?.text().to_string();
                        let value = f.value()?.to_json(variables);
                        Some((name, value))
                    })
                    .collect(),
            ),
        }
    }
}

fn single_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| !t.kind().is_trivia())
}

impl IntValue {
    pub fn value(&self) -> Option<i64> {
        single_token(&self.0)?.text().parse().ok()
    }
}

impl FloatValue {
    pub fn value(&self) -> Option<f64> {
        single_token(&self.0)?.text().parse().ok()
    }
}

impl StringValue {
    pub fn value(&self) -> String {
        let Some(token) = single_token(&self.0) else {
            return String::new();
        };
        match token.kind() {
            SyntaxKind::BlockStringText => block_string_value(token.text()),
            _ => unescape_string(token.text()),
        }
    }
}

impl BooleanValue {
    pub fn value(&self) -> bool {
        single_token(&self.0).is_some_and(|t| t.text() == "true")
    }
}

impl EnumValue {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }
}

impl ListValue {
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.0.children().filter_map(Value::cast)
    }
}

impl ObjectValue {
    pub fn fields(&self) -> impl Iterator<Item = ObjectField> + '_ {
        self.0.children().filter_map(ObjectField::cast)
    }
}

impl ObjectField {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    pub fn value(&self) -> Option<Value> {
        self.0.children().find_map(Value::cast)
    }
}

/// Type reference: `Name`, `[Type]`, `Type!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Named(NamedType),
    List(ListType),
    NonNull(NonNullType),
}

impl Type {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::NamedType => NamedType::cast(node).map(Type::Named),
            SyntaxKind::ListType => ListType::cast(node).map(Type::List),
            SyntaxKind::NonNullType => NonNullType::cast(node).map(Type::NonNull),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Type::Named(n) => n.as_cst(),
            Type::List(n) => n.as_cst(),
            Type::NonNull(n) => n.as_cst(),
        }
    }
}

impl NamedType {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }
}

impl ListType {
    pub fn inner(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

impl NonNullType {
    pub fn inner(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }
}

impl Description {
    pub fn value(&self) -> String {
        match single_token(&self.0) {
            Some(t) if t.kind() == SyntaxKind::BlockStringText => block_string_value(t.text()),
            Some(t) => unescape_string(t.text()),
            None => String::new(),
        }
    }
}

impl SchemaDefinition {
    pub fn is_extension(&self) -> bool {
        is_extension(&self.0)
    }

    pub fn root_operations(&self) -> impl Iterator<Item = RootOperationType> + '_ {
        self.0.children().filter_map(RootOperationType::cast)
    }
}

impl RootOperationType {
    pub fn operation(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    pub fn named_type(&self) -> Option<NamedType> {
        self.0.children().find_map(NamedType::cast)
    }
}

macro_rules! type_definition_common {
    ($($name:ident),*) => {
        $(
            impl $name {
                pub fn name(&self) -> Option<SyntaxToken> {
                    definition_name(&self.0)
                }

                pub fn description(&self) -> Option<String> {
                    description(&self.0)
                }

                pub fn is_extension(&self) -> bool {
                    is_extension(&self.0)
                }

                pub fn directives(&self) -> impl Iterator<Item = Directive> {
                    directives(&self.0)
                }
            }
        )*
    };
}

type_definition_common!(
    ObjectTypeDefinition,
    InterfaceTypeDefinition,
    UnionTypeDefinition,
    EnumTypeDefinition,
    ScalarTypeDefinition,
    InputObjectTypeDefinition
);

fn interfaces(node: &SyntaxNode) -> Vec<NamedType> {
    node.children()
        .filter(|n| n.kind() == SyntaxKind::ImplementsInterfaces)
        .flat_map(|n| n.children().filter_map(NamedType::cast))
        .collect()
}

fn field_definitions(node: &SyntaxNode) -> impl Iterator<Item = FieldDefinition> + '_ {
    node.children()
        .filter(|n| n.kind() == SyntaxKind::FieldsDefinition)
        .flat_map(|n| n.children().filter_map(FieldDefinition::cast))
}

impl ObjectTypeDefinition {
    pub fn interfaces(&self) -> Vec<NamedType> {
        interfaces(&self.0)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDefinition> + '_ {
        field_definitions(&self.0)
    }
}

impl InterfaceTypeDefinition {
    pub fn interfaces(&self) -> Vec<NamedType> {
        interfaces(&self.0)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDefinition> + '_ {
        field_definitions(&self.0)
    }
}

impl UnionTypeDefinition {
    pub fn members(&self) -> Vec<NamedType> {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::UnionMembers)
            .flat_map(|n| n.children().filter_map(NamedType::cast))
            .collect()
    }
}

impl EnumTypeDefinition {
    pub fn values(&self) -> impl Iterator<Item = EnumValueDefinition> + '_ {
        self.0.children().filter_map(EnumValueDefinition::cast)
    }
}

impl EnumValueDefinition {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    pub fn description(&self) -> Option<String> {
        description(&self.0)
    }
}

impl InputObjectTypeDefinition {
    pub fn fields(&self) -> impl Iterator<Item = InputValueDefinition> + '_ {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::FieldsDefinition)
            .flat_map(|n| n.children().filter_map(InputValueDefinition::cast))
    }
}

impl FieldDefinition {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    pub fn description(&self) -> Option<String> {
        description(&self.0)
    }

    pub fn arguments(&self) -> impl Iterator<Item = InputValueDefinition> + '_ {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::ArgumentsDefinition)
            .flat_map(|n| n.children().filter_map(InputValueDefinition::cast))
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        directives(&self.0)
    }
}

impl InputValueDefinition {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_name(&self.0)
    }

    pub fn description(&self) -> Option<String> {
        description(&self.0)
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.children().find_map(Type::cast)
    }

    pub fn default_value(&self) -> Option<Value> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::DefaultValue)
            .and_then(|n| n.children().find_map(Value::cast))
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        directives(&self.0)
    }
}

impl DirectiveDefinition {
    pub fn name(&self) -> Option<SyntaxToken> {
        name_tokens(&self.0).nth(1)
    }
}
