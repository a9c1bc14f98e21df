//! Syntax kinds for GraphQL documents.
//!
//! Token kinds come first and carry the logos patterns; node kinds follow.
//! GraphQL keywords are contextual, so they lex as `Name` and the parser
//! checks their text.

use logos::Logos;
use rowan::Language;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(":")]
    Colon,

    #[token("=")]
    Equals,

    #[token("!")]
    Bang,

    #[token("$")]
    Dollar,

    #[token("@")]
    At,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("...")]
    Spread,

    #[regex(r"[_A-Za-z][_0-9A-Za-z]*")]
    Name,

    #[regex(r"-?(?:0|[1-9][0-9]*)")]
    IntNumber,

    #[regex(r"-?(?:0|[1-9][0-9]*)(?:\.[0-9]+(?:[eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)")]
    FloatNumber,

    #[regex(r#""(?:[^"\\\n\r]|\\.)*""#)]
    StringText,

    #[regex(r#""""(?:[^"]|"[^"]|""[^"])*""""#)]
    BlockStringText,

    /// Opening quote with no closing quote on the same line.
    #[regex(r#""(?:[^"\\\n\r]|\\.)*"#, allow_greedy = true)]
    UnterminatedString,

    #[regex(r"[ \t\u{FEFF}]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    #[token("\r")]
    Newline,

    /// Commas are insignificant in GraphQL.
    #[token(",")]
    Comma,

    #[regex(r"#[^\n\r]*", allow_greedy = true)]
    Comment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Document,
    OperationDefinition,
    FragmentDefinition,
    VariableDefinitions,
    VariableDefinition,
    Variable,
    DefaultValue,
    SelectionSet,
    Field,
    Alias,
    Arguments,
    Argument,
    FragmentSpread,
    InlineFragment,
    TypeCondition,
    Directive,

    IntValue,
    FloatValue,
    StringValue,
    BooleanValue,
    NullValue,
    EnumValue,
    ListValue,
    ObjectValue,
    ObjectField,

    NamedType,
    ListType,
    NonNullType,

    Description,
    SchemaDefinition,
    RootOperationType,
    ObjectTypeDefinition,
    InterfaceTypeDefinition,
    UnionTypeDefinition,
    UnionMembers,
    EnumTypeDefinition,
    EnumValueDefinition,
    ScalarTypeDefinition,
    InputObjectTypeDefinition,
    ImplementsInterfaces,
    FieldsDefinition,
    FieldDefinition,
    ArgumentsDefinition,
    InputValueDefinition,
    DirectiveDefinition,

    // Bound for `kind_from_raw`; keep last.
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | Comma | Comment)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GraphQLLang {}

impl Language for GraphQLLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<GraphQLLang>;
pub type SyntaxToken = rowan::SyntaxToken<GraphQLLang>;
/// Set of token kinds, one bit per kind. Only token kinds fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            assert!((kinds[i] as u16) < 64, "node kinds cannot go in a TokenSet");
            bits |= 1 << kinds[i] as u16;
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        (kind as u16) < 64 && self.0 & (1 << kind as u16) != 0
    }
}

pub mod token_sets {
    use super::*;

    pub const DESCRIPTION_FIRST: TokenSet =
        TokenSet::new(&[StringText, BlockStringText, UnterminatedString]);

    /// Tokens a selection set can resynchronize on.
    pub const SELECTION_RECOVERY: TokenSet = TokenSet::new(&[BraceClose, Name, Spread]);

    pub const ARGUMENT_RECOVERY: TokenSet = TokenSet::new(&[ParenClose, Name, BraceClose]);

    /// A definition can start here even though it is not a keyword.
    pub const DEFINITION_RECOVERY: TokenSet =
        TokenSet::new(&[BraceOpen, StringText, BlockStringText]);
}
