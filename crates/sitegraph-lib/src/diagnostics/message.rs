use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics overlap, the higher-priority one suppresses the
/// lower-priority one. Unclosed delimiters cascade the most, so they rank
/// first; schema validation assumes a well-formed document, so it ranks last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Cascade through the rest of the document
    UnclosedBrace,
    UnclosedParen,
    UnclosedBracket,
    UnterminatedString,

    // Something required is missing
    ExpectedName,
    ExpectedValue,
    ExpectedType,
    ExpectedSelectionSet,
    ExpectedDefinition,

    // Something present does not belong
    UnexpectedToken,
    VariableInConstant,

    // Document-level problems
    DuplicateDocument,
    MultipleRootQueries,

    // Valid syntax, invalid against the schema
    UnknownField,
    UnknownArgument,
    UnknownDirective,
    UnknownFragment,
    UnknownType,
    LeafSelection,
    MissingSelection,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::MultipleRootQueries => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Lower discriminant wins.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    pub fn is_structural_error(&self) -> bool {
        matches!(
            self,
            Self::UnclosedBrace | Self::UnclosedParen | Self::UnclosedBracket
        )
    }

    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedName
                | Self::ExpectedValue
                | Self::ExpectedType
                | Self::ExpectedSelectionSet
                | Self::ExpectedDefinition
        )
    }

    /// Default hint, included automatically when the diagnostic is rendered.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::ExpectedSelectionSet => Some("object fields need a selection, e.g. `{ id }`"),
            Self::LeafSelection => Some("remove the selection set"),
            Self::VariableInConstant => Some("default values and SDL arguments must be constants"),
            _ => None,
        }
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedBrace => "missing closing `}`",
            Self::UnclosedParen => "missing closing `)`",
            Self::UnclosedBracket => "missing closing `]`",
            Self::UnterminatedString => "unterminated string",

            Self::ExpectedName => "expected a name",
            Self::ExpectedValue => "expected a value",
            Self::ExpectedType => "expected a type",
            Self::ExpectedSelectionSet => "expected a selection set",
            Self::ExpectedDefinition => "expected a definition",

            Self::UnexpectedToken => "unexpected token",
            Self::VariableInConstant => "variables are not allowed here",

            Self::DuplicateDocument => "duplicate document",
            Self::MultipleRootQueries => "multiple root queries in one file",

            Self::UnknownField => "unknown field",
            Self::UnknownArgument => "unknown argument",
            Self::UnknownDirective => "unknown directive",
            Self::UnknownFragment => "unknown fragment",
            Self::UnknownType => "unknown type",
            Self::LeafSelection => "leaf field cannot have a selection",
            Self::MissingSelection => "field of object type needs a selection",
        }
    }

    /// The message text, with `detail` worked in when given.
    pub fn message(&self, detail: Option<&str>) -> String {
        let fallback = self.fallback_message();
        let Some(detail) = detail else {
            return fallback.to_owned();
        };
        match self {
            Self::UnknownField => format!("Unknown field {detail}."),
            Self::UnknownArgument => format!("Unknown argument {detail}."),
            Self::UnknownDirective => format!("Unknown directive {detail}."),
            Self::UnknownFragment => format!("Unknown fragment {detail}."),
            Self::UnknownType => format!("Unknown type {detail}."),
            Self::DuplicateDocument => format!("Duplicate document {detail}"),
            Self::UnclosedBrace | Self::UnclosedParen | Self::UnclosedBracket => {
                format!("{fallback}; {detail}")
            }
            Self::MultipleRootQueries | Self::LeafSelection | Self::MissingSelection => detail.to_owned(),
            _ => format!("{fallback}: {detail}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Underlined in output.
    pub(crate) range: TextRange,
    /// Errors inside another error's suppression range may be dropped.
    pub(crate) suppression_range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            suppression_range: range,
            message: message.into(),
            related: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
