//! Parser state and the token-level operations grammar rules are built from.
//!
//! Trivia never reaches the grammar: the parser walks an index of the
//! significant tokens and writes the skipped trivia into the tree lazily,
//! just before the next node or token is emitted.

use std::cell::Cell;

use rowan::{Checkpoint, GreenNodeBuilder, TextRange, TextSize};

use super::ast::Document;
use super::cst::{SyntaxKind, SyntaxNode, TokenSet};
use super::lexer::{Token, token_text};
use crate::Error;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Lookaheads allowed without consuming a token before the parser is
/// considered stuck.
const LOOKAHEAD_LIMIT: u16 = 256;

#[derive(Debug)]
pub struct ParseResult {
    pub document: Document,
    pub diagnostics: Diagnostics,
    pub exec_fuel_consumed: u32,
}

/// Step and depth limits for a single parse.
#[derive(Debug, Default)]
struct Budget {
    steps: Option<u32>,
    steps_left: Option<u32>,
    max_depth: Option<u32>,
    depth: u32,
}

impl Budget {
    fn step(&mut self) -> Result<(), Error> {
        match &mut self.steps_left {
            Some(0) => Err(Error::ExecFuelExhausted),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn descend(&mut self) -> Result<(), Error> {
        if self.max_depth.is_some_and(|max| self.depth >= max) {
            return Err(Error::RecursionLimitExceeded);
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn consumed(&self) -> u32 {
        match (self.steps, self.steps_left) {
            (Some(total), Some(left)) => total - left,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenDelimiter {
    kind: SyntaxKind,
    span: TextRange,
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    /// Indices into `tokens` of everything that is not trivia.
    significant: Vec<usize>,
    /// Position in `significant`.
    cursor: usize,
    /// Index into `tokens` of the first token not yet in the tree.
    written: usize,
    builder: GreenNodeBuilder<'static>,
    pub(super) diagnostics: Diagnostics,
    open: Vec<OpenDelimiter>,
    last_report: Option<TextSize>,
    budget: Budget,
    fatal: Option<Error>,
    lookaheads: Cell<u16>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();
        Self {
            source,
            tokens,
            significant,
            cursor: 0,
            written: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            open: Vec::new(),
            last_report: None,
            budget: Budget::default(),
            fatal: None,
            lookaheads: Cell::new(LOOKAHEAD_LIMIT),
        }
    }

    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.budget.steps = limit;
        self.budget.steps_left = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.budget.max_depth = limit;
        self
    }

    pub fn parse(mut self) -> Result<ParseResult, Error> {
        self.parse_document();
        self.eat_trivia();
        if let Some(err) = self.fatal {
            return Err(err);
        }
        let exec_fuel_consumed = self.budget.consumed();
        let root = SyntaxNode::new_root(self.builder.finish());
        let document = Document::cast(root).ok_or(Error::MalformedTree)?;
        Ok(ParseResult {
            document,
            diagnostics: self.diagnostics,
            exec_fuel_consumed,
        })
    }

    fn fail(&mut self, err: Error) {
        self.fatal.get_or_insert(err);
    }

    /// Number of significant tokens consumed so far.
    pub(super) fn position(&self) -> usize {
        self.cursor
    }

    fn token(&self, n: usize) -> Option<&Token> {
        self.significant
            .get(self.cursor + n)
            .map(|&index| &self.tokens[index])
    }

    /// Kind of the `n`th token ahead, counted against the lookahead limit.
    fn peek(&self, n: usize) -> SyntaxKind {
        let left = self.lookaheads.get();
        assert!(left != 0, "parser is stuck: too many lookaheads");
        self.lookaheads.set(left - 1);
        self.token(n).map_or(SyntaxKind::Error, |t| t.kind)
    }

    fn made_progress(&self) {
        self.lookaheads.set(LOOKAHEAD_LIMIT);
    }

    pub(super) fn current(&self) -> SyntaxKind {
        self.peek(0)
    }

    /// Text of the current token, empty at EOF.
    pub(super) fn current_text(&self) -> &'src str {
        let source = self.source;
        self.token(0).map_or("", |t| token_text(source, t))
    }

    pub(super) fn current_span(&self) -> TextRange {
        self.token(0)
            .map_or_else(|| TextRange::empty(self.end_offset()), |t| t.span)
    }

    fn end_offset(&self) -> TextSize {
        TextSize::of(self.source)
    }

    pub(super) fn currently_is(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    pub(super) fn next_is(&self, kind: SyntaxKind) -> bool {
        self.peek(1) == kind
    }

    /// Current token is the `Name` spelled `keyword`.
    pub(super) fn at_keyword(&self, keyword: &str) -> bool {
        self.currently_is(SyntaxKind::Name) && self.current_text() == keyword
    }

    pub(super) fn should_stop(&self) -> bool {
        self.cursor >= self.significant.len() || self.fatal.is_some()
    }

    #[track_caller]
    pub(super) fn assert_current(&self, expected: SyntaxKind) {
        let found = self.current();
        assert_eq!(found, expected, "grammar rule entered at {found:?}, expected {expected:?}");
    }

    /// Write pending trivia, up to the current token, into the tree.
    pub(super) fn eat_trivia(&mut self) {
        let upto = self
            .significant
            .get(self.cursor)
            .copied()
            .unwrap_or(self.tokens.len());
        while self.written < upto {
            self.write_token(self.written);
        }
    }

    fn write_token(&mut self, index: usize) {
        let token = self.tokens[index];
        self.builder.token(token.kind.into(), token_text(self.source, &token));
        self.written = index + 1;
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    /// Move the current token into the tree. No-op at EOF.
    pub(super) fn bump(&mut self) {
        let Some(&index) = self.significant.get(self.cursor) else {
            return;
        };
        if let Err(err) = self.budget.step() {
            self.fail(err);
        }
        self.eat_trivia();
        self.write_token(index);
        self.cursor += 1;
        self.made_progress();
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        let matched = self.currently_is(kind);
        if matched {
            self.bump();
        }
        matched
    }

    /// Consume `kind` or report what was expected, leaving the token in place.
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        self.eat_token(kind) || {
            self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {what}"));
            false
        }
    }

    pub(super) fn expect_name(&mut self, what: &str) -> bool {
        self.eat_token(SyntaxKind::Name) || {
            self.error_msg(DiagnosticKind::ExpectedName, what);
            false
        }
    }

    /// Where a diagnostic at the current token goes, and what it suppresses.
    /// `None` when something was already reported at this offset.
    fn claim_report(&mut self) -> Option<(TextRange, TextRange)> {
        let range = self.current_span();
        if self.last_report.replace(range.start()) == Some(range.start()) {
            return None;
        }
        let suppression = match self.open.last() {
            Some(open) => TextRange::new(open.span.start(), self.end_offset()),
            None => range,
        };
        Some((range, suppression))
    }

    fn report_here(&mut self, kind: DiagnosticKind, message: Option<String>) {
        let Some((range, suppression)) = self.claim_report() else {
            return;
        };
        let builder = self.diagnostics.report(kind, range);
        let builder = match message {
            Some(message) => builder.message(message),
            None => builder,
        };
        builder.suppression_range(suppression).emit();
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        self.report_here(kind, None);
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.report_here(kind, Some(message.into()));
    }

    fn bump_into_error(&mut self) {
        if self.should_stop() {
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.finish_node();
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        self.bump_into_error();
    }

    pub(super) fn error_and_bump_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        self.bump_into_error();
    }

    /// Report, then wrap everything up to a token in `recovery` in an error node.
    pub(super) fn error_recover(&mut self, kind: DiagnosticKind, message: &str, recovery: TokenSet) {
        let skipping = !self.currently_is_one_of(recovery) && !self.should_stop();
        if skipping {
            self.start_node(SyntaxKind::Error);
        }
        self.error_msg(kind, message);
        if skipping {
            while !self.currently_is_one_of(recovery) && !self.should_stop() {
                self.bump();
            }
            self.finish_node();
        }
    }

    /// Returns false once the depth limit is hit; the caller must then
    /// return without calling [`exit_recursion`](Self::exit_recursion).
    pub(super) fn enter_recursion(&mut self) -> bool {
        self.made_progress();
        match self.budget.descend() {
            Ok(()) => true,
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    pub(super) fn exit_recursion(&mut self) {
        self.made_progress();
        self.budget.ascend();
    }

    /// Remember the current token as an opening delimiter.
    pub(super) fn push_delimiter(&mut self, kind: SyntaxKind) {
        let span = self.current_span();
        self.open.push(OpenDelimiter { kind, span });
    }

    /// Consume `close`, or report the innermost opener as unclosed.
    pub(super) fn close_delimiter(&mut self, close: SyntaxKind) {
        let opener = self.open.pop();
        if self.eat_token(close) {
            return;
        }
        let Some(opener) = opener else {
            return;
        };
        let (kind, shown) = match opener.kind {
            SyntaxKind::ParenOpen => (DiagnosticKind::UnclosedParen, "`(`"),
            SyntaxKind::BracketOpen => (DiagnosticKind::UnclosedBracket, "`[`"),
            _ => (DiagnosticKind::UnclosedBrace, "`{`"),
        };
        let here = self.current_span();
        if self.last_report.replace(here.start()) == Some(here.start()) {
            return;
        }
        self.diagnostics
            .report(kind, TextRange::new(opener.span.start(), here.end()))
            .related_to(format!("{shown} opened here"), opener.span)
            .emit();
    }
}
