//! Renders diagnostics as annotated source snippets.

use std::fmt::{self, Write};
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Configures how a [`Diagnostics`] set is printed.
///
/// Without a source the diagnostics print one per line as `severity at
/// start..end: message`.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(self, source: &'s str) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    /// File name shown in the snippet header.
    pub fn path(self, path: &'s str) -> Self {
        Self {
            path: Some(path),
            ..self
        }
    }

    pub fn colored(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        match self.format(&mut out) {
            Ok(()) => out,
            Err(fmt::Error) => String::new(),
        }
    }

    pub fn format(&self, w: &mut impl Write) -> fmt::Result {
        let renderer = match self.colored {
            true => Renderer::styled(),
            false => Renderer::plain(),
        };
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.source {
                Some(source) => write!(w, "{}", renderer.render(&self.report(diag, source)))?,
                None => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }

    fn report<'a>(&'a self, diag: &'a DiagnosticMessage, source: &'a str) -> Vec<Group<'a>> {
        let primary = snippet_range(diag.range, source.len());

        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(primary).label(&diag.message));
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            let span = snippet_range(related.range, source.len());
            snippet = snippet.annotation(AnnotationKind::Context.span(span).label(&related.message));
        }

        let mut title = level(diag.severity())
            .primary_title(&diag.message)
            .element(snippet);
        for hint in &diag.hints {
            title = title.element(Level::HELP.message(hint));
        }

        vec![title]
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Byte range for a snippet annotation. Empty ranges widen to one
/// character so the caret stays visible.
pub(crate) fn snippet_range(range: TextRange, len: usize) -> Range<usize> {
    let Range { start, end } = Range::<usize>::from(range);
    match start == end {
        true => start..(start + 1).min(len),
        false => start..end,
    }
}
