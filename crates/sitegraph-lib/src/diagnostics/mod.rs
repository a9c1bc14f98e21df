mod code_frame;
mod message;
mod printer;

#[cfg(test)]
mod tests;

use rowan::TextRange;

pub use code_frame::{Location, code_frame, line_col, numbered_listing};
pub use message::{DiagnosticKind, DiagnosticMessage, Severity};
pub use printer::DiagnosticsPrinter;

use message::RelatedInfo;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Start a diagnostic at `range` with the kind's fallback message.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::with_default_message(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    /// Diagnostics with cascading errors suppressed.
    ///
    /// A diagnostic is dropped when a surviving one hides it: either its
    /// suppression range strictly contains the other's range, or both start
    /// at the same offset and the hiding one is the root cause.
    pub fn filtered(&self) -> Diagnostics {
        let mut kept = vec![true; self.messages.len()];
        for (i, a) in self.messages.iter().enumerate() {
            for (j, b) in self.messages.iter().enumerate() {
                if i != j && kept[i] && kept[j] && hides(a, b) {
                    kept[j] = false;
                }
            }
        }
        let messages = self
            .messages
            .iter()
            .zip(kept)
            .filter_map(|(m, keep)| keep.then(|| m.clone()))
            .collect();
        Diagnostics { messages }
    }

    /// Append every diagnostic from `other`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer<'s>(&self) -> DiagnosticsPrinter<'_, 's> {
        DiagnosticsPrinter::new(self)
    }

    /// Plain rendering against the source the ranges point into.
    pub fn render(&self, source: &str) -> String {
        self.printer().source(source).render()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticMessage;
    type IntoIter = std::slice::Iter<'a, DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl DiagnosticBuilder<'_> {
    /// Fill the kind's message with `msg`.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        let detail = msg.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    /// Replace the whole message, bypassing the kind's template.
    pub fn raw_message(mut self, msg: impl Into<String>) -> Self {
        self.message.message = msg.into();
        self
    }

    pub fn related_to(mut self, msg: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo::new(range, msg));
        self
    }

    pub fn suppression_range(mut self, range: TextRange) -> Self {
        self.message.suppression_range = range;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn emit(mut self) {
        if let Some(hint) = self.message.kind.default_hint() {
            self.message.hints.insert(0, hint.to_string());
        }
        self.diagnostics.messages.push(self.message);
    }
}

/// Whether `a` makes `b` redundant.
fn hides(a: &DiagnosticMessage, b: &DiagnosticMessage) -> bool {
    let within = a.suppression_range.start() < b.range.start() && b.range.end() <= a.suppression_range.end();
    if within && a.kind.suppresses(&b.kind) {
        return true;
    }
    if a.range.start() != b.range.start() {
        return false;
    }
    // At the same offset the missing token explains the unclosed delimiter.
    if a.kind.is_structural_error() && b.kind.is_root_cause_error() {
        return false;
    }
    (a.kind.is_root_cause_error() && b.kind.is_structural_error()) || a.kind.suppresses(&b.kind)
}
