//! Source locations and code frames for query error reports.

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use rowan::{TextRange, TextSize};

use super::printer::snippet_range;

/// Lines of context shown above and below a located error.
const CONTEXT_LINES: usize = 10;

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offset → line/column. Columns count characters, not bytes.
pub fn line_col(source: &str, offset: TextSize) -> Location {
    let offset = usize::from(offset).min(source.len());
    let before = &source[..floor_char_boundary(source, offset)];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    Location {
        line: line as u32,
        column: column as u32,
    }
}

/// Render `range` inside `source` with its surrounding lines.
///
/// The window covers up to ten lines on either side of the first line of
/// `range`; lines outside it are folded away.
pub fn code_frame(
    source: &str,
    title: &str,
    path: Option<&str>,
    range: TextRange,
    colored: bool,
) -> String {
    let starts = line_starts(source);
    let line_idx = line_col(source, range.start()).line as usize - 1;
    let first = line_idx.saturating_sub(CONTEXT_LINES);
    let last = (line_idx + CONTEXT_LINES).min(starts.len() - 1);
    let window_start = starts[first];
    let window_end = starts
        .get(last + 1)
        .map_or(source.len(), |next| next.saturating_sub(1));

    let mut snippet = Snippet::source(source)
        .line_start(1)
        .annotation(AnnotationKind::Visible.span(window_start..window_end))
        .annotation(AnnotationKind::Primary.span(snippet_range(range, source.len())));
    if let Some(p) = path {
        snippet = snippet.path(p);
    }

    let report = vec![Level::ERROR.primary_title(title).element(snippet)];
    let renderer = if colored {
        Renderer::styled()
    } else {
        Renderer::plain()
    };
    renderer.render(&report).to_string()
}

/// Every line of `source` behind a right-aligned line-number gutter.
///
/// Used when no position is known, so nothing is underlined.
pub fn numbered_listing(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let row = format!("  {:>width$} | {}", i + 1, line, width = width);
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

fn line_starts(source: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
