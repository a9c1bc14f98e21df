use indoc::indoc;
use rowan::{TextRange, TextSize};

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedName, range(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    insta::assert_snapshot!(diagnostics.printer().render(), @"error at 0..5: expected a name");
}

#[test]
fn report_with_template_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnknownField, range(8, 11))
        .message("`foo` on type `Query`")
        .emit();

    let first = diagnostics.iter().next().unwrap();
    assert_eq!(first.message(), "Unknown field `foo` on type `Query`.");
}

#[test]
fn warnings_are_counted_apart() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::MultipleRootQueries, range(0, 1))
        .message("two queries")
        .emit();
    diagnostics
        .report(DiagnosticKind::UnknownType, range(2, 3))
        .message("`Foo`")
        .emit();

    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 1);
}

#[test]
fn extend_appends_after_existing() {
    let mut first = Diagnostics::new();
    first.report(DiagnosticKind::ExpectedName, range(0, 1)).emit();
    let mut second = Diagnostics::new();
    second.report(DiagnosticKind::UnclosedBrace, range(4, 9)).emit();

    first.extend(second);

    let kinds: Vec<_> = first.iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, [DiagnosticKind::ExpectedName, DiagnosticKind::UnclosedBrace]);
}

#[test]
fn default_hint_is_attached() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::LeafSelection, range(0, 4))
        .message("`id` is a leaf")
        .emit();

    let first = diagnostics.iter().next().unwrap();
    assert_eq!(first.hints(), ["remove the selection set"]);
}

#[test]
fn plain_render_includes_related_and_hints() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBrace, range(0, 10))
        .message("selection set started here")
        .related_to("opened", range(0, 1))
        .hint("add `}` at the end")
        .emit();

    insta::assert_snapshot!(diagnostics.printer().render(), @"error at 0..10: missing closing `}`; selection set started here (related: opened at 0..1) (hint: add `}` at the end)");
}

#[test]
fn filtered_drops_contained_lower_priority() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBrace, range(0, 20))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(5, 6))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered.iter().next().unwrap().kind(),
        DiagnosticKind::UnclosedBrace
    );
}

#[test]
fn filtered_root_cause_beats_structural_at_same_start() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedParen, range(4, 9))
        .emit();
    diagnostics
        .report(DiagnosticKind::ExpectedName, range(4, 5))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered.iter().next().unwrap().kind(),
        DiagnosticKind::ExpectedName
    );
}

#[test]
fn render_with_source_mentions_path() {
    let source = "query { foo }";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnknownField, range(8, 11))
        .message("`foo` on type `Query`")
        .emit();

    let rendered = diagnostics
        .printer()
        .source(source)
        .path("src/pages/index.graphql")
        .render();
    assert!(rendered.contains("Unknown field `foo` on type `Query`."));
    assert!(rendered.contains("src/pages/index.graphql"));
}

#[test]
fn line_col_counts_from_one() {
    let source = "query {\n  foo\n}";
    assert_eq!(
        line_col(source, TextSize::from(0)),
        Location { line: 1, column: 1 }
    );
    assert_eq!(
        line_col(source, TextSize::from(10)),
        Location { line: 2, column: 3 }
    );
    assert_eq!(line_col(source, TextSize::from(10)).to_string(), "2:3");
}

#[test]
fn numbered_listing_pads_gutter() {
    let source = indoc! {"
        query {
          allPost {
            id
          }
        }
    "};

    insta::assert_snapshot!(numbered_listing(source), @r"
      1 | query {
      2 |   allPost {
      3 |     id
      4 |   }
      5 | }
    ");
}

#[test]
fn code_frame_points_into_window() {
    let mut source = String::new();
    for i in 0..30 {
        source.push_str(&format!("line{i}\n"));
    }
    let start = source.find("line15").unwrap() as u32;

    let frame = code_frame(&source, "boom", Some("q.graphql"), range(start, start + 6), false);
    assert!(frame.contains("boom"));
    assert!(frame.contains("line15"));
    assert!(!frame.contains("line29"));
}
