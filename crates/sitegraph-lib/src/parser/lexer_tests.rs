use super::cst::SyntaxKind::{self, *};
use super::lexer::{block_string_value, lex, token_text, unescape_string};

fn kinds(source: &str) -> Vec<SyntaxKind> {
    lex(source)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

#[test]
fn punctuators_and_names() {
    assert_eq!(
        kinds("query Q($id: ID!) { ...F }"),
        [
            Name, Name, ParenOpen, Dollar, Name, Colon, Name, Bang, ParenClose, BraceOpen, Spread,
            Name, BraceClose
        ]
    );
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("1 -2 3.5 1e3 0"),
        [IntNumber, IntNumber, FloatNumber, FloatNumber, IntNumber]
    );
}

#[test]
fn strings() {
    assert_eq!(
        kinds(r#""a\"b" """block""" "open"#),
        [StringText, BlockStringText, UnterminatedString]
    );
}

#[test]
fn commas_and_comments_are_trivia() {
    let tokens: Vec<SyntaxKind> = lex("a, # c\nb").into_iter().map(|t| t.kind).collect();
    assert_eq!(tokens, [Name, Comma, Whitespace, Comment, Newline, Name]);
}

#[test]
fn garbage_is_coalesced() {
    let source = "a %% b";
    let tokens = lex(source);
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[2].kind, Garbage);
    assert_eq!(token_text(source, &tokens[2]), "%%");
}

#[test]
fn unescape_handles_escapes() {
    assert_eq!(unescape_string(r#""a\nbA\"""#), "a\nbA\"");
}

#[test]
fn block_string_strips_indentation() {
    let raw = "\"\"\"\n    hello\n      world\n  \"\"\"";
    assert_eq!(block_string_value(raw), "hello\n  world");
}
