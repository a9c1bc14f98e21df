use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use super::plan::{Condition, Field, InlineFragment, InputValue, Operation, Selection};
use crate::parser::ast::FragmentDefinition;
use crate::parser::parse;

fn build(source: &str) -> Option<Operation> {
    let (doc, diagnostics) = parse(source).unwrap();
    assert!(diagnostics.is_empty(), "{}", diagnostics.render(source));
    let fragments: IndexMap<String, FragmentDefinition> = doc
        .fragments()
        .map(|f| (f.name().unwrap().text().to_string(), f))
        .collect();
    let op = doc.operations().next().unwrap();
    Operation::build(&op, &fragments)
}

fn leaf(name: &str) -> Selection {
    Selection::Field(Field {
        alias: None,
        name: name.to_owned(),
        arguments: Vec::new(),
        conditions: Vec::new(),
        selections: Vec::new(),
    })
}

fn vars(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[test]
fn fields_keep_alias_and_arguments() {
    let op = build(r#"query Index($n: Int) { posts: allPost(limit: $n, filter: { tags: ["a", $n] }) { title } }"#)
        .unwrap();

    assert_eq!(op.name.as_deref(), Some("Index"));
    let Selection::Field(field) = &op.selections[0] else {
        panic!("expected a field");
    };
    assert_eq!(field.response_key(), "posts");
    assert_eq!(field.name, "allPost");
    assert_eq!(
        field.arguments,
        [
            ("limit".to_owned(), InputValue::Variable("n".into())),
            (
                "filter".to_owned(),
                InputValue::Object(vec![(
                    "tags".into(),
                    InputValue::List(vec![InputValue::Const(json!("a")), InputValue::Variable("n".into())]),
                )]),
            ),
        ]
    );
    assert_eq!(field.selections, [leaf("title")]);

    let filter = &field.arguments[1].1;
    assert_eq!(filter.resolve(&vars(json!({ "n": 3 }))), json!({ "tags": ["a", 3] }));
    assert_eq!(filter.resolve(&Map::new()), json!({ "tags": ["a", null] }));
}

#[test]
fn spreads_become_inline_fragments() {
    let op = build("query Index { allPost { ...Title } }\nfragment Title on Post { title }").unwrap();

    let Selection::Field(field) = &op.selections[0] else {
        panic!("expected a field");
    };
    assert_eq!(
        field.selections,
        [Selection::InlineFragment(InlineFragment {
            type_condition: Some("Post".into()),
            conditions: Vec::new(),
            selections: vec![leaf("title")],
        })]
    );
}

#[test]
fn cyclic_spreads_are_cut() {
    let op = build(
        "query Index { allPost { ...A } }\n\
         fragment A on Post { id ...B }\n\
         fragment B on Post { title ...A }",
    )
    .unwrap();

    let Selection::Field(field) = &op.selections[0] else {
        panic!("expected a field");
    };
    let Selection::InlineFragment(a) = &field.selections[0] else {
        panic!("expected fragment A");
    };
    assert_eq!(a.selections[0], leaf("id"));
    let Selection::InlineFragment(b) = &a.selections[1] else {
        panic!("expected fragment B");
    };
    assert_eq!(b.selections, [leaf("title")]);
}

#[test]
fn missing_fragment_fails_the_build() {
    assert!(build("query Index { allPost { ...Gone } }").is_none());
}

#[test]
fn defaults_fill_unprovided_variables() {
    let op = build("query Index($limit: Int = 10, $skip: Int) { allPost(limit: $limit, skip: $skip) { id } }")
        .unwrap();

    assert_eq!(op.variables.len(), 2);
    assert_eq!(op.coerce_variables(Map::new()), vars(json!({ "limit": 10 })));
    assert_eq!(
        op.coerce_variables(vars(json!({ "limit": 2, "skip": 1 }))),
        vars(json!({ "limit": 2, "skip": 1 }))
    );
}

#[test]
fn include_and_skip_conditions() {
    let op = build("query Index($on: Boolean) { a @include(if: $on) b @skip(if: true) c @include(if: false) }").unwrap();

    let conditions: Vec<_> = op
        .selections
        .iter()
        .map(|s| match s {
            Selection::Field(f) => f.conditions.clone(),
            Selection::InlineFragment(f) => f.conditions.clone(),
        })
        .collect();
    assert_eq!(conditions[0], [Condition::Include(InputValue::Variable("on".into()))]);

    let on = vars(json!({ "on": true }));
    assert!(conditions[0][0].passes(&on));
    assert!(!conditions[0][0].passes(&Map::new()));
    assert!(!conditions[1][0].passes(&on));
    assert!(!conditions[2][0].passes(&on));
}
