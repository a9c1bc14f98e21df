use indoc::indoc;
use serde_json::json;

use super::sdl::parse_sdl;
use super::types::TypeDef;
use crate::Error;

#[test]
fn lowers_every_kind_of_type() {
    let doc = parse_sdl(indoc! {r#"
        "A blog post"
        type Post implements Node @dontInfer {
          title: String!
          "When it went live"
          date(formatString: String = "YYYY"): Date @dateformat(formatString: "DD.MM.YYYY")
          tags: [String!]
        }
        interface Named { name: String }
        union Content = Post | Page
        enum Status { DRAFT PUBLISHED }
        scalar Markdown
        input PostFilter { status: Status = DRAFT }
    "#})
    .unwrap();

    let kinds: Vec<_> = doc.types.iter().map(|t| (t.def.kind_name(), t.def.name())).collect();
    assert_eq!(
        kinds,
        [
            ("type", "Post"),
            ("interface", "Named"),
            ("union", "Content"),
            ("enum", "Status"),
            ("scalar", "Markdown"),
            ("input", "PostFilter"),
        ]
    );
    assert!(doc.types.iter().all(|t| !t.is_extension));
    assert_eq!(doc.query_root, None);

    let TypeDef::Object(post) = &doc.types[0].def else {
        panic!("expected an object");
    };
    assert_eq!(post.description.as_deref(), Some("A blog post"));
    assert!(post.dont_infer);
    assert_eq!(post.interfaces, ["Node"]);
    assert_eq!(post.fields["title"].ty.to_string(), "String!");
    assert_eq!(post.fields["tags"].ty.to_string(), "[String!]");

    let date = &post.fields["date"];
    assert_eq!(date.description.as_deref(), Some("When it went live"));
    assert_eq!(date.args["formatString"].default_value, Some(json!("YYYY")));
    assert_eq!(
        date.extensions["dateformat"],
        json!({ "formatString": "DD.MM.YYYY" }).as_object().cloned().unwrap()
    );

    let TypeDef::Union(content) = &doc.types[2].def else {
        panic!("expected a union");
    };
    assert_eq!(content.members, ["Post", "Page"]);

    let TypeDef::InputObject(filter) = &doc.types[5].def else {
        panic!("expected an input");
    };
    assert_eq!(filter.fields["status"].default_value, Some(json!("DRAFT")));
}

#[test]
fn extensions_and_schema_block() {
    let doc = parse_sdl(indoc! {"
        schema { query: Root }
        type Root { hello: String }
        extend type Post { subtitle: String }
        directive @upper on FIELD_DEFINITION
    "})
    .unwrap();

    assert_eq!(doc.query_root.as_deref(), Some("Root"));
    assert_eq!(doc.types.len(), 2);
    assert!(!doc.types[0].is_extension);
    assert!(doc.types[1].is_extension);
}

#[test]
fn syntax_errors_fail_the_document() {
    let result = parse_sdl("type Post { title: }");

    let Err(Error::SchemaParseError(diagnostics)) = result else {
        panic!("expected a parse error");
    };
    assert!(diagnostics.has_errors());
}

#[test]
fn executable_definitions_are_rejected() {
    let result = parse_sdl("type Post { id: ID }\nquery Q { allPost { id } }");

    assert!(matches!(result, Err(Error::InvalidSchema(_))));
}
