use indoc::indoc;

use super::composer::{NodesByType, TypeDefs};
use super::{Schema, SchemaComposer};
use crate::infer::TypeConflictReporter;

fn schema(sdl: &str) -> Schema {
    let mut composer = SchemaComposer::new();
    composer
        .add_type_defs("site-plugin", TypeDefs::Sdl(sdl.to_owned()))
        .unwrap();
    composer
        .compose(&NodesByType::new(), &mut TypeConflictReporter::new())
        .unwrap()
}

#[test]
fn node_type_with_extensions() {
    let schema = schema(indoc! {r#"
        "A blog post"
        type Post implements Node @dontInfer {
          title: String!
          date: Date @dateformat(formatString: "YYYY")
        }
    "#});

    insta::assert_snapshot!(schema.type_to_sdl("Post").unwrap(), @r#"
    "A blog post"
    type Post implements Node @dontInfer {
      id: ID!
      parent: Node @link
      children: [Node!]! @link
      internal: Internal!
      title: String!
      date(formatString: String = "YYYY", locale: String): Date @dateformat(formatString: "YYYY")
    }
    "#);
    insta::assert_snapshot!(schema.type_to_sdl("Query").unwrap(), @r"
    type Query {
      allPost(limit: Int, skip: Int): [Post!]!
      post(id: String): Post
    }
    ");
}

#[test]
fn enums_unions_and_inputs() {
    let schema = schema(indoc! {r#"
        type Post implements Node { title: String }
        type Page implements Node { path: String }
        union Content = Post | Page
        enum Status { DRAFT PUBLISHED }
        input PostFilter {
          "Maximum number of results"
          limit: Int = 10
          tags: [String!]
        }
    "#});

    assert_eq!(schema.type_to_sdl("Content").unwrap(), "union Content = Post | Page");
    insta::assert_snapshot!(schema.type_to_sdl("Status").unwrap(), @r"
    enum Status {
      DRAFT
      PUBLISHED
    }
    ");
    insta::assert_snapshot!(schema.type_to_sdl("PostFilter").unwrap(), @r#"
    input PostFilter {
      "Maximum number of results"
      limit: Int = 10
      tags: [String!]
    }
    "#);
}

#[test]
fn multi_line_descriptions_use_block_strings() {
    let schema = schema(indoc! {r#"
        """
        Rendered markdown.
        Safe to inject.
        """
        scalar Html
    "#});

    insta::assert_snapshot!(schema.type_to_sdl("Html").unwrap(), @r#"
    """
    Rendered markdown.
    Safe to inject.
    """
    scalar Html
    "#);
}

#[test]
fn whole_schema_skips_standard_scalars() {
    let sdl = schema("type Post implements Node { title: String }").to_sdl();

    assert!(!sdl.contains("scalar String"));
    assert!(!sdl.contains("schema {"));
    assert!(sdl.contains("scalar Date"));
    assert!(sdl.contains("interface Node {"));
    assert!(sdl.contains("type Post implements Node {"));
    assert!(sdl.ends_with("}\n"));
}
