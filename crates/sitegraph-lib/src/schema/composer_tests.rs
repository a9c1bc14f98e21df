use std::sync::Arc;

use indexmap::IndexMap;
use indoc::indoc;
use serde_json::{Map, Value, json};
use sitegraph_core::Node;

use super::composer::{DEFAULT_SITE_PLUGIN, NodesByType, ResolverConfig, ResolverMap, TypeDefs};
use super::extensions::{DateformatExtension, FieldExtension};
use super::types::{FieldDef, TypeDef, TypeRef};
use super::{NODE_INTERFACE, Resolver, Schema, SchemaComposer};
use crate::Error;
use crate::infer::TypeConflictReporter;

fn by_type(nodes: Vec<Node>) -> NodesByType {
    let mut out = NodesByType::new();
    for node in nodes {
        out.entry(node.type_name().to_owned())
            .or_insert_with(Vec::new)
            .push(Arc::new(node.ensure_digest()));
    }
    out
}

fn compose(composer: &mut SchemaComposer, nodes: Vec<Node>) -> Schema {
    composer
        .compose(&by_type(nodes), &mut TypeConflictReporter::new())
        .unwrap()
}

fn sdl(composer: &mut SchemaComposer, plugin: &str, source: &str) {
    composer
        .add_type_defs(plugin, TypeDefs::Sdl(source.to_owned()))
        .unwrap();
}

fn field_type(schema: &Schema, type_name: &str, field: &str) -> String {
    schema.field(type_name, field).unwrap().ty.to_string()
}

fn post() -> Node {
    Node::new("p1", "Post")
        .with_field("title", json!("Hello"))
        .with_field("views", json!(3))
        .with_field("date", json!("2021-03-02"))
        .with_field("frontmatter", json!({ "slug": "hello", "draft": false }))
        .with_field("author___NODE", json!("a1"))
}

fn author() -> Node {
    Node::new("a1", "Author")
        .with_field("name", json!("Ann"))
        .with_field("handle", json!("ann"))
}

#[test]
fn inferred_node_types() {
    let schema = compose(&mut SchemaComposer::new(), vec![post(), author()]);

    let post = schema.object("Post").unwrap();
    assert!(post.implements(NODE_INTERFACE));
    let fields: Vec<_> = post.fields.keys().map(String::as_str).collect();
    assert_eq!(
        fields,
        ["id", "parent", "children", "internal", "title", "views", "date", "frontmatter", "author"]
    );
    assert_eq!(field_type(&schema, "Post", "views"), "Int");
    assert_eq!(field_type(&schema, "Post", "date"), "Date");
    assert_eq!(field_type(&schema, "Post", "frontmatter"), "PostFrontmatter");
    assert_eq!(field_type(&schema, "PostFrontmatter", "draft"), "Boolean");
    assert_eq!(field_type(&schema, "Post", "author"), "Author");
    assert!(schema.field("Post", "author").unwrap().resolver.is_computed());

    assert_eq!(field_type(&schema, "Query", "allPost"), "[Post!]!");
    assert_eq!(field_type(&schema, "Query", "author"), "Author");
    let names: Vec<_> = schema.node_types().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Post", "Author"]);
}

#[test]
fn declared_fields_win_over_inferred_ones() {
    let mut composer = SchemaComposer::new();
    sdl(&mut composer, "plugin-a", "type Post implements Node { views: Float subtitle: String }");

    let schema = compose(&mut composer, vec![post(), author()]);

    assert_eq!(field_type(&schema, "Post", "views"), "Float");
    assert_eq!(field_type(&schema, "Post", "subtitle"), "String");
    assert_eq!(field_type(&schema, "Post", "title"), "String");
}

#[test]
fn site_types_are_composed_last() {
    let mut composer = SchemaComposer::new();
    sdl(&mut composer, DEFAULT_SITE_PLUGIN, "type Post implements Node { views: String }");
    sdl(&mut composer, "plugin-a", "type Post implements Node { views: Float }");

    let schema = compose(&mut composer, vec![post()]);

    assert_eq!(field_type(&schema, "Post", "views"), "String");
}

#[test]
fn dont_infer_keeps_only_declared_fields() {
    let mut composer = SchemaComposer::new();
    sdl(&mut composer, "plugin-a", "type Post @dontInfer { title: String }");

    let schema = compose(&mut composer, vec![post(), author()]);

    let post = schema.object("Post").unwrap();
    assert!(post.implements(NODE_INTERFACE));
    assert!(post.fields.contains_key("id"));
    assert!(post.fields.contains_key("title"));
    assert!(!post.fields.contains_key("views"));
    assert!(schema.field("Query", "allPost").is_some());
}

#[test]
fn conflicting_kinds_fail() {
    let mut composer = SchemaComposer::new();
    sdl(&mut composer, "plugin-a", "enum Post { A }");

    let result = composer.compose(&by_type(vec![post()]), &mut TypeConflictReporter::new());

    assert!(matches!(result, Err(Error::InvalidSchema(m)) if m.contains("already defined as enum")));
}

#[test]
fn unknown_references_fail() {
    let mut composer = SchemaComposer::new();
    sdl(&mut composer, "plugin-a", "type Widget { part: Gadget }");

    let result = composer.compose(&NodesByType::new(), &mut TypeConflictReporter::new());

    assert!(matches!(result, Err(Error::InvalidSchema(m)) if m == "`Widget` refers to unknown type `Gadget`"));
}

#[test]
fn extension_registration_is_checked() {
    struct Deprecated;
    impl FieldExtension for Deprecated {
        fn name(&self) -> &str {
            "deprecated"
        }
        fn extend(&self, _: &Map<String, Value>, field: &FieldDef) -> FieldDef {
            field.clone()
        }
    }

    let mut composer = SchemaComposer::new();
    composer.register_extension(Arc::new(Deprecated));
    composer.register_extension(Arc::new(DateformatExtension));

    assert_eq!(
        composer.warnings(),
        [
            "The field extension name `deprecated` is reserved for internal use.",
            "A field extension with the name `dateformat` has already been registered.",
        ]
    );
    assert!(composer.has_extension("dateformat"));
    assert!(!composer.has_extension("deprecated"));
}

#[test]
fn unknown_extensions_are_dropped_with_a_warning() {
    let mut composer = SchemaComposer::new();
    sdl(
        &mut composer,
        "plugin-a",
        r#"type Post implements Node { title: String @upper old: String @deprecated(reason: "no") }"#,
    );

    let schema = compose(&mut composer, vec![post()]);

    assert_eq!(
        composer.take_warnings(),
        ["Field extension `upper` on `Post.title` is not available."]
    );
    assert!(schema.field("Post", "title").unwrap().extensions.is_empty());
    assert!(schema.field("Post", "old").unwrap().extensions.contains_key("deprecated"));
    assert!(composer.warnings().is_empty());
}

#[test]
fn mapping_turns_fields_into_links() {
    let mut composer = SchemaComposer::new().with_mapping(IndexMap::from([
        ("Post.writer".to_owned(), "Author.handle".to_owned()),
        ("Post.frontmatter.slug".to_owned(), "Author".to_owned()),
        ("Post.nothing".to_owned(), "Author".to_owned()),
        ("Post.title".to_owned(), "Missing".to_owned()),
    ]));

    let schema = compose(&mut composer, vec![post().with_field("writer", json!("ann")), author()]);

    let writer = schema.field("Post", "writer").unwrap();
    assert_eq!(writer.ty.to_string(), "Author");
    assert_eq!(writer.extensions["link"], *json!({ "by": "handle" }).as_object().unwrap());
    assert_eq!(field_type(&schema, "PostFrontmatter", "slug"), "Author");
    assert_eq!(
        composer.warnings(),
        [
            "Mapping `Post.nothing` points at a missing field.",
            "Mapping `Post.title` points at unknown type `Missing`.",
        ]
    );
}

#[test]
fn node_fields_reach_nested_types() {
    let mut composer = SchemaComposer::new();
    composer.add_node_fields(
        "Post",
        IndexMap::from([
            ("wordCount".to_owned(), FieldDef::new("wordCount", TypeRef::named("Int"))),
            ("frontmatter.excerpt".to_owned(), FieldDef::new("excerpt", TypeRef::named("String"))),
            ("missing.field".to_owned(), FieldDef::new("field", TypeRef::named("String"))),
        ]),
    );

    let schema = compose(&mut composer, vec![post()]);

    assert_eq!(field_type(&schema, "Post", "wordCount"), "Int");
    assert_eq!(field_type(&schema, "PostFrontmatter", "excerpt"), "String");
    assert_eq!(
        composer.warnings(),
        ["Cannot add field `missing.field` to `Post`: no such object type."]
    );
}

#[test]
fn custom_resolvers_override_and_add_fields() {
    let shout = Resolver::sync(|params| {
        let title = params.source.get("title").and_then(Value::as_str).unwrap_or_default();
        Ok(Value::String(title.to_uppercase()))
    });
    let mut map = ResolverMap::new();
    map.insert(
        "Post".into(),
        IndexMap::from([
            ("title".to_owned(), ResolverConfig::new(shout.clone())),
            (
                "shout".to_owned(),
                ResolverConfig::new(shout.clone()).with_type(TypeRef::named("String").non_null()),
            ),
            ("untyped".to_owned(), ResolverConfig::new(shout.clone())),
        ]),
    );
    map.insert(
        "Query".into(),
        IndexMap::from([("allPost".to_owned(), ResolverConfig::new(shout.clone()))]),
    );
    map.insert(
        "Ghost".into(),
        IndexMap::from([("boo".to_owned(), ResolverConfig::new(shout))]),
    );
    let mut composer = SchemaComposer::new();
    composer.add_resolvers("plugin-a", map);

    let schema = compose(&mut composer, vec![post()]);

    assert!(schema.field("Post", "title").unwrap().resolver.is_computed());
    assert_eq!(field_type(&schema, "Post", "shout"), "String!");
    assert!(schema.field("Post", "untyped").is_none());
    assert!(schema.field("Query", "allPost").unwrap().node_query.is_none());
    assert_eq!(composer.warnings().len(), 2);
    assert!(composer.warnings()[0].contains("new field `Post.untyped` without a type"));
    assert!(composer.warnings()[1].contains("type `Ghost` that doesn't exist in the schema"));
}

#[test]
fn site_page_is_rebuilt_alone() {
    let page = |id: &str, path: &str| Node::new(id, "SitePage").with_field("path", json!(path));
    let mut composer = SchemaComposer::new();

    let early = composer.rebuild_site_page(&NodesByType::new(), &mut TypeConflictReporter::new());
    assert!(matches!(early, Err(Error::SchemaNotBuilt)));

    let first = compose(&mut composer, vec![post(), page("/", "/")]);
    assert!(first.field("SitePage", "context").is_none());

    let pages = by_type(vec![
        page("/", "/"),
        page("/hello", "/hello").with_field("context", json!({ "slug": "hello" })),
    ]);
    let rebuilt = composer
        .rebuild_site_page(&pages, &mut TypeConflictReporter::new())
        .unwrap();

    assert_eq!(field_type(&rebuilt, "SitePage", "context"), "SitePageContext");
    assert_eq!(field_type(&rebuilt, "SitePageContext", "slug"), "String");
    assert!(rebuilt.field("Query", "allSitePage").is_some());
    assert!(rebuilt.field("Query", "sitePage").is_some());
    assert_eq!(field_type(&rebuilt, "Post", "views"), "Int");
    assert!(matches!(rebuilt.get_type("PostFrontmatter"), Some(TypeDef::Object(_))));
}

#[test]
fn declared_interfaces_are_kept() {
    let mut composer = SchemaComposer::new();
    sdl(
        &mut composer,
        "plugin-a",
        indoc! {"
            interface Publishable { title: String }
            type Post implements Node & Publishable { title: String }
        "},
    );

    let schema = compose(&mut composer, vec![post()]);

    assert_eq!(schema.possible_types("Publishable"), ["Post"]);
    assert!(schema.is_possible_type("Node", "Post"));
}
