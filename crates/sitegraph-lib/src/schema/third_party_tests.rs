use indoc::indoc;
use serde_json::json;

use super::composer::NodesByType;
use super::third_party::ThirdPartySchema;
use super::types::{FieldDef, ObjectType, TypeDef, TypeRef};
use super::{Resolver, SchemaComposer, TypeResolver};
use crate::Error;
use crate::infer::TypeConflictReporter;

const GITHUB: &str = indoc! {"
    schema { query: GitHubRoot }
    type GitHubRoot {
      repository(name: String!): Repository
      viewer: Viewer
    }
    type Repository { name: String stars: Int root: GitHubRoot }
    type Viewer { login: String }
    interface Starrable { stars: Int }
    scalar Date
"};

#[test]
fn sdl_names_its_query_root() {
    let schema = ThirdPartySchema::from_sdl(GITHUB).unwrap();

    assert_eq!(schema.query_type(), "GitHubRoot");
    let names: Vec<_> = schema.types().iter().map(TypeDef::name).collect();
    assert_eq!(names, ["GitHubRoot", "Repository", "Viewer", "Starrable", "Date"]);
}

#[test]
fn sdl_must_contain_its_root() {
    let missing = ThirdPartySchema::from_sdl("type Repository { name: String }");
    let extended = ThirdPartySchema::from_sdl("type Query { a: Int }\nextend type Query { b: Int }");

    assert!(matches!(missing, Err(Error::InvalidSchema(m)) if m.contains("no query type `Query`")));
    assert!(matches!(extended, Err(Error::InvalidSchema(m)) if m.contains("may not extend `Query`")));
}

#[test]
fn resolvers_attach_to_existing_definitions_only() {
    let schema = ThirdPartySchema::from_sdl(GITHUB).unwrap();
    let resolver = Resolver::sync(|_| Ok(json!({ "login": "octocat" })));

    let schema = schema.resolve_field("GitHubRoot", "viewer", resolver.clone()).unwrap();
    let viewer = schema.types()[0].fields().unwrap()["viewer"].clone();
    assert!(viewer.resolver.is_computed());

    assert!(schema.clone().resolve_field("GitHubRoot", "nope", resolver).is_err());
    assert!(
        schema
            .clone()
            .resolve_type("Starrable", TypeResolver::new(|_| Some("Repository".into())))
            .is_ok()
    );
    assert!(
        schema
            .resolve_type("Viewer", TypeResolver::new(|_| None))
            .is_err()
    );
}

#[test]
fn with_type_replaces_by_name() {
    let schema = ThirdPartySchema::new("Api")
        .with_type(TypeDef::Object(ObjectType::new("Api").with_field(FieldDef::new("a", TypeRef::named("Int")))))
        .with_type(TypeDef::Object(ObjectType::new("Api").with_field(FieldDef::new("b", TypeRef::named("Int")))));

    assert_eq!(schema.types().len(), 1);
    assert!(schema.types()[0].fields().unwrap().contains_key("b"));
}

#[test]
fn root_fields_join_the_query_type() {
    let mut composer = SchemaComposer::new();
    composer.add_third_party_schema(ThirdPartySchema::from_sdl(GITHUB).unwrap());

    let schema = composer
        .compose(&NodesByType::new(), &mut TypeConflictReporter::new())
        .unwrap();

    assert!(schema.get_type("GitHubRoot").is_none());
    assert_eq!(schema.query_type_name(), "Query");
    assert_eq!(
        schema.field("Query", "repository").unwrap().ty,
        TypeRef::named("Repository")
    );
    assert!(schema.field("Query", "viewer").is_some());
    assert_eq!(schema.field("Repository", "root").unwrap().ty, TypeRef::named("Query"));
    assert!(composer.warnings()[0].contains("Third-party type `Date` is already defined"));
}
