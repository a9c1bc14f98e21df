//! The executable schema and the pieces it is composed from.
//!
//! A [`Schema`] is a frozen registry of named types. Types point at each
//! other by name only, so a reference is always resolved through the
//! registry and every path to a type reaches the same definition.

pub mod composer;
pub mod context;
pub mod date;
pub mod extensions;
mod printer;
pub mod sdl;
pub mod third_party;
pub mod types;

#[cfg(test)]
mod composer_tests;
#[cfg(test)]
mod date_tests;
#[cfg(test)]
mod printer_tests;
#[cfg(test)]
mod sdl_tests;
#[cfg(test)]
mod third_party_tests;

use indexmap::IndexMap;

pub use composer::{SchemaComposer, TypeDefs};
pub use context::{NodeModel, ResolveInfo, ResolveParams, Resolver, ResolverContext, TypeResolver};
pub use extensions::{FieldExtension, builtin_extensions};
pub use sdl::{SdlDocument, SdlType, parse_sdl};
pub use third_party::ThirdPartySchema;
pub use types::{
    ArgDef, EnumType, FieldDef, FieldResolver, InputObjectType, InterfaceType, NodeQuery,
    ObjectType, ScalarType, TypeDef, TypeRef, UnionType,
};

/// Name of the canonical query root.
pub const QUERY_TYPE: &str = "Query";

/// Name of the interface every stored node type implements.
pub const NODE_INTERFACE: &str = "Node";

/// Scalars every GraphQL schema has; never printed.
pub const STANDARD_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

#[derive(Debug, Clone)]
pub struct Schema {
    types: IndexMap<String, TypeDef>,
    query_type: String,
}

impl Schema {
    pub(crate) fn new(types: IndexMap<String, TypeDef>, query_type: impl Into<String>) -> Self {
        Self {
            types,
            query_type: query_type.into(),
        }
    }

    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    pub fn query_type(&self) -> Option<&ObjectType> {
        self.object(&self.query_type)
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        self.get_type(name).and_then(TypeDef::as_object)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// The definition a reference points at, through any wrappers.
    pub fn resolve_ref(&self, ty: &TypeRef) -> Option<&TypeDef> {
        self.get_type(ty.named_type())
    }

    /// Output fields of an object or interface type.
    pub fn fields_of(&self, type_name: &str) -> Option<&IndexMap<String, FieldDef>> {
        self.get_type(type_name).and_then(TypeDef::fields)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDef> {
        self.fields_of(type_name)?.get(field_name)
    }

    pub fn is_abstract(&self, type_name: &str) -> bool {
        self.get_type(type_name).is_some_and(TypeDef::is_abstract)
    }

    /// Object types a value of `type_name` may be at runtime.
    pub fn possible_types(&self, type_name: &str) -> Vec<&str> {
        match self.get_type(type_name) {
            Some(TypeDef::Object(t)) => vec![t.name.as_str()],
            Some(TypeDef::Union(u)) => u.members.iter().map(String::as_str).collect(),
            Some(TypeDef::Interface(i)) => self
                .types
                .values()
                .filter_map(TypeDef::as_object)
                .filter(|o| o.implements(&i.name))
                .map(|o| o.name.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_possible_type(&self, abstract_type: &str, object_type: &str) -> bool {
        abstract_type == object_type || self.possible_types(abstract_type).contains(&object_type)
    }

    /// Object types implementing `Node`, in registry order.
    pub fn node_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.types
            .values()
            .filter_map(TypeDef::as_object)
            .filter(|o| o.implements(NODE_INTERFACE))
    }

    /// The whole schema as SDL, standard scalars omitted.
    pub fn to_sdl(&self) -> String {
        printer::print_schema(self)
    }

    /// One type as SDL.
    pub fn type_to_sdl(&self, name: &str) -> Option<String> {
        self.get_type(name).map(printer::print_type)
    }
}
