//! Schemas contributed whole by a plugin, such as a remote API.
//!
//! The root query type may have any name. When composed, its fields join
//! the canonical `Query`, and every reference to it is renamed.

use super::QUERY_TYPE;
use super::context::{Resolver, TypeResolver};
use super::sdl::parse_sdl;
use super::types::{FieldResolver, TypeDef};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct ThirdPartySchema {
    types: Vec<TypeDef>,
    query_type: String,
}

impl ThirdPartySchema {
    pub fn new(query_type: impl Into<String>) -> Self {
        Self {
            types: Vec::new(),
            query_type: query_type.into(),
        }
    }

    /// Types from SDL. The root is named by a `schema` block, else `Query`.
    pub fn from_sdl(source: &str) -> Result<Self> {
        let doc = parse_sdl(source)?;
        let mut schema = Self::new(doc.query_root.as_deref().unwrap_or(QUERY_TYPE));
        for sdl_type in doc.types {
            if sdl_type.is_extension {
                return Err(Error::InvalidSchema(format!(
                    "third-party schema may not extend `{}`",
                    sdl_type.def.name()
                )));
            }
            schema.types.push(sdl_type.def);
        }
        if schema.root().is_none() {
            return Err(Error::InvalidSchema(format!(
                "third-party schema has no query type `{}`",
                schema.query_type
            )));
        }
        Ok(schema)
    }

    pub fn with_type(mut self, def: TypeDef) -> Self {
        self.types.retain(|t| t.name() != def.name());
        self.types.push(def);
        self
    }

    /// Attach a resolver to an existing field.
    pub fn resolve_field(mut self, type_name: &str, field_name: &str, resolver: Resolver) -> Result<Self> {
        let field = self
            .types
            .iter_mut()
            .find(|t| t.name() == type_name)
            .and_then(|t| t.fields_mut())
            .and_then(|fields| fields.get_mut(field_name))
            .ok_or_else(|| {
                Error::InvalidSchema(format!("no field `{type_name}.{field_name}` to resolve"))
            })?;
        field.resolver = FieldResolver::Computed(resolver);
        Ok(self)
    }

    /// Attach a type resolver to an interface or union.
    pub fn resolve_type(mut self, type_name: &str, resolver: TypeResolver) -> Result<Self> {
        match self.types.iter_mut().find(|t| t.name() == type_name) {
            Some(TypeDef::Interface(t)) => t.resolve_type = Some(resolver),
            Some(TypeDef::Union(t)) => t.resolve_type = Some(resolver),
            _ => {
                return Err(Error::InvalidSchema(format!(
                    "`{type_name}` is not an abstract type"
                )));
            }
        }
        Ok(self)
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    pub(crate) fn root(&self) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name() == self.query_type)
    }
}
