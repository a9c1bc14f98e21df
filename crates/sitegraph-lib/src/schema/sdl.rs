//! Type definitions written in SDL, lowered to schema types.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::types::{
    ArgDef, EnumType, FieldDef, InputObjectType, InterfaceType, ObjectType, ScalarType, TypeDef,
    TypeRef, UnionType,
};
use crate::parser::ast::{self, Definition, Directive, NamedType};
use crate::{Error, Result};

/// One type from an SDL document.
#[derive(Debug, Clone)]
pub struct SdlType {
    pub def: TypeDef,
    /// Written as `extend type ...`.
    pub is_extension: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SdlDocument {
    pub types: Vec<SdlType>,
    /// Query root named by a `schema { query: ... }` block.
    pub query_root: Option<String>,
}

/// Parse and lower an SDL document. Any syntax error fails the whole document.
pub fn parse_sdl(source: &str) -> Result<SdlDocument> {
    let (doc, diagnostics) = crate::parser::parse(source)?;
    if diagnostics.has_errors() {
        return Err(Error::SchemaParseError(diagnostics));
    }

    let mut out = SdlDocument::default();
    for def in doc.definitions() {
        match def {
            Definition::Operation(_) | Definition::Fragment(_) => {
                return Err(Error::InvalidSchema(
                    "type definitions may not contain operations or fragments".into(),
                ));
            }
            Definition::Schema(schema) => {
                out.query_root = schema
                    .root_operations()
                    .find(|r| r.operation().is_some_and(|t| t.text() == "query"))
                    .and_then(|r| named(r.named_type()));
            }
            // Field extensions are registered in code, not declared.
            Definition::Directive(_) => {}
            Definition::Object(obj) => out.types.push(SdlType {
                is_extension: obj.is_extension(),
                def: TypeDef::Object(lower_object(&obj)),
            }),
            Definition::Interface(iface) => out.types.push(SdlType {
                is_extension: iface.is_extension(),
                def: TypeDef::Interface(InterfaceType {
                    name: token_text(iface.name()),
                    description: iface.description(),
                    interfaces: names(iface.interfaces()),
                    fields: lower_fields(iface.fields()),
                    resolve_type: None,
                }),
            }),
            Definition::Union(union) => out.types.push(SdlType {
                is_extension: union.is_extension(),
                def: TypeDef::Union(UnionType {
                    name: token_text(union.name()),
                    description: union.description(),
                    members: names(union.members()),
                    resolve_type: None,
                }),
            }),
            Definition::Enum(e) => out.types.push(SdlType {
                is_extension: e.is_extension(),
                def: TypeDef::Enum(EnumType {
                    name: token_text(e.name()),
                    description: e.description(),
                    values: e.values().map(|v| token_text(v.name())).collect(),
                }),
            }),
            Definition::Scalar(s) => out.types.push(SdlType {
                is_extension: s.is_extension(),
                def: TypeDef::Scalar(ScalarType {
                    name: token_text(s.name()),
                    description: s.description(),
                }),
            }),
            Definition::InputObject(input) => out.types.push(SdlType {
                is_extension: input.is_extension(),
                def: TypeDef::InputObject(InputObjectType {
                    name: token_text(input.name()),
                    description: input.description(),
                    fields: input
                        .fields()
                        .filter_map(|f| lower_input_value(&f))
                        .map(|a| (a.name.clone(), a))
                        .collect(),
                }),
            }),
        }
    }
    Ok(out)
}

fn lower_object(obj: &ast::ObjectTypeDefinition) -> ObjectType {
    let directives: Vec<String> = obj
        .directives()
        .filter_map(|d| d.name().map(|t| t.text().to_owned()))
        .collect();
    ObjectType {
        name: token_text(obj.name()),
        description: obj.description(),
        interfaces: names(obj.interfaces()),
        fields: lower_fields(obj.fields()),
        dont_infer: directives.iter().any(|d| d == "dontInfer"),
    }
}

fn lower_fields(fields: impl Iterator<Item = ast::FieldDefinition>) -> IndexMap<String, FieldDef> {
    let mut out = IndexMap::new();
    for field in fields {
        let Some(ty) = field.ty().map(|t| lower_type(&t)) else {
            continue;
        };
        let mut def = FieldDef::new(token_text(field.name()), ty);
        def.description = field.description();
        for arg in field.arguments() {
            if let Some(arg) = lower_input_value(&arg) {
                def.args.insert(arg.name.clone(), arg);
            }
        }
        for directive in field.directives() {
            if let Some(name) = directive.name() {
                def.extensions
                    .insert(name.text().to_owned(), directive_options(&directive));
            }
        }
        out.insert(def.name.clone(), def);
    }
    out
}

fn lower_input_value(value: &ast::InputValueDefinition) -> Option<ArgDef> {
    let ty = lower_type(&value.ty()?);
    let mut arg = ArgDef::new(token_text(value.name()), ty);
    arg.description = value.description();
    arg.default_value = value.default_value().map(|v| v.to_json(&Map::new()));
    Some(arg)
}

pub(crate) fn lower_type(ty: &ast::Type) -> TypeRef {
    match ty {
        ast::Type::Named(n) => TypeRef::named(token_text(n.name())),
        ast::Type::List(l) => TypeRef::list(l.inner().map_or(TypeRef::named(""), |t| lower_type(&t))),
        ast::Type::NonNull(n) => {
            TypeRef::NonNull(Box::new(n.inner().map_or(TypeRef::named(""), |t| lower_type(&t))))
        }
    }
}

/// Directive arguments as a JSON object.
pub(crate) fn directive_options(directive: &Directive) -> Map<String, Value> {
    directive
        .arguments()
        .filter_map(|arg| {
            let name = arg.name()?.text().to_owned();
            let value = arg.value()?.to_json(&Map::new());
            Some((name, value))
        })
        .collect()
}

fn names(types: Vec<NamedType>) -> Vec<String> {
    types.iter().filter_map(|t| named(Some(t.clone()))).collect()
}

fn named(ty: Option<NamedType>) -> Option<String> {
    ty?.name().map(|t| t.text().to_owned())
}

fn token_text(token: Option<crate::parser::SyntaxToken>) -> String {
    token.map(|t| t.text().to_owned()).unwrap_or_default()
}
