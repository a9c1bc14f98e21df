//! Schema type representations.
//!
//! Types refer to each other by name; the [`Schema`](super::Schema) owns the
//! registry that resolves those names, so every reference to a type resolves
//! to the same object.

use std::fmt;

use futures::FutureExt;
use futures::future::{BoxFuture, ready};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::context::{ResolveParams, Resolver, TypeResolver};
use crate::resolve::ResolveError;

/// A possibly wrapped reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Wrap in non-null; already non-null references are returned as is.
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// Innermost type name.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    /// The reference without an outer non-null wrapper.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.nullable(), TypeRef::List(_))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Point every occurrence of `from` at `to`, through any wrappers.
    pub fn rename(&mut self, from: &str, to: &str) {
        match self {
            TypeRef::Named(name) if name == from => *name = to.to_owned(),
            TypeRef::Named(_) => {}
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.rename(from, to),
        }
    }

    /// Parse SDL type notation such as `[Post!]!`.
    pub fn parse(text: &str) -> Option<TypeRef> {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix('!') {
            let inner = TypeRef::parse(inner)?;
            if inner.is_non_null() {
                return None;
            }
            return Some(TypeRef::NonNull(Box::new(inner)));
        }
        if let Some(inner) = text.strip_prefix('[') {
            let inner = inner.strip_suffix(']')?;
            return Some(TypeRef::list(TypeRef::parse(inner)?));
        }
        is_valid_name(text).then(|| TypeRef::named(text))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// GraphQL name rule: `[_A-Za-z][_0-9A-Za-z]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Field or input-field argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgDef {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

impl ArgDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
            description: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// How a field obtains its value. Chosen once when the schema is composed.
#[derive(Clone, Default)]
pub enum FieldResolver {
    /// Read the same-named property off the parent value.
    #[default]
    Stored,
    Computed(Resolver),
}

impl FieldResolver {
    pub fn is_computed(&self) -> bool {
        matches!(self, FieldResolver::Computed(_))
    }

    /// Resolve one field. `None` means the value is absent, which is not an error.
    pub fn resolve(&self, params: ResolveParams) -> BoxFuture<'static, Result<Option<Value>, ResolveError>> {
        match self {
            FieldResolver::Stored => {
                let value = params.source.get(&params.info.field_name).cloned();
                ready(Ok(value)).boxed()
            }
            FieldResolver::Computed(resolver) => resolver.call(params).map(|r| r.map(Some)).boxed(),
        }
    }
}

impl fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldResolver::Stored => write!(f, "Stored"),
            FieldResolver::Computed(_) => write!(f, "Computed"),
        }
    }
}

/// Marks a root field that lists or looks up nodes of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeQuery {
    pub type_name: String,
    pub first_only: bool,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
    pub args: IndexMap<String, ArgDef>,
    pub resolver: FieldResolver,
    /// Field extensions applied to this field, with their options.
    pub extensions: IndexMap<String, Map<String, Value>>,
    pub node_query: Option<NodeQuery>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            args: IndexMap::new(),
            resolver: FieldResolver::Stored,
            extensions: IndexMap::new(),
            node_query: None,
        }
    }

    pub fn with_arg(mut self, arg: ArgDef) -> Self {
        self.args.insert(arg.name.clone(), arg);
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = FieldResolver::Computed(resolver);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extension(mut self, name: impl Into<String>, options: Map<String, Value>) -> Self {
        self.extensions.insert(name.into(), options);
        self
    }

    fn rename_refs(&mut self, from: &str, to: &str) {
        self.ty.rename(from, to);
        for arg in self.args.values_mut() {
            arg.ty.rename(from, to);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: IndexMap<String, FieldDef>,
    /// Set by `@dontInfer`: inferred fields are not merged in.
    pub dont_infer: bool,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        let interface = interface.into();
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
        self
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: IndexMap<String, FieldDef>,
    pub resolve_type: Option<TypeResolver>,
}

#[derive(Debug, Clone, Default)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
    pub resolve_type: Option<TypeResolver>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, ArgDef>,
}

/// Any named type in the registry.
#[derive(Debug, Clone)]
pub enum TypeDef {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    Scalar(ScalarType),
    InputObject(InputObjectType),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Object(t) => &t.name,
            TypeDef::Interface(t) => &t.name,
            TypeDef::Union(t) => &t.name,
            TypeDef::Enum(t) => &t.name,
            TypeDef::Scalar(t) => &t.name,
            TypeDef::InputObject(t) => &t.name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDef::Object(_) => "type",
            TypeDef::Interface(_) => "interface",
            TypeDef::Union(_) => "union",
            TypeDef::Enum(_) => "enum",
            TypeDef::Scalar(_) => "scalar",
            TypeDef::InputObject(_) => "input",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            TypeDef::Object(t) => t.description.as_deref(),
            TypeDef::Interface(t) => t.description.as_deref(),
            TypeDef::Union(t) => t.description.as_deref(),
            TypeDef::Enum(t) => t.description.as_deref(),
            TypeDef::Scalar(t) => t.description.as_deref(),
            TypeDef::InputObject(t) => t.description.as_deref(),
        }
    }

    /// Output fields of object and interface types.
    pub fn fields(&self) -> Option<&IndexMap<String, FieldDef>> {
        match self {
            TypeDef::Object(t) => Some(&t.fields),
            TypeDef::Interface(t) => Some(&t.fields),
            _ => None,
        }
    }

    pub fn fields_mut(&mut self) -> Option<&mut IndexMap<String, FieldDef>> {
        match self {
            TypeDef::Object(t) => Some(&mut t.fields),
            TypeDef::Interface(t) => Some(&mut t.fields),
            _ => None,
        }
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, TypeDef::Interface(_) | TypeDef::Union(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeDef::Enum(_) | TypeDef::Scalar(_))
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeDef::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn resolve_type(&self) -> Option<&TypeResolver> {
        match self {
            TypeDef::Interface(t) => t.resolve_type.as_ref(),
            TypeDef::Union(t) => t.resolve_type.as_ref(),
            _ => None,
        }
    }

    /// Point every reference to type `from` at `to`.
    pub fn rename_refs(&mut self, from: &str, to: &str) {
        let rename = |name: &mut String| {
            if name == from {
                *name = to.to_owned();
            }
        };
        match self {
            TypeDef::Object(t) => {
                t.interfaces.iter_mut().for_each(rename);
                t.fields.values_mut().for_each(|f| f.rename_refs(from, to));
            }
            TypeDef::Interface(t) => {
                t.interfaces.iter_mut().for_each(rename);
                t.fields.values_mut().for_each(|f| f.rename_refs(from, to));
            }
            TypeDef::Union(t) => t.members.iter_mut().for_each(rename),
            TypeDef::InputObject(t) => {
                t.fields.values_mut().for_each(|a| a.ty.rename(from, to));
            }
            TypeDef::Enum(_) | TypeDef::Scalar(_) => {}
        }
    }

    /// Every type name this definition refers to.
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut out = Vec::new();
        match self {
            TypeDef::Object(t) => {
                out.extend(t.interfaces.iter().map(String::as_str));
                push_field_refs(&t.fields, &mut out);
            }
            TypeDef::Interface(t) => {
                out.extend(t.interfaces.iter().map(String::as_str));
                push_field_refs(&t.fields, &mut out);
            }
            TypeDef::Union(t) => out.extend(t.members.iter().map(String::as_str)),
            TypeDef::InputObject(t) => out.extend(t.fields.values().map(|a| a.ty.named_type())),
            TypeDef::Enum(_) | TypeDef::Scalar(_) => {}
        }
        out
    }
}

fn push_field_refs<'a>(fields: &'a IndexMap<String, FieldDef>, out: &mut Vec<&'a str>) {
    for field in fields.values() {
        out.push(field.ty.named_type());
        for arg in field.args.values() {
            out.push(arg.ty.named_type());
        }
    }
}
