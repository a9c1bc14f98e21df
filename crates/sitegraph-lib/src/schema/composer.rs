//! Schema composition.
//!
//! The composer collects type definitions, third-party schemas, extra node
//! fields and custom resolvers from plugins, then merges them with the types
//! inferred from the node store into one [`Schema`]:
//!
//! 1. built-in scalars, the `Node` interface and an empty `Query`
//! 2. user types, `default-site-plugin` last so the site's own types win
//! 3. inferred types; user fields keep precedence over inferred ones
//! 4. third-party types, their query root folded into `Query`
//! 5. `Node` interface fields and fields from `setFieldsOnGraphQLNodeType`
//! 6. type mapping, then field extensions
//! 7. `all<Type>` and `<type>` root fields for every node type
//! 8. `createResolvers` fields, then reference validation
//!
//! The composed registry is kept so the `SitePage` type can be re-derived
//! alone once pages exist.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use sitegraph_core::Node;
use sitegraph_core::utils::to_camel_case;

use super::context::{Resolver, TypeResolver};
use super::extensions::{FieldExtension, RESERVED_FIELD_DIRECTIVES, builtin_extensions};
use super::sdl::parse_sdl;
use super::third_party::ThirdPartySchema;
use super::types::{
    ArgDef, FieldDef, FieldResolver, InterfaceType, NodeQuery, ObjectType, ScalarType, TypeDef,
    TypeRef,
};
use super::{NODE_INTERFACE, QUERY_TYPE, STANDARD_SCALARS, Schema};
use crate::infer::{TypeConflictReporter, TypeInferrer};
use crate::{Error, Result};

/// Plugin whose declarations are composed last.
pub const DEFAULT_SITE_PLUGIN: &str = "default-site-plugin";

/// Node type re-derived by [`SchemaComposer::rebuild_site_page`].
pub const SITE_PAGE_TYPE: &str = "SitePage";

/// Type definitions handed over by `createSchemaCustomization`.
#[derive(Debug, Clone)]
pub enum TypeDefs {
    Sdl(String),
    Types(Vec<TypeDef>),
}

/// A field added or overridden by `createResolvers`. New fields need a type.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub ty: Option<TypeRef>,
    pub args: Vec<ArgDef>,
    pub resolver: Resolver,
}

impl ResolverConfig {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            ty: None,
            args: Vec::new(),
            resolver,
        }
    }

    pub fn with_type(mut self, ty: TypeRef) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_arg(mut self, arg: ArgDef) -> Self {
        self.args.push(arg);
        self
    }
}

/// Type name → field name → resolver.
pub type ResolverMap = IndexMap<String, IndexMap<String, ResolverConfig>>;

/// Stored nodes grouped by type, in store order.
pub type NodesByType = IndexMap<String, Vec<Arc<Node>>>;

#[derive(Debug, Clone)]
struct UserType {
    plugin: String,
    def: TypeDef,
    is_extension: bool,
}

/// Types touched by a composition pass. `None` means all of them.
type Scope = Option<IndexSet<String>>;

fn in_scope(scope: &Scope, name: &str) -> bool {
    scope.as_ref().is_none_or(|s| s.contains(name))
}

pub struct SchemaComposer {
    extensions: IndexMap<String, Arc<dyn FieldExtension>>,
    mapping: IndexMap<String, String>,
    user_types: Vec<UserType>,
    third_party: Vec<ThirdPartySchema>,
    node_fields: IndexMap<String, IndexMap<String, FieldDef>>,
    resolvers: Vec<(String, ResolverMap)>,
    /// Node type → nested types inferred for it.
    inferred_nested: IndexMap<String, Vec<String>>,
    composed: IndexMap<String, TypeDef>,
    warnings: Vec<String>,
}

impl Default for SchemaComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaComposer {
    /// A composer with the built-in field extensions registered.
    pub fn new() -> Self {
        let mut composer = Self {
            extensions: IndexMap::new(),
            mapping: IndexMap::new(),
            user_types: Vec::new(),
            third_party: Vec::new(),
            node_fields: IndexMap::new(),
            resolvers: Vec::new(),
            inferred_nested: IndexMap::new(),
            composed: IndexMap::new(),
            warnings: Vec::new(),
        };
        for extension in builtin_extensions() {
            composer.register_extension(extension);
        }
        composer
    }

    /// `"Type.field.path" → "Target[.targetField]"` links.
    pub fn with_mapping(mut self, mapping: IndexMap<String, String>) -> Self {
        self.mapping = mapping;
        self
    }

    /// Register a field extension. Reserved and already taken names are
    /// reported and the extension is ignored.
    pub fn register_extension(&mut self, extension: Arc<dyn FieldExtension>) {
        let name = extension.name().to_owned();
        if RESERVED_FIELD_DIRECTIVES.contains(&name.as_str()) {
            self.warn(format!("The field extension name `{name}` is reserved for internal use."));
        } else if self.extensions.contains_key(&name) {
            self.warn(format!("A field extension with the name `{name}` has already been registered."));
        } else {
            self.extensions.insert(name, extension);
        }
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    pub fn add_type_defs(&mut self, plugin: &str, defs: TypeDefs) -> Result<()> {
        let types: Vec<(TypeDef, bool)> = match defs {
            TypeDefs::Sdl(source) => parse_sdl(&source)?
                .types
                .into_iter()
                .map(|t| (t.def, t.is_extension))
                .collect(),
            TypeDefs::Types(types) => types.into_iter().map(|t| (t, false)).collect(),
        };
        for (def, is_extension) in types {
            self.user_types.push(UserType {
                plugin: plugin.to_owned(),
                def,
                is_extension,
            });
        }
        Ok(())
    }

    pub fn add_third_party_schema(&mut self, schema: ThirdPartySchema) {
        self.third_party.push(schema);
    }

    /// Fields from `setFieldsOnGraphQLNodeType`. A dotted name such as
    /// `frontmatter.published` adds to a nested type.
    pub fn add_node_fields(&mut self, type_name: &str, fields: IndexMap<String, FieldDef>) {
        self.node_fields
            .entry(type_name.to_owned())
            .or_default()
            .extend(fields);
    }

    pub fn add_resolvers(&mut self, plugin: &str, resolvers: ResolverMap) {
        self.resolvers.push((plugin.to_owned(), resolvers));
    }

    /// Problems found while composing that did not stop it.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Compose every type from scratch.
    pub fn compose(
        &mut self,
        nodes: &NodesByType,
        reporter: &mut TypeConflictReporter,
    ) -> Result<Schema> {
        let mut types = builtin_types();
        self.inferred_nested.clear();
        let scope: Scope = None;

        self.add_user_types(&mut types, &scope)?;
        self.add_inferred_types(&mut types, nodes, reporter, None)?;
        self.add_third_party_types(&mut types);
        self.finish_types(&mut types, &scope)?;
        self.add_custom_resolvers(&mut types, &scope);

        self.freeze(types)
    }

    /// Re-derive `SitePage` and its root fields; everything else is kept
    /// from the last composition.
    pub fn rebuild_site_page(
        &mut self,
        nodes: &NodesByType,
        reporter: &mut TypeConflictReporter,
    ) -> Result<Schema> {
        if self.composed.is_empty() {
            return Err(Error::SchemaNotBuilt);
        }
        let mut types = self.composed.clone();

        let mut scope: IndexSet<String> = IndexSet::from([SITE_PAGE_TYPE.to_owned()]);
        if let Some(nested) = self.inferred_nested.shift_remove(SITE_PAGE_TYPE) {
            scope.extend(nested);
        }
        for name in &scope {
            types.shift_remove(name);
        }
        if let Some(TypeDef::Object(query)) = types.get_mut(QUERY_TYPE) {
            let (all, one) = root_field_names(SITE_PAGE_TYPE);
            query.fields.shift_remove(&all);
            query.fields.shift_remove(&one);
        }

        let mut scope = Some(scope);
        self.add_user_types(&mut types, &scope)?;
        let nested = self.add_inferred_types(&mut types, nodes, reporter, Some(SITE_PAGE_TYPE))?;
        if let Some(scope) = scope.as_mut() {
            scope.extend(nested);
        }
        self.finish_types(&mut types, &scope)?;

        // Root fields for pages were re-derived too.
        if let Some(scope) = scope.as_mut() {
            scope.insert(QUERY_TYPE.to_owned());
        }
        self.add_custom_resolvers(&mut types, &scope);

        self.freeze(types)
    }

    fn finish_types(&mut self, types: &mut IndexMap<String, TypeDef>, scope: &Scope) -> Result<()> {
        add_node_interface_fields(types, scope);
        self.add_set_fields(types, scope);
        self.apply_mapping(types, scope);
        self.apply_extensions(types, scope);
        add_root_fields(types, scope)
    }

    fn freeze(&mut self, types: IndexMap<String, TypeDef>) -> Result<Schema> {
        validate(&types)?;
        self.composed = types.clone();
        Ok(Schema::new(types, QUERY_TYPE))
    }

    fn add_user_types(&self, types: &mut IndexMap<String, TypeDef>, scope: &Scope) -> Result<()> {
        let mut ordered: Vec<&UserType> = self
            .user_types
            .iter()
            .filter(|u| in_scope(scope, u.def.name()))
            .collect();
        ordered.sort_by_key(|u| u.plugin == DEFAULT_SITE_PLUGIN);

        for user in ordered {
            let name = user.def.name().to_owned();
            match types.get_mut(&name) {
                None => {
                    types.insert(name, user.def.clone());
                }
                Some(existing) => merge_type(existing, user.def.clone())?,
            }
            tracing::debug!(type_name = user.def.name(), plugin = %user.plugin, extension = user.is_extension, "added user type");
        }
        Ok(())
    }

    /// Infer node types and merge them in. Returns the nested type names.
    fn add_inferred_types(
        &mut self,
        types: &mut IndexMap<String, TypeDef>,
        nodes: &NodesByType,
        reporter: &mut TypeConflictReporter,
        only: Option<&str>,
    ) -> Result<Vec<String>> {
        let link_types: HashMap<String, String> = nodes
            .values()
            .flatten()
            .map(|n| (n.id.clone(), n.type_name().to_owned()))
            .collect();

        let mut all_nested = Vec::new();
        for (type_name, list) in nodes {
            if only.is_some_and(|o| o != type_name.as_str()) || list.is_empty() {
                continue;
            }
            let dont_infer = matches!(types.get(type_name), Some(TypeDef::Object(o)) if o.dont_infer);
            if dont_infer {
                ensure_node_interface(types, type_name);
                continue;
            }

            let inferred = TypeInferrer::new(&link_types, reporter).infer(type_name, list);
            let mut nested = Vec::new();
            for (i, object) in inferred.into_iter().enumerate() {
                if i == 0 {
                    merge_inferred(types, object.with_interface(NODE_INTERFACE))?;
                } else {
                    nested.push(object.name.clone());
                    merge_inferred(types, object)?;
                }
            }
            tracing::debug!(type_name = %type_name, nodes = list.len(), nested = nested.len(), "inferred type");
            all_nested.extend(nested.iter().cloned());
            self.inferred_nested.insert(type_name.clone(), nested);
        }
        Ok(all_nested)
    }

    fn add_third_party_types(&mut self, types: &mut IndexMap<String, TypeDef>) {
        let mut warnings = Vec::new();
        for schema in &self.third_party {
            let root = schema.query_type();
            for def in schema.types() {
                let mut def = def.clone();
                def.rename_refs(root, QUERY_TYPE);

                if def.name() == root {
                    let (Some(fields), Some(TypeDef::Object(query))) = (def.fields(), types.get_mut(QUERY_TYPE)) else {
                        continue;
                    };
                    for (name, field) in fields {
                        query.fields.insert(name.clone(), field.clone());
                    }
                } else if types.contains_key(def.name()) {
                    if !STANDARD_SCALARS.contains(&def.name()) {
                        warnings.push(format!(
                            "Third-party type `{}` is already defined; keeping the existing definition.",
                            def.name()
                        ));
                    }
                } else {
                    types.insert(def.name().to_owned(), def);
                }
            }
        }
        for warning in warnings {
            self.warn(warning);
        }
    }

    fn add_set_fields(&mut self, types: &mut IndexMap<String, TypeDef>, scope: &Scope) {
        let mut warnings = Vec::new();
        for (type_name, fields) in &self.node_fields {
            if !in_scope(scope, type_name) {
                continue;
            }
            for (path, field) in fields {
                let (parent_path, name) = match path.rsplit_once('.') {
                    Some((parent, name)) => (Some(parent), name),
                    None => (None, path.as_str()),
                };
                let target = match parent_path {
                    Some(parent) => nested_type_name(types, type_name, parent),
                    None => Some(type_name.clone()),
                };
                let Some(TypeDef::Object(object)) = target.and_then(|t| types.get_mut(&t)) else {
                    warnings.push(format!("Cannot add field `{path}` to `{type_name}`: no such object type."));
                    continue;
                };
                let mut field = field.clone();
                field.name = name.to_owned();
                object.fields.insert(field.name.clone(), field);
            }
        }
        for warning in warnings {
            self.warn(warning);
        }
    }

    fn apply_mapping(&mut self, types: &mut IndexMap<String, TypeDef>, scope: &Scope) {
        let mut warnings = Vec::new();
        for (key, target) in &self.mapping {
            let Some((type_name, path)) = key.split_once('.') else {
                warnings.push(format!("Invalid mapping `{key}`: expected `Type.field`."));
                continue;
            };
            if !in_scope(scope, type_name) {
                continue;
            }
            let (target_type, by) = target.split_once('.').unwrap_or((target.as_str(), "id"));
            if !types.contains_key(target_type) {
                warnings.push(format!("Mapping `{key}` points at unknown type `{target_type}`."));
                continue;
            }
            let (parent, field_name) = match path.rsplit_once('.') {
                Some((parent, name)) => (nested_type_name(types, type_name, parent), name),
                None => (Some(type_name.to_owned()), path),
            };
            let field = parent
                .and_then(|p| types.get_mut(&p))
                .and_then(TypeDef::fields_mut)
                .and_then(|fields| fields.get_mut(field_name));
            let Some(field) = field else {
                warnings.push(format!("Mapping `{key}` points at a missing field."));
                continue;
            };

            let named = TypeRef::named(target_type);
            field.ty = if field.ty.is_list() { TypeRef::list(named) } else { named };
            field.extensions.shift_remove("dateformat");
            let mut options = Map::new();
            options.insert("by".into(), Value::String(by.to_owned()));
            field.extensions.insert("link".into(), options);
        }
        for warning in warnings {
            self.warn(warning);
        }
    }

    fn apply_extensions(&mut self, types: &mut IndexMap<String, TypeDef>, scope: &Scope) {
        let mut warnings = Vec::new();
        for def in types.values_mut() {
            let type_name = def.name().to_owned();
            if !in_scope(scope, &type_name) {
                continue;
            }
            let Some(fields) = def.fields_mut() else {
                continue;
            };
            for field in fields.values_mut() {
                let applied = std::mem::take(&mut field.extensions);
                for (name, options) in applied {
                    match self.extensions.get(&name) {
                        Some(extension) => {
                            *field = extension.extend(&options, field);
                            field.extensions.insert(name, options);
                        }
                        None if RESERVED_FIELD_DIRECTIVES.contains(&name.as_str()) => {
                            field.extensions.insert(name, options);
                        }
                        None => warnings.push(format!(
                            "Field extension `{name}` on `{type_name}.{}` is not available.",
                            field.name
                        )),
                    }
                }
            }
        }
        for warning in warnings {
            self.warn(warning);
        }
    }

    fn add_custom_resolvers(&mut self, types: &mut IndexMap<String, TypeDef>, scope: &Scope) {
        let mut warnings = Vec::new();
        for (plugin, map) in &self.resolvers {
            for (type_name, configs) in map.iter().filter(|(name, _)| in_scope(scope, name)) {
                let Some(fields) = types.get_mut(type_name).and_then(TypeDef::fields_mut) else {
                    warnings.push(format!(
                        "`createResolvers` passed resolvers for type `{type_name}` that doesn't exist in the schema. \
                         Use `createTypes` to add the type before adding resolvers."
                    ));
                    continue;
                };
                for (field_name, config) in configs {
                    match fields.get_mut(field_name) {
                        Some(field) => {
                            if let Some(ty) = &config.ty {
                                field.ty = ty.clone();
                            }
                            for arg in &config.args {
                                field.args.insert(arg.name.clone(), arg.clone());
                            }
                            field.resolver = FieldResolver::Computed(config.resolver.clone());
                            field.node_query = None;
                        }
                        None => match &config.ty {
                            Some(ty) => {
                                let mut field = FieldDef::new(field_name.clone(), ty.clone())
                                    .with_resolver(config.resolver.clone());
                                for arg in &config.args {
                                    field.args.insert(arg.name.clone(), arg.clone());
                                }
                                fields.insert(field_name.clone(), field);
                            }
                            None => warnings.push(format!(
                                "`createResolvers` passed a resolver for new field `{type_name}.{field_name}` without a type."
                            )),
                        },
                    }
                }
                tracing::debug!(plugin = %plugin, type_name = %type_name, "added custom resolvers");
            }
        }
        for warning in warnings {
            self.warn(warning);
        }
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

fn builtin_types() -> IndexMap<String, TypeDef> {
    let mut types = IndexMap::new();
    let mut add = |def: TypeDef| {
        types.insert(def.name().to_owned(), def);
    };

    for name in STANDARD_SCALARS {
        add(TypeDef::Scalar(ScalarType {
            name: name.to_owned(),
            description: None,
        }));
    }
    add(TypeDef::Scalar(ScalarType {
        name: "Date".into(),
        description: Some("A date string, such as 2007-12-03, compliant with the ISO 8601 standard.".into()),
    }));
    add(TypeDef::Scalar(ScalarType {
        name: "JSON".into(),
        description: Some("Arbitrary JSON value.".into()),
    }));
    add(TypeDef::Object(ObjectType {
        name: QUERY_TYPE.into(),
        ..ObjectType::default()
    }));
    add(TypeDef::Interface(InterfaceType {
        name: NODE_INTERFACE.into(),
        description: Some("Node Interface".into()),
        interfaces: Vec::new(),
        fields: node_interface_fields().into_iter().map(|f| (f.name.clone(), f)).collect(),
        resolve_type: Some(TypeResolver::new(|value| {
            value
                .get("internal")?
                .get("type")?
                .as_str()
                .map(str::to_owned)
        })),
    }));
    add(TypeDef::Object(
        ObjectType::new("Internal")
            .with_field(FieldDef::new("type", TypeRef::named("String").non_null()))
            .with_field(FieldDef::new("contentDigest", TypeRef::named("String").non_null()))
            .with_field(FieldDef::new("owner", TypeRef::named("String").non_null()))
            .with_field(FieldDef::new("mediaType", TypeRef::named("String"))),
    ));
    types
}

fn node_interface_fields() -> Vec<FieldDef> {
    let node = || TypeRef::named(NODE_INTERFACE);
    vec![
        FieldDef::new("id", TypeRef::named("ID").non_null()),
        FieldDef::new("parent", node()).with_extension("link", Map::new()),
        FieldDef::new("children", TypeRef::list(node().non_null()).non_null())
            .with_extension("link", Map::new()),
        FieldDef::new("internal", TypeRef::named("Internal").non_null()),
    ]
}

fn merge_inferred(types: &mut IndexMap<String, TypeDef>, inferred: ObjectType) -> Result<()> {
    match types.get_mut(&inferred.name) {
        None => {
            types.insert(inferred.name.clone(), TypeDef::Object(inferred));
        }
        Some(TypeDef::Object(existing)) => {
            for interface in inferred.interfaces {
                if !existing.implements(&interface) {
                    existing.interfaces.push(interface);
                }
            }
            if !existing.dont_infer {
                for (name, field) in inferred.fields {
                    existing.fields.entry(name).or_insert(field);
                }
            }
        }
        Some(other) => {
            return Err(Error::InvalidSchema(format!(
                "node type `{}` is already defined as {}",
                inferred.name,
                other.kind_name()
            )));
        }
    }
    Ok(())
}

fn merge_type(existing: &mut TypeDef, incoming: TypeDef) -> Result<()> {
    match (existing, incoming) {
        (TypeDef::Object(old), TypeDef::Object(new)) => {
            merge_interfaces(&mut old.interfaces, new.interfaces);
            old.fields.extend(new.fields);
            old.dont_infer |= new.dont_infer;
            old.description = new.description.or(old.description.take());
        }
        (TypeDef::Interface(old), TypeDef::Interface(new)) => {
            merge_interfaces(&mut old.interfaces, new.interfaces);
            old.fields.extend(new.fields);
            old.description = new.description.or(old.description.take());
            old.resolve_type = new.resolve_type.or(old.resolve_type.take());
        }
        (TypeDef::Union(old), TypeDef::Union(new)) => {
            merge_interfaces(&mut old.members, new.members);
            old.resolve_type = new.resolve_type.or(old.resolve_type.take());
        }
        (TypeDef::Enum(old), TypeDef::Enum(new)) => merge_interfaces(&mut old.values, new.values),
        (TypeDef::InputObject(old), TypeDef::InputObject(new)) => old.fields.extend(new.fields),
        (TypeDef::Scalar(old), TypeDef::Scalar(new)) => {
            old.description = new.description.or(old.description.take());
        }
        (old, new) => {
            return Err(Error::InvalidSchema(format!(
                "`{}` is defined as both {} and {}",
                old.name(),
                old.kind_name(),
                new.kind_name()
            )));
        }
    }
    Ok(())
}

fn merge_interfaces(into: &mut Vec<String>, from: Vec<String>) {
    for name in from {
        if !into.contains(&name) {
            into.push(name);
        }
    }
}

fn ensure_node_interface(types: &mut IndexMap<String, TypeDef>, type_name: &str) {
    if let Some(TypeDef::Object(object)) = types.get_mut(type_name)
        && !object.implements(NODE_INTERFACE)
    {
        object.interfaces.push(NODE_INTERFACE.to_owned());
    }
}

/// Put the `Node` interface fields first on every node type, keeping any
/// the type declares itself.
fn add_node_interface_fields(types: &mut IndexMap<String, TypeDef>, scope: &Scope) {
    for def in types.values_mut() {
        let TypeDef::Object(object) = def else {
            continue;
        };
        if !object.implements(NODE_INTERFACE) || !in_scope(scope, &object.name) {
            continue;
        }
        let mut fields = IndexMap::with_capacity(object.fields.len() + 4);
        for field in node_interface_fields() {
            let field = object.fields.shift_remove(&field.name).unwrap_or(field);
            fields.insert(field.name.clone(), field);
        }
        fields.extend(std::mem::take(&mut object.fields));
        object.fields = fields;
    }
}

fn root_field_names(type_name: &str) -> (String, String) {
    (format!("all{type_name}"), to_camel_case(type_name))
}

fn add_root_fields(types: &mut IndexMap<String, TypeDef>, scope: &Scope) -> Result<()> {
    let node_types: Vec<String> = types
        .values()
        .filter_map(TypeDef::as_object)
        .filter(|o| o.implements(NODE_INTERFACE) && in_scope(scope, &o.name))
        .map(|o| o.name.clone())
        .collect();
    let Some(TypeDef::Object(query)) = types.get_mut(QUERY_TYPE) else {
        return Err(Error::InvalidSchema(format!("`{QUERY_TYPE}` must be an object type")));
    };

    for type_name in node_types {
        let (all, one) = root_field_names(&type_name);
        let list = TypeRef::list(TypeRef::named(&type_name).non_null()).non_null();
        let mut all_field = FieldDef::new(all.clone(), list)
            .with_arg(ArgDef::new("limit", TypeRef::named("Int")))
            .with_arg(ArgDef::new("skip", TypeRef::named("Int")));
        all_field.node_query = Some(NodeQuery {
            type_name: type_name.clone(),
            first_only: false,
        });
        let mut one_field = FieldDef::new(one.clone(), TypeRef::named(&type_name))
            .with_arg(ArgDef::new("id", TypeRef::named("String")));
        one_field.node_query = Some(NodeQuery {
            type_name: type_name.clone(),
            first_only: true,
        });

        query.fields.entry(all).or_insert(all_field);
        query.fields.entry(one).or_insert(one_field);
    }
    Ok(())
}

/// Type of the object field at `path` below `type_name`.
fn nested_type_name(types: &IndexMap<String, TypeDef>, type_name: &str, path: &str) -> Option<String> {
    path.split('.').try_fold(type_name.to_owned(), |current, segment| {
        let field = types.get(&current)?.fields()?.get(segment)?;
        Some(field.ty.named_type().to_owned())
    })
}

fn validate(types: &IndexMap<String, TypeDef>) -> Result<()> {
    if !matches!(types.get(QUERY_TYPE), Some(TypeDef::Object(_))) {
        return Err(Error::InvalidSchema(format!("`{QUERY_TYPE}` must be an object type")));
    }
    for def in types.values() {
        for referenced in def.referenced_types() {
            if !types.contains_key(referenced) {
                return Err(Error::InvalidSchema(format!(
                    "`{}` refers to unknown type `{}`",
                    def.name(),
                    referenced
                )));
            }
        }
        let interfaces = match def {
            TypeDef::Object(t) => t.interfaces.as_slice(),
            TypeDef::Interface(t) => t.interfaces.as_slice(),
            _ => &[],
        };
        for interface in interfaces {
            if !matches!(types.get(interface), Some(TypeDef::Interface(_))) {
                return Err(Error::InvalidSchema(format!(
                    "`{}` implements `{}`, which is not an interface",
                    def.name(),
                    interface
                )));
            }
        }
        if let TypeDef::Union(union) = def
            && let Some(member) = union
                .members
                .iter()
                .find(|m| !matches!(types.get(m.as_str()), Some(TypeDef::Object(_))))
        {
            return Err(Error::InvalidSchema(format!(
                "union `{}` member `{}` is not an object type",
                union.name, member
            )));
        }
    }
    Ok(())
}
