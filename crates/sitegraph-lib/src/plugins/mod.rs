//! Plugins and the schema hooks they implement.
//!
//! A site declares plugins, and plugins may declare sub-plugins. Before the
//! schema build the declaration tree is flattened, each plugin's exports are
//! checked against the known API lists, and the [`ApiRunner`] later calls the
//! schema hooks on every plugin that exports them.

pub mod apis;
mod runner;
mod validate;

#[cfg(test)]
mod mod_tests;
#[cfg(test)]
mod validate_tests;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use sitegraph_core::Node;

pub use apis::ApiEnv;
pub use runner::ApiRunner;
pub use validate::{
    BadExport, RendererConflict, collate_plugin_apis, handle_bad_exports,
    handle_multiple_replace_renderers,
};

use crate::schema::composer::{ResolverMap, TypeDefs};
use crate::schema::{FieldDef, FieldExtension, ThirdPartySchema};

/// A hook failure, reported with the plugin and hook names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PluginError(pub String);

impl PluginError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// API names a plugin exports, per environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginExports {
    pub node: Vec<String>,
    pub browser: Vec<String>,
    pub ssr: Vec<String>,
}

impl PluginExports {
    pub fn node<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn browser<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.browser.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn ssr<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ssr.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn get(&self, env: ApiEnv) -> &[String] {
        match env {
            ApiEnv::Node => &self.node,
            ApiEnv::Browser => &self.browser,
            ApiEnv::Ssr => &self.ssr,
        }
    }
}

/// What `createSchemaCustomization` hands back.
#[derive(Clone, Default)]
pub struct SchemaCustomization {
    pub type_defs: Vec<TypeDefs>,
    pub third_party: Vec<ThirdPartySchema>,
    pub extensions: Vec<Arc<dyn FieldExtension>>,
}

impl SchemaCustomization {
    pub fn with_type_defs(mut self, defs: TypeDefs) -> Self {
        self.type_defs.push(defs);
        self
    }

    pub fn with_third_party(mut self, schema: ThirdPartySchema) -> Self {
        self.third_party.push(schema);
        self
    }

    pub fn with_extension(mut self, extension: Arc<dyn FieldExtension>) -> Self {
        self.extensions.push(extension);
        self
    }
}

/// A site plugin.
///
/// Hooks are only called when their API name is listed in [`Plugin::exports`].
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn exports(&self) -> PluginExports {
        PluginExports::default()
    }

    /// Sub-plugins declared in this plugin's options.
    fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        Vec::new()
    }

    async fn create_schema_customization(&self) -> Result<SchemaCustomization, PluginError> {
        Ok(SchemaCustomization::default())
    }

    /// Extra fields for node type `type_name`. Dotted names add to nested types.
    async fn set_fields_on_graphql_node_type(
        &self,
        _type_name: &str,
        _nodes: &[Arc<Node>],
    ) -> Result<IndexMap<String, FieldDef>, PluginError> {
        Ok(IndexMap::new())
    }

    async fn create_resolvers(&self) -> Result<ResolverMap, PluginError> {
        Ok(ResolverMap::new())
    }
}

/// A plugin lifted to the top level, with the APIs it implements.
#[derive(Clone)]
pub struct FlattenedPlugin {
    pub plugin: Arc<dyn Plugin>,
    pub name: String,
    pub version: String,
    pub node_apis: Vec<String>,
    pub browser_apis: Vec<String>,
    pub ssr_apis: Vec<String>,
    /// Set when another plugin's `replaceRenderer` takes precedence.
    pub skip_ssr: bool,
}

impl FlattenedPlugin {
    pub fn new(plugin: Arc<dyn Plugin>) -> Self {
        Self {
            name: plugin.name().to_owned(),
            version: plugin.version().to_owned(),
            plugin,
            node_apis: Vec::new(),
            browser_apis: Vec::new(),
            ssr_apis: Vec::new(),
            skip_ssr: false,
        }
    }

    pub fn implements(&self, env: ApiEnv, api: &str) -> bool {
        let apis = match env {
            ApiEnv::Node => &self.node_apis,
            ApiEnv::Browser => &self.browser_apis,
            ApiEnv::Ssr => &self.ssr_apis,
        };
        apis.iter().any(|a| a == api)
    }
}

impl fmt::Debug for FlattenedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlattenedPlugin")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("node_apis", &self.node_apis)
            .field("browser_apis", &self.browser_apis)
            .field("ssr_apis", &self.ssr_apis)
            .field("skip_ssr", &self.skip_ssr)
            .finish()
    }
}

/// Every plugin and sub-plugin, depth-first in declaration order.
pub fn flatten_plugins(plugins: &[Arc<dyn Plugin>]) -> Vec<Arc<dyn Plugin>> {
    fn extract(plugin: &Arc<dyn Plugin>, out: &mut Vec<Arc<dyn Plugin>>) {
        for sub in plugin.plugins() {
            out.push(sub.clone());
            extract(&sub, out);
        }
    }

    let mut out = Vec::new();
    for plugin in plugins {
        out.push(plugin.clone());
        extract(plugin, &mut out);
    }
    out
}
