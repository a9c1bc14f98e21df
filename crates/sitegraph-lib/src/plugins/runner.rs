//! Calls schema hooks on the plugins that export them.

use std::sync::Arc;

use indexmap::IndexMap;
use sitegraph_core::Node;

use super::apis::{ApiEnv, CREATE_RESOLVERS, CREATE_SCHEMA_CUSTOMIZATION, SET_FIELDS_ON_GRAPHQL_NODE_TYPE};
use super::{FlattenedPlugin, PluginError, SchemaCustomization};
use crate::schema::FieldDef;
use crate::schema::composer::ResolverMap;
use crate::{Error, Result};

/// Runs hooks in flattened plugin order. The first failing plugin stops the run.
#[derive(Debug, Clone, Default)]
pub struct ApiRunner {
    plugins: Vec<FlattenedPlugin>,
}

impl ApiRunner {
    pub fn new(plugins: Vec<FlattenedPlugin>) -> Self {
        Self { plugins }
    }

    pub fn plugins(&self) -> &[FlattenedPlugin] {
        &self.plugins
    }

    fn implementing(&self, api: &'static str) -> impl Iterator<Item = &FlattenedPlugin> {
        self.plugins.iter().filter(move |p| p.implements(ApiEnv::Node, api))
    }

    pub async fn create_schema_customization(&self) -> Result<Vec<(String, SchemaCustomization)>> {
        let mut out = Vec::new();
        for entry in self.implementing(CREATE_SCHEMA_CUSTOMIZATION) {
            tracing::debug!(plugin = %entry.name, "running {CREATE_SCHEMA_CUSTOMIZATION}");
            let customization = entry
                .plugin
                .create_schema_customization()
                .await
                .map_err(|e| plugin_error(entry, CREATE_SCHEMA_CUSTOMIZATION, e))?;
            out.push((entry.name.clone(), customization));
        }
        Ok(out)
    }

    /// Fields from every plugin, later plugins overriding earlier ones.
    pub async fn set_fields_on_graphql_node_type(
        &self,
        type_name: &str,
        nodes: &[Arc<Node>],
    ) -> Result<IndexMap<String, FieldDef>> {
        let mut fields = IndexMap::new();
        for entry in self.implementing(SET_FIELDS_ON_GRAPHQL_NODE_TYPE) {
            tracing::debug!(plugin = %entry.name, type_name, "running {SET_FIELDS_ON_GRAPHQL_NODE_TYPE}");
            let added = entry
                .plugin
                .set_fields_on_graphql_node_type(type_name, nodes)
                .await
                .map_err(|e| plugin_error(entry, SET_FIELDS_ON_GRAPHQL_NODE_TYPE, e))?;
            fields.extend(added);
        }
        Ok(fields)
    }

    pub async fn create_resolvers(&self) -> Result<Vec<(String, ResolverMap)>> {
        let mut out = Vec::new();
        for entry in self.implementing(CREATE_RESOLVERS) {
            tracing::debug!(plugin = %entry.name, "running {CREATE_RESOLVERS}");
            let resolvers = entry
                .plugin
                .create_resolvers()
                .await
                .map_err(|e| plugin_error(entry, CREATE_RESOLVERS, e))?;
            out.push((entry.name.clone(), resolvers));
        }
        Ok(out)
    }
}

fn plugin_error(entry: &FlattenedPlugin, api: &str, err: PluginError) -> Error {
    tracing::error!(plugin = %entry.name, api, "{err}");
    Error::Plugin {
        plugin: entry.name.clone(),
        api: api.to_owned(),
        message: err.to_string(),
    }
}
