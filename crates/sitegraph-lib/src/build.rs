//! The schema build.
//!
//! [`build`] runs the plugin schema hooks, composes the schema from the
//! current node store and installs it in the [`BuildContext`]. Once pages
//! exist, [`rebuild_with_site_page`] re-derives the `SitePage` type alone.
//! Both clear the resolver caches, since resolved values depend on the schema.

use std::sync::Arc;

use sitegraph_core::Node;
use tokio::sync::{Mutex, RwLock};
use tracing::{Instrument, Span};

use crate::config::SiteConfig;
use crate::infer::{TypeConflict, TypeConflictReporter};
use crate::plugins::{
    ApiRunner, Plugin, RendererConflict, collate_plugin_apis, flatten_plugins, handle_bad_exports,
    handle_multiple_replace_renderers,
};
use crate::query::{Executor, QueryCompiler};
use crate::resolve::{NodeResolver, ResolverCache};
use crate::schema::composer::{NodesByType, SITE_PAGE_TYPE};
use crate::schema::{ResolverContext, Schema, SchemaComposer};
use crate::store::{NodeStore, NodeTracker};
use crate::{Error, Result};

/// What a build found that did not stop it.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub conflicts: Vec<TypeConflict>,
    /// Bad plugin exports and composition warnings, in the order they arose.
    pub warnings: Vec<String>,
    pub renderer_conflict: Option<RendererConflict>,
}

/// Everything a build shares: the node store, caches, plugins and the
/// current schema.
pub struct BuildContext {
    config: SiteConfig,
    plugins: Vec<Arc<dyn Plugin>>,
    store: Arc<NodeStore>,
    tracker: Arc<NodeTracker>,
    cache: Arc<ResolverCache>,
    composer: Mutex<Option<SchemaComposer>>,
    runner: RwLock<ApiRunner>,
    schema: RwLock<Option<Arc<Schema>>>,
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(SiteConfig::default())
    }
}

impl BuildContext {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            plugins: Vec::new(),
            store: Arc::new(NodeStore::new()),
            tracker: Arc::new(NodeTracker::new()),
            cache: Arc::new(ResolverCache::new()),
            composer: Mutex::new(None),
            runner: RwLock::new(ApiRunner::default()),
            schema: RwLock::new(None),
        }
    }

    /// Add a site-level plugin. Sub-plugins are found at build time.
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_store(mut self, store: Arc<NodeStore>) -> Self {
        self.store = store;
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<NodeStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<ResolverCache> {
        &self.cache
    }

    pub fn tracker(&self) -> &Arc<NodeTracker> {
        &self.tracker
    }

    pub async fn create_node(&self, node: Node) -> Result<Arc<Node>> {
        Ok(self.store.create_node(node).await?)
    }

    /// The runner from the last build; empty before the first one.
    pub async fn api_runner(&self) -> ApiRunner {
        self.runner.read().await.clone()
    }

    pub async fn schema(&self) -> Option<Arc<Schema>> {
        self.schema.read().await.clone()
    }

    pub async fn node_resolver(&self) -> Result<NodeResolver> {
        let schema = self.schema().await.ok_or(Error::SchemaNotBuilt)?;
        Ok(NodeResolver::new(
            schema,
            ResolverContext::new(self.store.clone()),
            self.cache.clone(),
            self.tracker.clone(),
        ))
    }

    pub async fn executor(&self) -> Result<Executor> {
        Ok(Executor::new(self.node_resolver().await?))
    }

    /// A compiler for the current schema, with the configured fuel limits.
    pub async fn query_compiler(&self) -> Result<QueryCompiler> {
        let schema = self.schema().await.ok_or(Error::SchemaNotBuilt)?;
        let mut compiler = QueryCompiler::new(schema);
        if let Some(fuel) = self.config.exec_fuel {
            compiler = compiler.with_exec_fuel(Some(fuel));
        }
        if let Some(fuel) = self.config.recursion_fuel {
            compiler = compiler.with_recursion_fuel(Some(fuel));
        }
        Ok(compiler)
    }

    async fn nodes_by_type(&self) -> NodesByType {
        let mut out = NodesByType::new();
        for type_name in self.store.types().await {
            let nodes = self.store.get_nodes_by_type(&type_name).await;
            out.insert(type_name, nodes);
        }
        out
    }

    async fn install(&self, schema: Schema) {
        self.cache.clear();
        self.tracker.clear();
        *self.schema.write().await = Some(Arc::new(schema));
    }
}

/// Build the schema from every stored node.
pub async fn build(ctx: &BuildContext, parent: Option<&Span>) -> Result<BuildReport> {
    let span = match parent {
        Some(parent) => tracing::info_span!(parent: parent, "build schema"),
        None => tracing::info_span!("build schema"),
    };
    build_schema(ctx).instrument(span).await
}

async fn build_schema(ctx: &BuildContext) -> Result<BuildReport> {
    let mut report = BuildReport::default();

    let (mut plugins, bad_exports) = collate_plugin_apis(&flatten_plugins(&ctx.plugins));
    report.warnings.extend(handle_bad_exports(&bad_exports));
    report.renderer_conflict = handle_multiple_replace_renderers(&mut plugins);
    let runner = ApiRunner::new(plugins);
    tracing::debug!(plugins = runner.plugins().len(), "collated plugins");

    let mut composer = SchemaComposer::new().with_mapping(ctx.config.mapping.clone());
    for (plugin, customization) in runner.create_schema_customization().await? {
        for extension in customization.extensions {
            composer.register_extension(extension);
        }
        for defs in customization.type_defs {
            composer.add_type_defs(&plugin, defs)?;
        }
        for schema in customization.third_party {
            composer.add_third_party_schema(schema);
        }
    }

    let nodes = ctx.nodes_by_type().await;
    for (type_name, list) in &nodes {
        let fields = runner.set_fields_on_graphql_node_type(type_name, list).await?;
        if !fields.is_empty() {
            composer.add_node_fields(type_name, fields);
        }
    }
    for (plugin, resolvers) in runner.create_resolvers().await? {
        composer.add_resolvers(&plugin, resolvers);
    }

    let mut reporter = TypeConflictReporter::new();
    let schema = composer.compose(&nodes, &mut reporter)?;
    reporter.print_conflicts();
    report.warnings.extend(composer.take_warnings());
    report.conflicts = reporter.into_conflicts();
    tracing::info!(
        types = schema.types().count(),
        conflicts = report.conflicts.len(),
        "schema built"
    );

    ctx.install(schema).await;
    *ctx.composer.lock().await = Some(composer);
    *ctx.runner.write().await = runner;
    Ok(report)
}

/// Re-derive `SitePage` from the current pages, keeping every other type.
pub async fn rebuild_with_site_page(ctx: &BuildContext, parent: Option<&Span>) -> Result<BuildReport> {
    let span = match parent {
        Some(parent) => tracing::info_span!(parent: parent, "rebuild schema with SitePage context"),
        None => tracing::info_span!("rebuild schema with SitePage context"),
    };
    async {
        let mut guard = ctx.composer.lock().await;
        let composer = guard.as_mut().ok_or(Error::SchemaNotBuilt)?;

        let site_pages = ctx.store.get_nodes_by_type(SITE_PAGE_TYPE).await;
        let fields = ctx
            .runner
            .read()
            .await
            .set_fields_on_graphql_node_type(SITE_PAGE_TYPE, &site_pages)
            .await?;
        if !fields.is_empty() {
            composer.add_node_fields(SITE_PAGE_TYPE, fields);
        }

        let mut pages = NodesByType::new();
        pages.insert(SITE_PAGE_TYPE.to_owned(), site_pages);
        let mut reporter = TypeConflictReporter::new();
        let schema = composer.rebuild_site_page(&pages, &mut reporter)?;
        reporter.print_conflicts();

        let report = BuildReport {
            warnings: composer.take_warnings(),
            conflicts: reporter.into_conflicts(),
            renderer_conflict: None,
        };
        ctx.install(schema).await;
        Ok::<_, Error>(report)
    }
    .instrument(span)
    .await
}
