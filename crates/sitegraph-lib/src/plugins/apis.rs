//! Known plugin API names.

use std::fmt;

/// Where an API runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiEnv {
    Node,
    Browser,
    Ssr,
}

impl ApiEnv {
    pub const ALL: [ApiEnv; 3] = [ApiEnv::Node, ApiEnv::Browser, ApiEnv::Ssr];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiEnv::Node => "node",
            ApiEnv::Browser => "browser",
            ApiEnv::Ssr => "ssr",
        }
    }

    pub fn known_apis(&self) -> &'static [&'static str] {
        match self {
            ApiEnv::Node => NODE_APIS,
            ApiEnv::Browser => BROWSER_APIS,
            ApiEnv::Ssr => SSR_APIS,
        }
    }

    pub fn is_known(&self, api: &str) -> bool {
        self.known_apis().contains(&api)
    }
}

impl fmt::Display for ApiEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const CREATE_SCHEMA_CUSTOMIZATION: &str = "createSchemaCustomization";
pub const SET_FIELDS_ON_GRAPHQL_NODE_TYPE: &str = "setFieldsOnGraphQLNodeType";
pub const CREATE_RESOLVERS: &str = "createResolvers";
pub const REPLACE_RENDERER: &str = "replaceRenderer";

pub const NODE_APIS: &[&str] = &[
    "onPreInit",
    "onPluginInit",
    "onPreBootstrap",
    "sourceNodes",
    "onCreateNode",
    "unstable_shouldOnCreateNode",
    CREATE_SCHEMA_CUSTOMIZATION,
    SET_FIELDS_ON_GRAPHQL_NODE_TYPE,
    CREATE_RESOLVERS,
    "createPages",
    "createPagesStatefully",
    "onCreatePage",
    "onPostBootstrap",
    "onPreExtractQueries",
    "onPreBuild",
    "onPostBuild",
    "onCreateWebpackConfig",
    "onCreateBabelConfig",
    "onCreateDevServer",
    "preprocessSource",
    "resolvableExtensions",
    "generateSideEffects",
    "pluginOptionsSchema",
];

pub const BROWSER_APIS: &[&str] = &[
    "onClientEntry",
    "onInitialClientRender",
    "onPreRouteUpdate",
    "onRouteUpdate",
    "onRouteUpdateDelayed",
    "onPrefetchPathname",
    "onPostPrefetchPathname",
    "disableCorePrefetching",
    "registerServiceWorker",
    "onServiceWorkerInstalled",
    "onServiceWorkerUpdateFound",
    "onServiceWorkerUpdateReady",
    "onServiceWorkerActive",
    "onServiceWorkerRedundant",
    "replaceHydrateFunction",
    "replaceComponentRenderer",
    "shouldUpdateScroll",
    "wrapPageElement",
    "wrapRootElement",
];

pub const SSR_APIS: &[&str] = &[
    REPLACE_RENDERER,
    "onRenderBody",
    "onPreRenderHTML",
    "wrapPageElement",
    "wrapRootElement",
];
