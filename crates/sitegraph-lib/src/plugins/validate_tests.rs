use std::sync::Arc;

use super::apis::{ApiEnv, REPLACE_RENDERER};
use super::{
    Plugin, PluginExports, RendererConflict, collate_plugin_apis, handle_bad_exports,
    handle_multiple_replace_renderers,
};
use crate::schema::composer::DEFAULT_SITE_PLUGIN;

struct Exporting {
    name: &'static str,
    exports: PluginExports,
}

impl Plugin for Exporting {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> &str {
        "2.1.0"
    }

    fn exports(&self) -> PluginExports {
        self.exports.clone()
    }
}

fn plugin(name: &'static str, exports: PluginExports) -> Arc<dyn Plugin> {
    Arc::new(Exporting { name, exports })
}

fn renderer(name: &'static str) -> Arc<dyn Plugin> {
    plugin(name, PluginExports::default().ssr([REPLACE_RENDERER]))
}

#[test]
fn known_apis_are_collated() {
    let plugins = vec![plugin(
        "gatsby-source-filesystem",
        PluginExports::default()
            .node(["sourceNodes", "onCreateNode", "sourceNodes"])
            .browser(["onRouteUpdate"])
            .ssr(["onRenderBody"]),
    )];

    let (flattened, bad) = collate_plugin_apis(&plugins);

    assert!(bad.is_empty());
    assert_eq!(flattened.len(), 1);
    let entry = &flattened[0];
    assert_eq!(entry.name, "gatsby-source-filesystem");
    assert_eq!(entry.version, "2.1.0");
    assert_eq!(entry.node_apis, ["sourceNodes", "onCreateNode"]);
    assert_eq!(entry.browser_apis, ["onRouteUpdate"]);
    assert_eq!(entry.ssr_apis, ["onRenderBody"]);
    assert!(entry.implements(ApiEnv::Node, "onCreateNode"));
    assert!(!entry.implements(ApiEnv::Browser, "onCreateNode"));
    assert!(!entry.skip_ssr);
}

#[test]
fn unknown_exports_are_reported_with_a_suggestion() {
    let plugins = vec![plugin(
        "gatsby-plugin-typo",
        PluginExports::default()
            .node(["onCreateNod", "sourceNodes"])
            .browser(["zzz"]),
    )];

    let (flattened, bad) = collate_plugin_apis(&plugins);

    assert_eq!(flattened[0].node_apis, ["sourceNodes"]);
    assert!(flattened[0].browser_apis.is_empty());
    assert_eq!(bad.len(), 2);
    assert_eq!(bad[0].env, ApiEnv::Node);
    assert_eq!(bad[0].export_name, "onCreateNod");
    assert_eq!(bad[1].env, ApiEnv::Browser);

    let warnings = handle_bad_exports(&bad);
    assert_eq!(
        warnings,
        [
            "Plugin \"gatsby-plugin-typo@2.1.0\" is exporting a variable named \"onCreateNod\" \
             which isn't an API of the node environment. Did you mean to export \"onCreateNode\"?",
            "Plugin \"gatsby-plugin-typo@2.1.0\" is exporting a variable named \"zzz\" \
             which isn't an API of the browser environment.",
        ]
    );
}

#[test]
fn single_renderer_is_left_alone() {
    let (mut flattened, _) = collate_plugin_apis(&[renderer("plugin-a"), plugin("plugin-b", PluginExports::default())]);

    assert_eq!(handle_multiple_replace_renderers(&mut flattened), None);
    assert!(flattened.iter().all(|p| !p.skip_ssr));
}

#[test]
fn competing_plugin_renderers_are_an_error() {
    let (mut flattened, _) = collate_plugin_apis(&[renderer("plugin-a"), renderer("plugin-b")]);

    let conflict = handle_multiple_replace_renderers(&mut flattened).unwrap();

    assert_eq!(
        conflict,
        RendererConflict::Error(
            "replaceRenderer API found in these plugins: plugin-a, plugin-b. \
             Only one plugin may implement it; \"plugin-b\" will be used."
                .to_owned()
        )
    );
    assert!(flattened[0].skip_ssr);
    assert!(!flattened[1].skip_ssr);
}

#[test]
fn site_renderer_overrides_plugins_with_a_warning() {
    let (mut flattened, _) = collate_plugin_apis(&[
        renderer("plugin-a"),
        plugin("plugin-b", PluginExports::default()),
        renderer(DEFAULT_SITE_PLUGIN),
    ]);

    let conflict = handle_multiple_replace_renderers(&mut flattened).unwrap();

    assert!(matches!(conflict, RendererConflict::Warning(_)));
    assert_eq!(
        conflict.message(),
        format!(
            "replaceRenderer API found in these plugins: plugin-a, {DEFAULT_SITE_PLUGIN}. \
             The site's own replaceRenderer overrides the ones from plugins."
        )
    );
    let skipped: Vec<_> = flattened.iter().map(|p| p.skip_ssr).collect();
    assert_eq!(skipped, [true, false, false]);
}
