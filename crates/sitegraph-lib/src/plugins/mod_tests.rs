use std::sync::Arc;

use super::{ApiEnv, Plugin, PluginExports, flatten_plugins};

struct Named {
    name: &'static str,
    children: Vec<Arc<dyn Plugin>>,
}

impl Plugin for Named {
    fn name(&self) -> &str {
        self.name
    }

    fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.children.clone()
    }
}

fn plugin(name: &'static str, children: Vec<Arc<dyn Plugin>>) -> Arc<dyn Plugin> {
    Arc::new(Named { name, children })
}

#[test]
fn sub_plugins_follow_their_parent() {
    let site = vec![
        plugin(
            "gatsby-transformer-remark",
            vec![
                plugin("remark-images", vec![plugin("remark-images-zoom", vec![])]),
                plugin("remark-prism", vec![]),
            ],
        ),
        plugin("gatsby-source-filesystem", vec![]),
    ];

    let names: Vec<_> = flatten_plugins(&site)
        .iter()
        .map(|p| p.name().to_owned())
        .collect();

    assert_eq!(
        names,
        [
            "gatsby-transformer-remark",
            "remark-images",
            "remark-images-zoom",
            "remark-prism",
            "gatsby-source-filesystem",
        ]
    );
}

#[test]
fn exports_are_kept_per_environment() {
    let exports = PluginExports::default()
        .node(["sourceNodes", "createResolvers"])
        .browser(["onClientEntry"])
        .ssr(Vec::<String>::new());

    assert_eq!(exports.get(ApiEnv::Node), ["sourceNodes", "createResolvers"]);
    assert_eq!(exports.get(ApiEnv::Browser), ["onClientEntry"]);
    assert!(exports.get(ApiEnv::Ssr).is_empty());
}

#[test]
fn default_plugin_shape() {
    let p = plugin("plain", vec![]);

    assert_eq!(p.version(), "1.0.0");
    assert_eq!(p.exports(), PluginExports::default());
    assert!(p.plugins().is_empty());
}
