//! Checks on the flattened plugin list before the schema build.

use std::sync::Arc;

use sitegraph_core::utils::find_similar;

use super::apis::{ApiEnv, REPLACE_RENDERER};
use super::{FlattenedPlugin, Plugin};
use crate::schema::composer::DEFAULT_SITE_PLUGIN;

/// An export that is not a known API for its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadExport {
    pub env: ApiEnv,
    pub export_name: String,
    pub plugin_name: String,
    pub plugin_version: String,
}

/// Record the known APIs each plugin implements; unknown exports are
/// returned separately.
pub fn collate_plugin_apis(plugins: &[Arc<dyn Plugin>]) -> (Vec<FlattenedPlugin>, Vec<BadExport>) {
    let mut flattened = Vec::with_capacity(plugins.len());
    let mut bad = Vec::new();

    for plugin in plugins {
        let mut entry = FlattenedPlugin::new(plugin.clone());
        let exports = plugin.exports();
        for env in ApiEnv::ALL {
            let mut known = Vec::new();
            for name in exports.get(env) {
                if env.is_known(name) {
                    if !known.contains(name) {
                        known.push(name.clone());
                    }
                } else {
                    bad.push(BadExport {
                        env,
                        export_name: name.clone(),
                        plugin_name: entry.name.clone(),
                        plugin_version: entry.version.clone(),
                    });
                }
            }
            match env {
                ApiEnv::Node => entry.node_apis = known,
                ApiEnv::Browser => entry.browser_apis = known,
                ApiEnv::Ssr => entry.ssr_apis = known,
            }
        }
        flattened.push(entry);
    }
    (flattened, bad)
}

/// One warning per unknown export, with the closest known API when there is one.
pub fn handle_bad_exports(bad: &[BadExport]) -> Vec<String> {
    let mut warnings = Vec::with_capacity(bad.len());
    for export in bad {
        let mut message = format!(
            "Plugin \"{}@{}\" is exporting a variable named \"{}\" which isn't an API of the {} environment.",
            export.plugin_name, export.plugin_version, export.export_name, export.env
        );
        let max_distance = (export.export_name.len() / 3).max(2);
        if let Some(similar) = find_similar(&export.export_name, export.env.known_apis(), max_distance) {
            message.push_str(&format!(" Did you mean to export \"{similar}\"?"));
        }
        tracing::warn!(plugin = %export.plugin_name, export = %export.export_name, "{message}");
        warnings.push(message);
    }
    warnings
}

/// How a `replaceRenderer` collision was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererConflict {
    /// The site overrides plugin renderers; expected, so only a warning.
    Warning(String),
    Error(String),
}

impl RendererConflict {
    pub fn message(&self) -> &str {
        match self {
            RendererConflict::Warning(m) | RendererConflict::Error(m) => m,
        }
    }
}

/// Keep one `replaceRenderer`: the last plugin implementing it wins and the
/// others are marked `skip_ssr`.
pub fn handle_multiple_replace_renderers(plugins: &mut [FlattenedPlugin]) -> Option<RendererConflict> {
    let implementers: Vec<usize> = plugins
        .iter()
        .enumerate()
        .filter(|(_, p)| p.implements(ApiEnv::Ssr, REPLACE_RENDERER))
        .map(|(i, _)| i)
        .collect();
    let (&winner, losers) = implementers.split_last()?;
    if losers.is_empty() {
        return None;
    }

    let names: Vec<&str> = implementers.iter().map(|&i| plugins[i].name.as_str()).collect();
    let listed = names.join(", ");
    let conflict = if names.contains(&DEFAULT_SITE_PLUGIN) {
        let message = format!(
            "{REPLACE_RENDERER} API found in these plugins: {listed}. \
             The site's own {REPLACE_RENDERER} overrides the ones from plugins."
        );
        tracing::warn!("{message}");
        RendererConflict::Warning(message)
    } else {
        let message = format!(
            "{REPLACE_RENDERER} API found in these plugins: {listed}. \
             Only one plugin may implement it; \"{}\" will be used.",
            plugins[winner].name
        );
        tracing::error!("{message}");
        RendererConflict::Error(message)
    };

    for &i in losers {
        plugins[i].skip_ssr = true;
    }
    Some(conflict)
}
