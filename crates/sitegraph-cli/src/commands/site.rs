//! Loading nodes, config and query files from disk.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use sitegraph_core::parse_nodes;
use sitegraph_lib::query::QueryCompiler;
use sitegraph_lib::{BuildContext, SiteConfig};

use super::error::CliError;

const QUERY_EXTENSIONS: [&str; 2] = ["graphql", "gql"];

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })
}

/// A build context holding every node of the dump, if one is given.
pub async fn load_site(nodes: Option<&Path>, config: Option<&Path>) -> Result<BuildContext, CliError> {
    let config = match config {
        Some(path) => SiteConfig::from_json(&read(path)?)?,
        None => SiteConfig::default(),
    };
    let ctx = BuildContext::new(config);

    if let Some(path) = nodes {
        let nodes = parse_nodes(&read(path)?).map_err(|source| CliError::Nodes {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(count = nodes.len(), path = %path.display(), "loaded nodes");
        for node in nodes {
            ctx.create_node(node).await?;
        }
    }
    Ok(ctx)
}

/// Add the query sources named on the command line to `compiler`.
///
/// Inline text wins over a path; `-` reads stdin; a directory contributes
/// its `.graphql` and `.gql` files in name order.
pub fn load_queries(
    compiler: &mut QueryCompiler,
    path: Option<&Path>,
    text: Option<&str>,
) -> Result<(), CliError> {
    if let Some(text) = text {
        compiler.add_inline(text);
        return Ok(());
    }
    let Some(path) = path else {
        return Err(CliError::QueryRequired);
    };

    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(CliError::Stdin)?;
        compiler.add_stdin(&buf);
        return Ok(());
    }
    if !path.is_dir() {
        compiler.add_file(&path.to_string_lossy(), &read(path)?);
        return Ok(());
    }

    let mut files: Vec<_> = fs::read_dir(path)
        .map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| QUERY_EXTENSIONS.contains(&ext))
        })
        .collect();
    if files.is_empty() {
        return Err(CliError::NoQueryFiles(path.to_owned()));
    }
    files.sort();

    for file in files {
        compiler.add_file(&file.to_string_lossy(), &read(&file)?);
    }
    Ok(())
}
