use std::fmt::Write;
use std::path::PathBuf;

use sitegraph_core::Colors;
use sitegraph_lib::infer::TypeConflict;
use sitegraph_lib::{Error, build};

use super::error::CliError;
use super::site::load_site;

pub struct InferArgs {
    pub nodes_path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub type_name: Option<String>,
    pub color: bool,
}

/// The composed SDL and the rendered type conflicts.
pub struct InferOutput {
    pub sdl: String,
    pub conflicts: String,
}

pub async fn run(args: InferArgs) -> Result<(), CliError> {
    let output = infer(&args).await?;
    print!("{}", output.sdl);
    eprint!("{}", output.conflicts);
    Ok(())
}

pub async fn infer(args: &InferArgs) -> Result<InferOutput, CliError> {
    let ctx = load_site(args.nodes_path.as_deref(), args.config.as_deref()).await?;
    let report = build(&ctx, None).await?;
    let schema = ctx.schema().await.ok_or(Error::SchemaNotBuilt)?;

    let sdl = match &args.type_name {
        Some(name) => schema
            .type_to_sdl(name)
            .ok_or_else(|| CliError::UnknownType(name.clone()))?,
        None => schema.to_sdl(),
    };
    Ok(InferOutput {
        sdl,
        conflicts: render_conflicts(&report.conflicts, Colors::new(args.color)),
    })
}

pub fn render_conflicts(conflicts: &[TypeConflict], colors: Colors) -> String {
    let mut out = String::new();
    for conflict in conflicts {
        let _ = writeln!(
            out,
            "{}: conflicting types for {}, typed as JSON",
            colors.warning("warning"),
            colors.name(&conflict.field_path)
        );
        for observed in &conflict.observed {
            let _ = writeln!(
                out,
                "  - {} {} {}",
                colors.warning(&observed.shape),
                colors.value(&observed.example),
                colors.muted(format!("(node \"{}\")", observed.node_id))
            );
        }
    }
    out
}
