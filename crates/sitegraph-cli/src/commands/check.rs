use std::path::PathBuf;

use sitegraph_lib::build;
use sitegraph_lib::query::{CompileResult, QueryCompiler};

use super::error::CliError;
use super::site::{load_queries, load_site};

pub struct CheckArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub nodes_path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub color: bool,
}

pub struct CheckOutcome {
    pub rendered: String,
    pub errors: usize,
    pub warnings: usize,
    pub passed: bool,
}

pub async fn run(args: CheckArgs) -> Result<(), CliError> {
    let outcome = check(&args).await?;
    eprint!("{}", outcome.rendered);
    if !outcome.passed {
        return Err(CliError::QueryFailed {
            errors: outcome.errors,
            warnings: outcome.warnings,
        });
    }
    // Silent on success
    Ok(())
}

pub async fn check(args: &CheckArgs) -> Result<CheckOutcome, CliError> {
    let ctx = load_site(args.nodes_path.as_deref(), args.config.as_deref()).await?;
    build(&ctx, None).await?;
    let mut compiler = ctx.query_compiler().await?;
    load_queries(&mut compiler, args.query_path.as_deref(), args.query_text.as_deref())?;

    let result = compiler.compile()?;
    let (errors, warnings) = counts(&result);
    let passed = errors == 0 && (!args.strict || warnings == 0);
    Ok(CheckOutcome {
        rendered: render_diagnostics(&compiler, &result, args.color),
        errors,
        warnings,
        passed,
    })
}

pub fn counts(result: &CompileResult) -> (usize, usize) {
    result.diagnostics.values().fold((0, 0), |(e, w), d| {
        (e + d.error_count(), w + d.warning_count())
    })
}

/// Every file's diagnostics with code frames from its own source.
pub fn render_diagnostics(compiler: &QueryCompiler, result: &CompileResult, colored: bool) -> String {
    let mut out = String::new();
    for (path, diagnostics) in &result.diagnostics {
        let Some(source) = compiler
            .sources()
            .iter()
            .find(|s| s.display_name() == path.as_str())
        else {
            continue;
        };
        out.push_str(
            &diagnostics
                .printer()
                .source(source.as_str())
                .path(path)
                .colored(colored)
                .render(),
        );
    }
    out
}
