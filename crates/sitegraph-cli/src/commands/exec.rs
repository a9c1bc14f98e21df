use std::path::PathBuf;

use serde_json::{Map, Value};
use sitegraph_lib::build;
use sitegraph_lib::query::{CompileResult, CompiledQuery};

use super::check::{counts, render_diagnostics};
use super::error::CliError;
use super::site::{load_queries, load_site};

pub struct ExecArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub nodes_path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub operation: Option<String>,
    pub vars: Option<String>,
    pub compact: bool,
    pub color: bool,
}

pub async fn run(args: ExecArgs) -> Result<(), CliError> {
    let output = exec(&args).await?;
    println!("{output}");
    Ok(())
}

/// Run the selected operation and return the serialized result.
///
/// Field errors are part of the result; only compile errors fail.
pub async fn exec(args: &ExecArgs) -> Result<String, CliError> {
    let variables = parse_vars(args.vars.as_deref())?;
    let ctx = load_site(args.nodes_path.as_deref(), args.config.as_deref()).await?;
    build(&ctx, None).await?;
    let mut compiler = ctx.query_compiler().await?;
    load_queries(&mut compiler, args.query_path.as_deref(), args.query_text.as_deref())?;

    let result = compiler.compile()?;
    if !result.is_ok() {
        eprint!("{}", render_diagnostics(&compiler, &result, args.color));
        let (errors, warnings) = counts(&result);
        return Err(CliError::QueryFailed { errors, warnings });
    }

    let query = select_operation(&result, args.operation.as_deref())?;
    tracing::debug!(operation = %query.name, "executing");
    let executed = ctx.executor().await?.execute(&query.operation, variables).await;

    let json = if args.compact {
        serde_json::to_string(&executed)
    } else {
        serde_json::to_string_pretty(&executed)
    };
    json.map_err(CliError::Output)
}

pub fn parse_vars(vars: Option<&str>) -> Result<Map<String, Value>, CliError> {
    let Some(text) = vars else {
        return Ok(Map::new());
    };
    match serde_json::from_str(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CliError::Vars(format!("got {other}"))),
        Err(e) => Err(CliError::Vars(e.to_string())),
    }
}

pub fn select_operation<'r>(
    result: &'r CompileResult,
    name: Option<&str>,
) -> Result<&'r CompiledQuery, CliError> {
    let available = || {
        result
            .queries
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    match name {
        Some(name) => result.query(name).ok_or_else(|| CliError::UnknownOperation {
            name: name.to_owned(),
            available: available(),
        }),
        None => match result.queries.len() {
            0 => Err(CliError::NoOperation),
            1 => result.queries.values().next().ok_or(CliError::NoOperation),
            _ => Err(CliError::AmbiguousOperation(available())),
        },
    }
}
