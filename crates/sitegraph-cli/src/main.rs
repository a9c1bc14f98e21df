mod cli;
mod commands;

use std::process::ExitCode;

use cli::{CheckParams, ExecParams, InferParams, build_cli};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SITEGRAPH_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    init_tracing();

    let result = match matches.subcommand() {
        Some(("infer", m)) => commands::infer::run(InferParams::from_matches(m).into()).await,
        Some(("check", m)) => commands::check::run(CheckParams::from_matches(m).into()).await,
        Some(("exec", m)) => commands::exec::run(ExecParams::from_matches(m).into()).await,
        _ => unreachable!("clap should have caught this"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
