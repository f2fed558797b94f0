use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::cli;

/// Exit status when the tool call must not run.
const EXIT_BLOCKED: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    match args.command {
        cli::Commands::Check(check_args) => {
            let decision = commands::check::run_check(check_args).await?;
            println!("{}", serde_json::to_string(&decision)?);
            if decision.is_block() {
                return Ok(ExitCode::from(EXIT_BLOCKED));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
