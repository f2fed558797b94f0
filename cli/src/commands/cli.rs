use std::path::PathBuf;

use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Screen agent tool calls with Lakera Guard")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Screen one tool call and print the gate decision as JSON.
    Check(CheckArgs),
}

#[derive(ClapArgs, Debug, Clone)]
#[command(group(ArgGroup::new("input").required(true).args(["event", "tool"])))]
pub struct CheckArgs {
    /// TOML file with `apiKey`, `projectId`, `timeoutMs` and `failMode`.
    /// `LAKERA_GUARD_API_KEY` / `LAKERA_GUARD_PROJECT_ID` override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON event `{"toolName": ..., "params": {...}}`; `-` reads stdin.
    #[arg(long)]
    pub event: Option<String>,

    #[arg(long)]
    pub tool: Option<String>,

    /// Tool params as a JSON object.
    #[arg(long, requires = "tool")]
    pub params: Option<String>,
}
