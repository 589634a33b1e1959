use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally: schema-driven record tables on an append-only ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./tally.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Journal file, overriding the configuration
    #[arg(short, long, global = true)]
    pub journal: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Drop and recreate every table
    Init,
    /// Run a writing operation
    Invoke(OperationArgs),
    /// Run a read-only operation
    Query(OperationArgs),
    /// List tables with their key arity and row count
    Tables,
}

#[derive(Args)]
pub struct OperationArgs {
    /// Operation name, e.g. PostUser or GetUser
    pub operation: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
