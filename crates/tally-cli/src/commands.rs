use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use tally_app::{AppConfig, Router};
use tally_ledger::Commit;

use crate::cli::*;

const DEFAULT_CONFIG: &str = "tally.toml";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let router = Router::open(&config)
        .with_context(|| format!("opening journal {}", config.journal_path.display()))?;
    let format = cli.format;

    match cli.command {
        Command::Init => cmd_init(&router, format),
        Command::Invoke(args) => cmd_invoke(&router, args, format),
        Command::Query(args) => cmd_query(&router, args, format),
        Command::Tables => cmd_tables(&router, format),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => AppConfig::load(Path::new(DEFAULT_CONFIG))?,
        None => AppConfig::default(),
    };
    if let Some(journal) = &cli.journal {
        config.journal_path = journal.clone();
    }
    Ok(config)
}

fn cmd_init(router: &Router, format: OutputFormat) -> anyhow::Result<()> {
    let commit = router.init()?;
    if format == OutputFormat::Json {
        let out = json!({
            "tables": router.store().registry().tables(),
            "commit": commit.as_ref().map(commit_json),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} Initialized {} tables",
        "✓".green().bold(),
        router.store().registry().len().to_string().bold()
    );
    for table in router.store().registry().tables() {
        println!("  {} ({} key columns)", table.name.cyan(), table.key_arity);
    }
    if let Some(commit) = commit {
        println!(
            "  Commit: {} ({} mutations)",
            format!("#{}", commit.seq).yellow(),
            commit.mutations.len()
        );
    }
    Ok(())
}

fn cmd_invoke(router: &Router, args: OperationArgs, format: OutputFormat) -> anyhow::Result<()> {
    let result = router
        .invoke(&args.operation, &args.args)
        .with_context(|| format!("{} failed", args.operation))?;
    print_result(&args.operation, &result, format)?;
    if format == OutputFormat::Text {
        let height = router.ledger().height()?;
        println!("{} Committed as {}", "✓".green().bold(), format!("#{height}").yellow());
    }
    Ok(())
}

fn cmd_query(router: &Router, args: OperationArgs, format: OutputFormat) -> anyhow::Result<()> {
    let result = router
        .query(&args.operation, &args.args)
        .with_context(|| format!("{} failed", args.operation))?;
    print_result(&args.operation, &result, format)
}

fn print_result(operation: &str, result: &[u8], format: OutputFormat) -> anyhow::Result<()> {
    let value: Value = serde_json::from_slice(result).context("result is not JSON")?;
    match format {
        OutputFormat::Json => {
            let out = json!({ "operation": operation, "result": value });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

fn cmd_tables(router: &Router, format: OutputFormat) -> anyhow::Result<()> {
    let stats = router.ledger().table_stats()?;
    let rows = |name: &str| stats.iter().find(|(t, _)| t == name).map(|(_, n)| *n);

    if format == OutputFormat::Json {
        let tables: Vec<Value> = router
            .store()
            .registry()
            .tables()
            .iter()
            .map(|t| json!({ "name": t.name, "key_arity": t.key_arity, "rows": rows(&t.name) }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    for table in router.store().registry().tables() {
        let count = match rows(&table.name) {
            Some(n) => format!("{n} rows").normal(),
            None => "not created".red(),
        };
        println!("{:<20} keys={}  {}", table.name.cyan(), table.key_arity, count);
    }
    Ok(())
}

fn commit_json(commit: &Commit) -> Value {
    let mutations: Vec<Value> = commit
        .mutations
        .iter()
        .map(|m| json!({ "op": m.label(), "table": m.table() }))
        .collect();
    json!({ "seq": commit.seq, "mutations": mutations })
}
