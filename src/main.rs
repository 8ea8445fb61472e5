//! AIDIS dispatch binary - stdio entry point.
//!
//! Subcommands:
//! - serve: JSON-lines `{toolName, args}` on stdin, one envelope per line on stdout
//! - catalog: print the `aidis_help` listing
//! - check: run the catalog consistency check
//! - validate: validate one call without dispatching it
//!
//! `serve` binds dry-run handlers that echo normalized arguments, plus the
//! in-memory alerts branch of `pattern_insights`.

use aidis_core::dispatch::{PatternAlerts, StaticAlerts};
use aidis_core::envelope::{CallEnvelope, ResponseFormatter};
use aidis_core::tools::HelpTool;
use aidis_core::{handler_fn, Config, Dispatcher, Error, Executor, ToolCall, ToolCatalog};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser)]
#[command(name = "aidis-dispatch")]
#[command(about = "Validate and dispatch AIDIS tool calls")]
#[command(version)]
struct Cli {
    /// JSON config file (AIDIS_* environment variables override it)
    #[arg(short, long, global = true, env = "AIDIS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read JSON-lines calls from stdin and write envelopes to stdout
    Serve,

    /// Print the tool catalog
    Catalog,

    /// Check that every definition, example and schema agree
    Check,

    /// Validate one call without dispatching it
    Validate {
        /// Tool name (e.g. context_search)
        #[arg(index = 1)]
        tool: String,

        /// JSON arguments (e.g. '{"query": "auth"}')
        #[arg(index = 2, default_value = "{}")]
        args: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> aidis_core::Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

fn dry_run_executor(config: &Config) -> aidis_core::Result<Executor> {
    let catalog = Arc::new(ToolCatalog::standard()?);
    let dispatcher = Dispatcher::builder(catalog.clone())
        .help_tool(&config.dispatch.help_tool)
        .branch(
            "pattern_insights",
            "alerts",
            Arc::new(PatternAlerts::new(StaticAlerts::default())),
        )
        .fallback(handler_fn(|args| async move {
            Ok(json!({ "dryRun": true, "args": args }))
        }))
        .build()?;
    Executor::new(catalog, dispatcher, config)
}

async fn serve(executor: Executor) -> aidis_core::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    tracing::info!(tools = executor.catalog().len(), "Serving tool calls on stdio");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<ToolCall>(line) {
            Ok(call) => executor.execute(call).await,
            Err(e) => {
                tracing::debug!(error = %e, "Malformed request line");
                let call = CallEnvelope::new("", Value::Null);
                ResponseFormatter.failure(&Error::validation(format!("Invalid request: {}", e)), &call)
            }
        };
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    aidis_core::observability::init_tracing(&config.observability);

    match cli.command {
        Commands::Serve => serve(dry_run_executor(&config)?).await?,
        Commands::Catalog => {
            let catalog = Arc::new(ToolCatalog::standard()?);
            let help = HelpTool::new(catalog).render();
            println!("{}", help["text"].as_str().unwrap_or_default());
        }
        Commands::Check => {
            let catalog = ToolCatalog::standard()?;
            catalog.check_consistency()?;
            println!("{} tools consistent", catalog.len());
        }
        Commands::Validate { tool, args } => {
            let executor = dry_run_executor(&config)?;
            let raw: Value = serde_json::from_str(&args)?;
            match executor.validate_only(&tool, &raw) {
                Ok(normalized) => println!("{}", serde_json::to_string_pretty(&normalized)?),
                Err(e) => {
                    eprintln!("{}", e.message());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
