//! Research Agent CLI: the main entry point.
//!
//! Modes:
//! - `research-agent <task...>`        run one task and exit
//! - `research-agent --batch <file>`   run one task per non-empty line
//! - `research-agent --check`          verify the provider, then exit
//! - `research-agent`                  interactive prompt

use clap::Parser;
use research_agent_agent::{AgentOverrides, create_agent};
use research_agent_config::AppConfig;
use research_agent_core::agent::ProviderKind;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(
    name = "research-agent",
    about = "Research Agent: an LLM agent that searches, reads and analyzes to answer tasks",
    version,
    author
)]
struct Cli {
    /// Task to run; starts interactive mode when omitted
    task: Vec<String>,

    /// LLM provider to use (openai or gemini)
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Model name, overriding the provider default
    #[arg(short, long)]
    model: Option<String>,

    /// File with one task per line
    #[arg(short, long, value_name = "FILE", conflicts_with = "task")]
    batch: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Check the provider's API key and reachability, then exit
    #[arg(long, conflicts_with_all = ["task", "batch"])]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so answers on stdout stay clean
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!();
            eprintln!("  ERROR: {e}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.check {
        let kind = cli.provider.unwrap_or(config.provider);
        return Ok(commands::check::run(&config, kind).await);
    }

    let mut agent = create_agent(&config, overrides(&cli))?;

    if let Some(path) = cli.batch {
        return commands::batch::run(&mut agent, &path).await;
    }
    if cli.task.is_empty() {
        commands::interactive::run(&mut agent).await?;
        return Ok(ExitCode::SUCCESS);
    }
    Ok(commands::task::run(&mut agent, &cli.task.join(" ")).await)
}

/// Interactive mode always runs quietly and prints only each result.
fn overrides(cli: &Cli) -> AgentOverrides {
    let interactive = cli.batch.is_none() && cli.task.is_empty();
    AgentOverrides {
        provider: cli.provider,
        model: cli.model.clone(),
        verbose: interactive.then_some(false),
    }
}
