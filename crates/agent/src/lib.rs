//! The research agent: prompt text, the default ReAct loop, per-run
//! metrics and the task runner.
//!
//! A task flows through [`ResearchAgent::run`]:
//!
//! 1. **Reset** the tracker and start the clock
//! 2. **Execute** the task through the configured [`AgentExecutor`]
//!    (by default [`ReactExecutor`], driving the provider's tool calling)
//! 3. **Collect** iterations and tool invocations into metrics
//! 4. **Return** a [`RunResult`]; errors become `"Error: <msg>"` results
//!
//! [`AgentExecutor`]: research_agent_core::executor::AgentExecutor

pub mod display;
pub mod prompts;
pub mod react;
pub mod runner;
pub mod tracker;

#[cfg(test)]
mod test_helpers;

pub use react::{EarlyStopping, ReactExecutor};
pub use runner::{AgentStatus, ResearchAgent, RunResult};
pub use tracker::{ExecutionMetrics, ExecutionTracker};

use research_agent_config::AppConfig;
use research_agent_core::agent::ProviderKind;
use research_agent_core::error::Result;
use std::time::Duration;

/// Command-line choices that take precedence over the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct AgentOverrides {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub verbose: Option<bool>,
}

/// Build a ready-to-run agent: provider client, tool registry and the
/// default executor.
///
/// Fails when the selected provider has no API key configured.
pub fn create_agent(config: &AppConfig, overrides: AgentOverrides) -> Result<ResearchAgent> {
    let kind = overrides.provider.unwrap_or(config.provider);
    let verbose = overrides.verbose.unwrap_or(config.verbose);

    let mut agent_config = config.agent_config(kind, verbose);
    if let Some(model) = overrides.model {
        agent_config.model = model;
    }

    let provider = research_agent_providers::build_from_config(config, kind)?;
    let tools = research_agent_tools::registry_from_config(
        &config.tools,
        Duration::from_secs(config.timeout_secs),
    );

    tracing::info!(
        provider = %kind,
        model = %agent_config.model,
        tools = tools.len(),
        "Agent created"
    );
    Ok(ResearchAgent::with_provider(agent_config, provider, tools))
}
