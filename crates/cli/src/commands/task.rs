//! `research-agent <task...>`: run a single task.

use research_agent_agent::ResearchAgent;
use research_agent_agent::display::{format_metrics, print_section};
use std::process::ExitCode;

pub async fn run(agent: &mut ResearchAgent, task: &str) -> ExitCode {
    let result = agent.run(task).await;

    if result.success {
        print_section("RESULT", &result.output);
        print_section("METRICS", &format_metrics(&result.metrics));
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "❌ Error: {}",
            result.error.as_deref().unwrap_or("Unknown error")
        );
        ExitCode::FAILURE
    }
}
