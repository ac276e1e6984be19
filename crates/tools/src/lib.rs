//! Built-in tool implementations for the research agent.
//!
//! Tools give the agent the ability to interact with the world: search the
//! web, read and list files, do arithmetic, and run simple text and code
//! heuristics. Every tool answers with text, including when it fails.

pub mod calculator;
pub mod code_review;
pub mod file_read;
pub mod list_files;
pub mod text_analysis;
pub mod web_search;

#[cfg(test)]
mod test_server;

use std::time::Duration;

use research_agent_config::ToolsConfig;
use research_agent_core::tool::ToolRegistry;

/// Create a registry with every built-in tool enabled.
pub fn default_registry() -> ToolRegistry {
    registry_from_config(&ToolsConfig::default(), Duration::from_secs(10))
}

/// Create a registry honoring the enable flags in `config`.
///
/// `analyze_text` and `calculate` are always present. `timeout` bounds each
/// web search request.
pub fn registry_from_config(config: &ToolsConfig, timeout: Duration) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    if config.web_search {
        registry.register(Box::new(web_search::WebSearchTool::new(
            config.search_api_url.clone(),
            timeout,
        )));
    }
    registry.register(Box::new(text_analysis::TextAnalysisTool));
    if config.file_access {
        registry.register(Box::new(file_read::FileReadTool));
        registry.register(Box::new(list_files::ListFilesTool));
    }
    registry.register(Box::new(calculator::CalculatorTool));
    if config.code_analysis {
        registry.register(Box::new(code_review::CodeReviewTool));
    }
    tracing::debug!(tools = ?registry.names(), "Tool registry built");
    registry
}
