//! The agent runner: one task in, one [`RunResult`] out.
//!
//! The runner owns the tool registry, the prompt template and the tracker,
//! and hands each task to an [`AgentExecutor`]. Executor errors of any kind
//! are normalized here into a failed result; nothing is retried.

use crate::display::{print_action, print_result, print_section, print_thinking, truncate_text};
use crate::react::ReactExecutor;
use crate::tracker::ExecutionTracker;
use research_agent_core::agent::AgentConfig;
use research_agent_core::executor::{AgentExecutor, Execution, ExecutionRequest, TraceKind};
use research_agent_core::prompt::PromptTemplate;
use research_agent_core::provider::Provider;
use research_agent_core::tool::ToolRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{info, warn};

const TRACE_PREVIEW_CHARS: usize = 500;

/// The outcome of a single task.
///
/// `success` is true exactly when `error` is `None`. A failed run has an
/// `output` of `"Error: <message>"` and empty metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub output: String,
    pub metrics: Map<String, Value>,
    pub success: bool,
    pub error: Option<String>,
}

impl RunResult {
    fn failed(message: String) -> Self {
        Self {
            output: format!("Error: {message}"),
            metrics: Map::new(),
            success: false,
            error: Some(message),
        }
    }
}

/// A snapshot of how the agent is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_iterations: u32,
    pub tools_available: usize,
    pub tools: Vec<String>,
}

pub struct ResearchAgent {
    config: AgentConfig,
    executor: Box<dyn AgentExecutor>,
    tools: ToolRegistry,
    prompt: PromptTemplate,
    tracker: ExecutionTracker,
}

impl ResearchAgent {
    pub fn new(
        config: AgentConfig,
        executor: Box<dyn AgentExecutor>,
        tools: ToolRegistry,
        prompt: PromptTemplate,
    ) -> Self {
        Self {
            config,
            executor,
            tools,
            prompt,
            tracker: ExecutionTracker::new(),
        }
    }

    /// An agent running the default ReAct loop against `provider` with the
    /// stock research prompt.
    pub fn with_provider(
        config: AgentConfig,
        provider: Arc<dyn Provider>,
        tools: ToolRegistry,
    ) -> Self {
        let executor = ReactExecutor::from_config(provider, &config);
        Self::new(
            config,
            Box::new(executor),
            tools,
            crate::prompts::default_template(),
        )
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run one task to completion.
    pub async fn run(&mut self, task: &str) -> RunResult {
        self.tracker.reset();

        info!(
            provider = %self.config.provider,
            model = %self.config.model,
            "Task started"
        );
        if self.config.verbose {
            print_section(
                "RESEARCH AGENT STARTING",
                &format!("Task: {task}\nProvider: {}", self.config.provider),
            );
            print_thinking("Analyzing task and planning approach...");
        }

        let outcome = self
            .executor
            .execute(ExecutionRequest {
                task,
                tools: &self.tools,
                prompt: &self.prompt,
                history: &[],
            })
            .await;

        match outcome {
            Ok(execution) => self.succeeded(execution),
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "Task failed");
                if self.config.verbose {
                    print_section("ERROR", &format!("Agent execution failed: {message}"));
                }
                RunResult::failed(message)
            }
        }
    }

    fn succeeded(&mut self, execution: Execution) -> RunResult {
        if self.config.verbose {
            for step in &execution.trace {
                let text = truncate_text(&step.content, TRACE_PREVIEW_CHARS);
                match step.kind {
                    TraceKind::Thought => print_thinking(&text),
                    TraceKind::Action => print_action(&text),
                    TraceKind::Observation => println!("Observation: {text}"),
                }
            }
        }

        self.tracker.set_iterations(execution.iterations);
        for invocation in execution.tool_calls {
            self.tracker.log_invocation(invocation);
        }
        let metrics = self.tracker.get_metrics();

        info!(
            elapsed_secs = metrics.total_time_secs,
            iterations = metrics.iterations,
            tool_calls = metrics.tool_calls,
            "Task completed"
        );
        if self.config.verbose {
            print_result(&format!(
                "Task completed in {:.2} seconds",
                metrics.total_time_secs
            ));
            print_section("FINAL ANSWER", &execution.answer);
        }

        let mut map = Map::new();
        map.insert("execution_time".into(), json!(metrics.total_time_secs));
        map.insert("provider".into(), json!(self.config.provider.as_str()));
        map.insert("model".into(), json!(self.config.model));
        map.insert("success".into(), json!(true));
        map.insert("iterations".into(), json!(metrics.iterations));
        map.insert("tool_calls".into(), json!(metrics.tool_calls));
        map.insert("tools_used".into(), json!(metrics.tools_used));
        map.insert(
            "average_tool_time".into(),
            json!(metrics.average_tool_time_secs),
        );

        RunResult {
            output: execution.answer,
            metrics: map,
            success: true,
            error: None,
        }
    }

    /// Run tasks one after another. A failing task does not stop the batch.
    pub async fn run_batch<S: AsRef<str>>(&mut self, tasks: &[S]) -> Vec<RunResult> {
        let total = tasks.len();
        let mut results = Vec::with_capacity(total);
        for (i, task) in tasks.iter().enumerate() {
            let task = task.as_ref();
            if self.config.verbose {
                println!("\n[Task {}/{total}] {task}", i + 1);
            }
            results.push(self.run(task).await);
        }
        results
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            provider: self.config.provider.to_string(),
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_iterations: self.config.max_iterations,
            tools_available: self.tools.len(),
            tools: self.tools.names().into_iter().map(String::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use async_trait::async_trait;
    use research_agent_core::ProviderKind;
    use research_agent_core::error::{Error, ProviderError, Result};
    use research_agent_core::executor::ToolInvocation;
    use std::time::Duration;

    /// Answers every task with its own text, failing the ones named `fail_on`.
    struct EchoExecutor {
        fail_on: &'static str,
    }

    #[async_trait]
    impl AgentExecutor for EchoExecutor {
        async fn execute(&self, request: ExecutionRequest<'_>) -> Result<Execution> {
            if request.task == self.fail_on {
                return Err(Error::Config {
                    message: "boom".into(),
                });
            }
            Ok(Execution {
                answer: format!("done: {}", request.task),
                iterations: 2,
                tool_calls: vec![
                    ToolInvocation {
                        tool: "calculate".into(),
                        arguments: json!({"expression": "1+1"}),
                        output: "Result of '1+1': 2".into(),
                        duration: Duration::from_millis(10),
                    },
                    ToolInvocation {
                        tool: "analyze_text".into(),
                        arguments: json!({"text": "hi"}),
                        output: "ok".into(),
                        duration: Duration::from_millis(30),
                    },
                ],
                ..Default::default()
            })
        }
    }

    fn quiet_config() -> AgentConfig {
        let mut config = AgentConfig::for_provider(ProviderKind::OpenAi);
        config.verbose = false;
        config
    }

    fn echo_agent() -> ResearchAgent {
        ResearchAgent::new(
            quiet_config(),
            Box::new(EchoExecutor { fail_on: "bad task" }),
            research_agent_tools::default_registry(),
            crate::prompts::default_template(),
        )
    }

    #[tokio::test]
    async fn success_carries_metrics() {
        let mut agent = echo_agent();
        let result = agent.run("good task").await;

        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.output, "done: good task");
        assert_eq!(result.metrics["provider"], "openai");
        assert_eq!(result.metrics["model"], "gpt-4-turbo-preview");
        assert_eq!(result.metrics["success"], true);
        assert_eq!(result.metrics["iterations"], 2);
        assert_eq!(result.metrics["tool_calls"], 2);
        assert_eq!(result.metrics["tools_used"], json!(["analyze_text", "calculate"]));
        assert_eq!(result.metrics["average_tool_time"], 0.02);
        assert!(result.metrics["execution_time"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn failure_is_normalized() {
        let mut agent = echo_agent();
        let result = agent.run("bad task").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Configuration error: boom"));
        assert_eq!(result.output, "Error: Configuration error: boom");
        assert!(result.metrics.is_empty());
    }

    #[tokio::test]
    async fn batch_preserves_order_and_isolates_failures() {
        let mut agent = echo_agent();
        let results = agent.run_batch(&["one", "bad task", "three"]).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].output, "done: one");
        assert!(!results[1].success);
        assert!(results[1].output.starts_with("Error: "));
        assert_eq!(results[2].output, "done: three");
        for r in &results {
            assert_eq!(r.success, r.error.is_none());
        }
    }

    #[tokio::test]
    async fn tracker_resets_between_runs() {
        let mut agent = echo_agent();
        agent.run("first").await;
        let second = agent.run("second").await;
        assert_eq!(second.metrics["tool_calls"], 2);
    }

    #[tokio::test]
    async fn empty_task_is_passed_through() {
        let mut agent = echo_agent();
        let result = agent.run("   ").await;
        assert!(result.success);
        assert_eq!(result.output, "done:    ");
    }

    #[tokio::test]
    async fn provider_errors_become_failed_results() {
        let provider = Arc::new(SequentialMockProvider::failing(
            ProviderError::AuthenticationFailed("Invalid API key".into()),
        ));
        let mut agent = ResearchAgent::with_provider(
            quiet_config(),
            provider,
            research_agent_tools::default_registry(),
        );

        let result = agent.run("anything").await;
        assert!(!result.success);
        assert!(result.output.starts_with("Error: "));
        assert!(result.output.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn default_loop_end_to_end() {
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(
            vec![make_tool_call("calculate", json!({"expression": "2 + 2"}))],
            "Let me compute that.",
            "2 + 2 = 4",
        ));
        let mut agent = ResearchAgent::with_provider(
            quiet_config(),
            provider,
            research_agent_tools::default_registry(),
        );

        let result = agent.run("What is 2 + 2?").await;
        assert!(result.success);
        assert_eq!(result.output, "2 + 2 = 4");
        assert_eq!(result.metrics["tools_used"], json!(["calculate"]));
        assert_eq!(result.metrics["iterations"], 2);
    }

    #[test]
    fn status_lists_tools() {
        let status = echo_agent().status();
        assert_eq!(status.provider, "openai");
        assert_eq!(status.max_iterations, 10);
        assert_eq!(status.tools_available, 6);
        assert_eq!(status.tools[0], "web_search");
        assert!(status.tools.contains(&"code_review".to_string()));
    }

    #[test]
    fn run_result_serializes() {
        let result = RunResult::failed("nope".into());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["output"], "Error: nope");
        assert_eq!(json["error"], "nope");
    }
}
