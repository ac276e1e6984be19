//! Default ReAct executor: Thought → Action → Observation loop.
//!
//! Built on native provider tool calling: the model's text is the thought,
//! its tool calls are the actions, and tool output goes back as
//! observations. The loop ends when a reply carries no tool calls, or when
//! the iteration cap is reached and [`EarlyStopping`] decides what happens.
//!
//! # Trace Format
//!
//! Each iteration records:
//! - **Thought**: the model's text, when non-empty
//! - **Action**: `tool(arguments)` for every call
//! - **Observation**: the tool's output text

use async_trait::async_trait;
use research_agent_core::agent::AgentConfig;
use research_agent_core::error::{Error, Result};
use research_agent_core::executor::{
    AgentExecutor, Execution, ExecutionRequest, ToolInvocation, TraceKind, TraceStep,
};
use research_agent_core::message::{Message, MessageToolCall};
use research_agent_core::provider::{Provider, ProviderRequest, ToolDefinition};
use research_agent_core::tool::{ToolCall, ToolRegistry};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What to do when the iteration cap is hit without a final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarlyStopping {
    /// Send the reflection prompt and take one more reply as the answer.
    #[default]
    Generate,
    /// Fail with [`Error::IterationLimit`].
    Force,
}

pub struct ReactExecutor {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    max_iterations: u32,
    early_stopping: EarlyStopping,
}

impl ReactExecutor {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            max_iterations: 10,
            early_stopping: EarlyStopping::default(),
        }
    }

    /// An executor using the model, sampling and limits in `config`.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AgentConfig) -> Self {
        let mut executor = Self::new(provider, config.model.clone())
            .with_temperature(config.temperature)
            .with_max_iterations(config.max_iterations);
        executor.max_tokens = config.max_tokens;
        executor
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_early_stopping(mut self, early_stopping: EarlyStopping) -> Self {
        self.early_stopping = early_stopping;
        self
    }

    fn request(&self, messages: &[Message], tools: &[ToolDefinition]) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: tools.to_vec(),
            stop: vec![],
        }
    }

    /// Run one tool call, turning malformed arguments into an observation.
    async fn act(&self, tools: &ToolRegistry, tc: &MessageToolCall) -> ToolInvocation {
        let start = Instant::now();

        let raw = tc.arguments.trim();
        let parsed = if raw.is_empty() {
            Ok(serde_json::json!({}))
        } else {
            serde_json::from_str::<serde_json::Value>(raw)
        };

        let (arguments, output) = match parsed {
            Ok(arguments) => {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: arguments.clone(),
                };
                let result = tools.execute(&call).await;
                if !result.success {
                    warn!(tool = %tc.name, output = %result.output, "Tool reported failure");
                }
                (arguments, result.output)
            }
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Malformed tool arguments");
                (
                    serde_json::Value::String(tc.arguments.clone()),
                    format!("Error: invalid arguments for {}: {e}", tc.name),
                )
            }
        };

        ToolInvocation {
            tool: tc.name.clone(),
            arguments,
            output,
            duration: start.elapsed(),
        }
    }
}

#[async_trait]
impl AgentExecutor for ReactExecutor {
    async fn execute(&self, request: ExecutionRequest<'_>) -> Result<Execution> {
        let ExecutionRequest {
            task,
            tools,
            prompt,
            history,
        } = request;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(prompt.render_system()));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(prompt.render_task(task)));

        let tool_defs = tools.definitions();
        let mut execution = Execution::default();

        info!(
            provider = self.provider.name(),
            model = %self.model,
            max_iter = self.max_iterations,
            tools = tool_defs.len(),
            "ReAct loop starting"
        );

        for iteration in 1..=self.max_iterations {
            execution.iterations = iteration as usize;
            debug!(iteration, "ReAct iteration");

            let response = self
                .provider
                .complete(self.request(&messages, &tool_defs))
                .await?;
            let reply = response.message;

            if !reply.content.trim().is_empty() {
                execution.trace.push(TraceStep {
                    kind: TraceKind::Thought,
                    content: reply.content.clone(),
                });
            }

            if reply.tool_calls.is_empty() {
                info!(
                    iterations = execution.iterations,
                    tool_calls = execution.tool_calls.len(),
                    "ReAct loop completed"
                );
                execution.answer = reply.content;
                return Ok(execution);
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply);

            for tc in &calls {
                execution.trace.push(TraceStep {
                    kind: TraceKind::Action,
                    content: format!("{}({})", tc.name, tc.arguments),
                });

                let invocation = self.act(tools, tc).await;
                debug!(
                    tool = %invocation.tool,
                    duration_ms = invocation.duration.as_millis() as u64,
                    "Tool executed"
                );

                execution.trace.push(TraceStep {
                    kind: TraceKind::Observation,
                    content: invocation.output.clone(),
                });
                messages.push(Message::tool_result(&tc.id, &invocation.output));
                execution.tool_calls.push(invocation);
            }
        }

        warn!(max_iterations = self.max_iterations, "ReAct: max iterations reached");

        let reflection = match (self.early_stopping, &prompt.reflection) {
            (EarlyStopping::Generate, Some(reflection)) => reflection,
            _ => {
                return Err(Error::IterationLimit {
                    max_iterations: self.max_iterations,
                });
            }
        };

        // Tool declarations stay attached to match the history; calls in this
        // reply are ignored.
        messages.push(Message::user(reflection.as_str()));
        let response = self
            .provider
            .complete(self.request(&messages, &tool_defs))
            .await?;
        execution.iterations += 1;

        let answer = response.message.content;
        if answer.trim().is_empty() {
            return Err(Error::IterationLimit {
                max_iterations: self.max_iterations,
            });
        }

        execution.trace.push(TraceStep {
            kind: TraceKind::Thought,
            content: answer.clone(),
        });
        info!(
            iterations = execution.iterations,
            tool_calls = execution.tool_calls.len(),
            "ReAct loop finished after reflection"
        );
        execution.answer = answer;
        Ok(execution)
    }
}
