//! AgentExecutor trait: the think/act/observe loop as a pluggable backend.
//!
//! The runner hands an executor the task, the tools and the prompt, and gets
//! back a final answer plus the trace of how it got there. Any backend that
//! honors this contract can be substituted without touching the runner.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;
use crate::message::Message;
use crate::prompt::PromptTemplate;
use crate::tool::ToolRegistry;

/// Everything one execution needs.
pub struct ExecutionRequest<'a> {
    pub task: &'a str,
    pub tools: &'a ToolRegistry,
    pub prompt: &'a PromptTemplate,
    /// Prior turns to replay before the task (empty for a fresh run)
    pub history: &'a [Message],
}

/// One tool call made during an execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub arguments: serde_json::Value,
    pub output: String,
    pub duration: Duration,
}

/// The kind of reasoning trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Thought,
    Action,
    Observation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    pub kind: TraceKind,
    pub content: String,
}

/// What an executor returns on success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Execution {
    pub answer: String,
    pub trace: Vec<TraceStep>,
    /// LLM round-trips used
    pub iterations: usize,
    pub tool_calls: Vec<ToolInvocation>,
}

#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Drive the loop to completion.
    ///
    /// Provider, parse and iteration-cap failures come back as `Err`; tool
    /// failures do not, they are observations.
    async fn execute(&self, request: ExecutionRequest<'_>) -> Result<Execution>;
}
