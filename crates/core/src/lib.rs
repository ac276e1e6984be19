//! # Research Agent Core
//!
//! Domain types, traits, and error definitions for the research agent.
//! Every other crate in the workspace depends inward on this one.
//!
//! ## Seams
//!
//! - [`Provider`]: an LLM completion backend (OpenAI, Gemini, mocks)
//! - [`Tool`]: a named capability the reasoning loop may invoke
//! - [`AgentExecutor`]: the think/act/observe loop itself
//!
//! The runner only talks to these traits, so any backend can be swapped
//! without touching it.

pub mod agent;
pub mod error;
pub mod executor;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentConfig, ProviderKind};
pub use error::{Error, Result};
pub use executor::{AgentExecutor, Execution, ExecutionRequest, ToolInvocation, TraceKind, TraceStep};
pub use message::{Message, MessageToolCall, Role};
pub use prompt::PromptTemplate;
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
