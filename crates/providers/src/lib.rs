//! LLM provider implementations for the research agent.
//!
//! All providers implement the `research_agent_core::Provider` trait.
//! [`build_provider`] selects the backend for a configured provider kind.

mod http;
pub mod gemini;
pub mod openai;
pub mod router;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use router::{build_from_config, build_provider};
