//! Agent configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The LLM services the agent can be wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Gemini];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4-turbo-preview",
            Self::Gemini => "gemini-pro",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Where a user can obtain a key.
    pub fn key_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://platform.openai.com/account/api-keys",
            Self::Gemini => "https://ai.google.dev/",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(format!("Unknown provider: {other}. Use 'openai' or 'gemini'")),
        }
    }
}

/// Per-agent settings, fixed when the agent is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub provider: ProviderKind,

    pub model: String,

    #[serde(default = "default_temp")]
    pub temperature: f32,

    /// Maximum think/act/observe iterations per task
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Maximum tokens per LLM response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Print progress sections while running
    #[serde(default)]
    pub verbose: bool,
}

fn default_temp() -> f32 {
    0.7
}
fn default_max_iterations() -> u32 {
    10
}

impl AgentConfig {
    /// Settings for `provider` with its default model and stock limits.
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            temperature: default_temp(),
            max_iterations: default_max_iterations(),
            max_tokens: None,
            verbose: false,
        }
    }
}
