//! Configuration loading, validation, and management for the research agent.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`--config` or `RESEARCH_AGENT_CONFIG`), then environment variables.
//! The result is one immutable [`AppConfig`] built at process start and
//! passed by reference from then on.

use research_agent_core::agent::{AgentConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "RESEARCH_AGENT_CONFIG";

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Selected LLM provider
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model override; `None` means the provider's default model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Max think/act/observe iterations per task
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Per-request HTTP timeout for provider and search calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Print progress sections during single-task runs
    #[serde(default = "default_true")]
    pub verbose: bool,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_max_iterations() -> u32 {
    10
}
fn default_timeout_secs() -> u64 {
    300
}
fn default_true() -> bool {
    true
}

/// Per-tool enable flags and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_true")]
    pub web_search: bool,

    /// Gates both `read_file` and `list_files`
    #[serde(default = "default_true")]
    pub file_access: bool,

    #[serde(default = "default_true")]
    pub code_analysis: bool,

    #[serde(default = "default_search_url")]
    pub search_api_url: String,
}

fn default_search_url() -> String {
    "https://api.duckduckgo.com/".into()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            web_search: true,
            file_access: true,
            code_analysis: true,
            search_api_url: default_search_url(),
        }
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_iterations", &self.max_iterations)
            .field("timeout_secs", &self.timeout_secs)
            .field("verbose", &self.verbose)
            .field("tools", &self.tools)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment, after merging a
    /// `.env` file from the working directory (or a parent) into it.
    ///
    /// Variables already set in the environment win over `.env` entries.
    /// `path` wins over `RESEARCH_AGENT_CONFIG`; a missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        merge_env_file(None);
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Defaults plus the variables visible through `lookup`, no file unless
    /// `lookup` names one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load_with(None, lookup)
    }

    /// Like [`load`](Self::load) but reads variables through `lookup`.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = path
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match file {
            Some(p) => Self::load_from(&p)?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        config.reset_out_of_range();
        Ok(config)
    }

    /// Load configuration from a specific TOML file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.reset_out_of_range();
        Ok(config)
    }

    /// Overlay environment variables. Only the provider name is checked;
    /// every other value falls back to its current setting when it does not
    /// parse.
    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(p) = get("LLM_PROVIDER") {
            self.provider = ProviderKind::from_str(&p).map_err(ConfigError::UnknownProvider)?;
        }
        if let Some(m) = get("LLM_MODEL") {
            self.model = Some(m);
        }

        coerce(&get, "LLM_TEMPERATURE", &mut self.temperature);
        coerce(&get, "LLM_MAX_TOKENS", &mut self.max_tokens);
        coerce(&get, "MAX_ITERATIONS", &mut self.max_iterations);
        coerce(&get, "TIMEOUT_SECONDS", &mut self.timeout_secs);

        flag(&get, "VERBOSE", &mut self.verbose);
        flag(&get, "ENABLE_WEB_SEARCH", &mut self.tools.web_search);
        flag(&get, "ENABLE_FILE_ACCESS", &mut self.tools.file_access);
        flag(&get, "ENABLE_CODE_ANALYSIS", &mut self.tools.code_analysis);

        if let Some(k) = get(ProviderKind::OpenAi.api_key_env()) {
            self.openai_api_key = Some(k);
        }
        if let Some(k) = get(ProviderKind::Gemini.api_key_env()) {
            self.gemini_api_key = Some(k);
        }
        Ok(())
    }

    /// Put values the agent cannot run with back to their defaults.
    fn reset_out_of_range(&mut self) {
        if !(0.0..=2.0).contains(&self.temperature) {
            tracing::warn!(
                value = self.temperature,
                "temperature must be between 0.0 and 2.0, using default"
            );
            self.temperature = default_temperature();
        }
        if self.max_iterations == 0 {
            tracing::warn!("max_iterations must be at least 1, using default");
            self.max_iterations = default_max_iterations();
        }
        if self.max_tokens == 0 {
            tracing::warn!("max_tokens must be at least 1, using default");
            self.max_tokens = default_max_tokens();
        }
        if self.timeout_secs == 0 {
            tracing::warn!("timeout_secs must be at least 1, using default");
            self.timeout_secs = default_timeout_secs();
        }
    }

    /// The API key for `provider`, or a startup error naming the variable.
    pub fn api_key_for(&self, provider: ProviderKind) -> Result<&str, ConfigError> {
        let key = match provider {
            ProviderKind::OpenAi => self.openai_api_key.as_deref(),
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
        };
        key.ok_or(ConfigError::MissingApiKey(provider))
    }

    /// The model to use with `provider`.
    pub fn model_for(&self, provider: ProviderKind) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string())
    }

    /// Build the immutable per-agent settings.
    pub fn agent_config(&self, provider: ProviderKind, verbose: bool) -> AgentConfig {
        AgentConfig {
            provider,
            model: self.model_for(provider),
            temperature: self.temperature,
            max_iterations: self.max_iterations,
            max_tokens: Some(self.max_tokens),
            verbose,
        }
    }
}

/// Merge `.env` entries into the process environment without replacing
/// variables that are already set. `None` searches the working directory
/// and its parents.
fn merge_env_file(path: Option<&Path>) {
    let loaded = match path {
        Some(p) => dotenvy::from_path(p).map(|()| p.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(file) => tracing::debug!(path = %file.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
}

fn coerce<T, G>(get: &G, key: &str, slot: &mut T)
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(key) {
        match raw.trim().parse() {
            Ok(v) => *slot = v,
            Err(_) => tracing::warn!(key, value = %raw, "Ignoring unparsable setting"),
        }
    }
}

fn flag<G>(get: &G, key: &str, slot: &mut bool)
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(key) {
        *slot = raw.trim().eq_ignore_ascii_case("true");
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_iterations: default_max_iterations(),
            timeout_secs: default_timeout_secs(),
            verbose: true,
            tools: ToolsConfig::default(),
            openai_api_key: None,
            gemini_api_key: None,
        }
    }
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("{0}")]
    UnknownProvider(String),

    #[error(
        "{} API key not found. Set {} in your environment or .env file (get one at {})",
        .0,
        .0.api_key_env(),
        .0.key_url()
    )]
    MissingApiKey(ProviderKind),
}
