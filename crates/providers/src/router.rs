//! Provider factory: picks the backend for a [`ProviderKind`].

use std::sync::Arc;
use std::time::Duration;

use research_agent_config::{AppConfig, ConfigError};
use research_agent_core::agent::ProviderKind;
use research_agent_core::error::{Error, ProviderError};
use research_agent_core::provider::Provider;

use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;

/// Build a provider client for `kind`.
pub fn build_provider(
    kind: ProviderKind,
    api_key: &str,
    timeout: Duration,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let provider: Arc<dyn Provider> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(api_key, timeout)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(api_key, timeout)?),
    };
    tracing::debug!(provider = %kind, timeout_secs = timeout.as_secs(), "Provider client built");
    Ok(provider)
}

/// Build the provider for `kind` using the key and timeout from `config`.
///
/// A missing key is a configuration error naming the variable to set.
pub fn build_from_config(config: &AppConfig, kind: ProviderKind) -> Result<Arc<dyn Provider>, Error> {
    let api_key = config.api_key_for(kind).map_err(config_error)?;
    let provider = build_provider(kind, api_key, Duration::from_secs(config.timeout_secs))?;
    Ok(provider)
}

fn config_error(err: ConfigError) -> Error {
    Error::Config {
        message: err.to_string(),
    }
}
