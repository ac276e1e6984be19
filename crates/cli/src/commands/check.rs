//! `research-agent --check`: verify the selected provider is usable.

use research_agent_config::AppConfig;
use research_agent_core::agent::ProviderKind;
use research_agent_core::provider::Provider;
use std::process::ExitCode;

pub async fn run(config: &AppConfig, kind: ProviderKind) -> ExitCode {
    println!("🩺 Research Agent: provider check");
    println!("========================================\n");
    println!("  Provider: {kind}");
    println!("  Model:    {}", config.model_for(kind));

    let provider = match research_agent_providers::build_from_config(config, kind) {
        Ok(p) => p,
        Err(e) => {
            println!("  ❌ {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("  ✅ API key configured");

    let (ok, line) = report(provider.as_ref()).await;
    println!("  {line}");
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Ask the provider whether it accepts our credentials.
async fn report(provider: &dyn Provider) -> (bool, String) {
    match provider.health_check().await {
        Ok(true) => (true, format!("✅ {} is reachable", provider.name())),
        Ok(false) => (
            false,
            format!("❌ {} rejected the request; check the API key", provider.name()),
        ),
        Err(e) => (false, format!("❌ {} is unreachable: {e}", provider.name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_agent_core::error::ProviderError;
    use research_agent_core::provider::{ProviderRequest, ProviderResponse};

    struct Fixed(Result<bool, ProviderError>);

    #[async_trait::async_trait]
    impl Provider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("unused".into()))
        }

        async fn health_check(&self) -> Result<bool, ProviderError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn reachable_provider_passes() {
        let (ok, line) = report(&Fixed(Ok(true))).await;
        assert!(ok);
        assert_eq!(line, "✅ fixed is reachable");
    }

    #[tokio::test]
    async fn rejected_credentials_fail() {
        let (ok, line) = report(&Fixed(Ok(false))).await;
        assert!(!ok);
        assert!(line.contains("check the API key"));
    }

    #[tokio::test]
    async fn network_errors_fail() {
        let (ok, line) = report(&Fixed(Err(ProviderError::Network("refused".into())))).await;
        assert!(!ok);
        assert!(line.contains("unreachable"));
        assert!(line.contains("refused"));
    }
}
