//! Google Gemini provider.
//!
//! Uses the native `generateContent` API:
//! - `x-goog-api-key` header authentication
//! - system prompt as a top-level `systemInstruction`
//! - tool use through `functionCall` / `functionResponse` parts
//!
//! Gemini has no tool-call ids. Ids are minted here when the model calls a
//! function, and tool results are matched back to the function name through
//! the preceding assistant turn.

use async_trait::async_trait;
use research_agent_core::error::ProviderError;
use research_agent_core::message::{Message, MessageToolCall, Role, tool_name_for_call};
use research_agent_core::provider::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::http;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client: http::client(timeout)?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Join all system messages into one instruction.
    fn extract_system(messages: &[Message]) -> Option<Content> {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        (!system.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part::text(system.join("\n\n"))],
        })
    }

    /// Convert the non-system messages into `contents`.
    ///
    /// Consecutive tool results are folded into one `user` turn, as Gemini
    /// expects every function response for a turn together.
    fn to_contents(messages: &[Message]) -> Vec<Content> {
        let mut contents: Vec<Content> = Vec::new();

        for (idx, msg) in messages.iter().enumerate() {
            match msg.role {
                Role::System => {}
                Role::User => contents.push(Content {
                    role: Some("user".into()),
                    parts: vec![Part::text(msg.content.clone())],
                }),
                Role::Assistant => {
                    let mut parts = Vec::new();
                    if !msg.content.is_empty() {
                        parts.push(Part::text(msg.content.clone()));
                    }
                    for tc in &msg.tool_calls {
                        let args: serde_json::Value =
                            serde_json::from_str(&tc.arguments).unwrap_or_else(|_| serde_json::json!({}));
                        parts.push(Part {
                            function_call: Some(FunctionCall {
                                name: tc.name.clone(),
                                args,
                            }),
                            ..Part::default()
                        });
                    }
                    if parts.is_empty() {
                        parts.push(Part::text(String::new()));
                    }
                    contents.push(Content {
                        role: Some("model".into()),
                        parts,
                    });
                }
                Role::Tool => {
                    let call_id = msg.tool_call_id.as_deref().unwrap_or_default();
                    let name = tool_name_for_call(&messages[..idx], call_id)
                        .unwrap_or(call_id)
                        .to_string();
                    let part = Part {
                        function_response: Some(FunctionResponse {
                            name,
                            response: serde_json::json!({ "content": msg.content }),
                        }),
                        ..Part::default()
                    };

                    let previous_is_tool = idx > 0 && messages[idx - 1].role == Role::Tool;
                    if previous_is_tool && !contents.is_empty() {
                        let last = contents.len() - 1;
                        contents[last].parts.push(part);
                    } else {
                        contents.push(Content {
                            role: Some("user".into()),
                            parts: vec![part],
                        });
                    }
                }
            }
        }

        contents
    }

    fn build_body(request: &ProviderRequest) -> serde_json::Value {
        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }
        if !request.stop.is_empty() {
            generation_config["stopSequences"] = serde_json::json!(request.stop);
        }

        let mut body = serde_json::json!({
            "contents": Self::to_contents(&request.messages),
            "generationConfig": generation_config,
        });

        if let Some(system) = Self::extract_system(&request.messages) {
            body["systemInstruction"] = serde_json::json!(system);
        }

        if !request.tools.is_empty() {
            let declarations: Vec<serde_json::Value> = request
                .tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    })
                })
                .collect();
            body["tools"] = serde_json::json!([{ "functionDeclarations": declarations }]);
        }

        body
    }

    fn into_provider_response(
        api: GenerateResponse,
        requested_model: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let candidate = api.candidates.into_iter().next().ok_or_else(|| {
            let reason = api
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("Prompt blocked: {r}"))
                .unwrap_or_else(|| "No candidates in response".into());
            ProviderError::ApiError {
                status_code: 200,
                message: reason,
            }
        })?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(fc) = part.function_call {
                tool_calls.push(MessageToolCall {
                    id: format!("call_{}", uuid::Uuid::new_v4().simple()),
                    name: fc.name,
                    arguments: fc.args.to_string(),
                });
            }
        }

        let mut message = Message::assistant(text);
        message.tool_calls = tool_calls;

        let usage = api.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(ProviderResponse {
            message,
            usage,
            model: api.model_version.unwrap_or_else(|| requested_model.to_string()),
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );
        let body = Self::build_body(&request);

        debug!(
            provider = "gemini",
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(http::transport_error)?;

        let response = http::check_status("Gemini", response).await?;

        let api: GenerateResponse = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse Gemini response: {e}"),
        })?;

        Self::into_provider_response(api, &request.model)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/v1beta/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(http::transport_error)?;

        Ok(response.status().is_success())
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
