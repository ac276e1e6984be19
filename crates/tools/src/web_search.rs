//! Web search tool backed by the DuckDuckGo Instant Answer API.
//!
//! The API needs no key. It returns an abstract plus a list of related
//! topics, which are flattened into a short text digest for the model.

use async_trait::async_trait;
use research_agent_core::tool::{Tool, ToolResult, required_str};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_SEARCH_URL: &str = "https://api.duckduckgo.com/";

const DEFAULT_MAX_RESULTS: usize = 5;
const USER_AGENT: &str = "Mozilla/5.0 (compatible; research-agent/0.1)";

pub struct WebSearchTool {
    base_url: String,
    client: reqwest::Client,
}

impl WebSearchTool {
    /// A search tool querying `base_url` with requests bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to a default HTTP client for web search");
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_URL, Duration::from_secs(10))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information about a given query. Returns a summary and related information."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query string"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of related results to return (default 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        let query = match required_str(&arguments, "query") {
            Ok(q) => q,
            Err(e) => return ToolResult::failure(format!("Error during search: {e}")),
        };
        let max_results = arguments["max_results"]
            .as_u64()
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        debug!(query, max_results, "Searching the web");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => return ToolResult::failure(format!("Error during search: {e}")),
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return ToolResult::failure(format!(
                "Search failed with status code {}",
                status.as_u16()
            ));
        }

        // DuckDuckGo may answer with `application/x-javascript`; parse the text.
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return ToolResult::failure(format!("Error during search: {e}")),
        };
        match serde_json::from_str::<InstantAnswer>(&body) {
            Ok(answer) => ToolResult::ok(format_results(query, &answer, max_results)),
            Err(e) => ToolResult::failure(format!("Error during search: {e}")),
        }
    }
}

/// The parts of an Instant Answer response the digest uses.
#[derive(Debug, Default, Deserialize)]
pub struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    pub abstract_text: String,

    #[serde(rename = "RelatedTopics", default)]
    pub related_topics: Vec<RelatedTopic>,
}

/// A related topic. Category groups carry no `Text` and are skipped.
#[derive(Debug, Default, Deserialize)]
pub struct RelatedTopic {
    #[serde(rename = "Text", default)]
    pub text: Option<String>,
}

/// Render the digest shown to the model.
pub fn format_results(query: &str, answer: &InstantAnswer, max_results: usize) -> String {
    let related: Vec<&str> = answer
        .related_topics
        .iter()
        .take(max_results)
        .filter_map(|t| t.text.as_deref())
        .filter(|t| !t.is_empty())
        .collect();

    if answer.abstract_text.is_empty() && related.is_empty() {
        return format!("No results found for '{query}'.");
    }

    let mut output = format!("Search Results for '{query}':\n\n");
    if !answer.abstract_text.is_empty() {
        output.push_str(&format!("Summary: {}\n\n", answer.abstract_text));
    }
    if !related.is_empty() {
        output.push_str("Related Information:\n");
        for text in related {
            output.push_str(&format!("- {text}\n"));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    fn answer(json: &str) -> InstantAnswer {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn digest_with_summary_and_topics() {
        let a = answer(
            r#"{
                "AbstractText": "Rust is a systems programming language.",
                "RelatedTopics": [
                    {"Text": "Cargo - the Rust package manager", "FirstURL": "https://x"},
                    {"Name": "Category", "Topics": []},
                    {"Text": "rustc - the compiler"}
                ]
            }"#,
        );
        let out = format_results("rust", &a, 5);
        assert!(out.starts_with("Search Results for 'rust':\n\n"));
        assert!(out.contains("Summary: Rust is a systems programming language.\n\n"));
        assert!(out.contains("Related Information:\n- Cargo - the Rust package manager\n- rustc - the compiler\n"));
    }

    #[test]
    fn max_results_limits_topics() {
        let a = answer(r#"{"RelatedTopics": [{"Text": "one"}, {"Text": "two"}, {"Text": "three"}]}"#);
        let out = format_results("n", &a, 2);
        assert!(out.contains("- two"));
        assert!(!out.contains("- three"));
        assert!(!out.contains("Summary:"));
    }

    #[test]
    fn empty_answer_reports_no_results() {
        let out = format_results("zzzz", &InstantAnswer::default(), 5);
        assert_eq!(out, "No results found for 'zzzz'.");
    }

    #[tokio::test]
    async fn search_round_trip_builds_digest() {
        let (base, seen) = serve_once(
            200,
            r#"{"AbstractText": "Tokio is an async runtime.", "RelatedTopics": [{"Text": "Mio - I/O"}]}"#,
        )
        .await;
        let tool = WebSearchTool::new(base, Duration::from_secs(5));

        let result = tool.execute(serde_json::json!({"query": "tokio"})).await;
        assert!(result.success);
        assert_eq!(
            result.output,
            "Search Results for 'tokio':\n\nSummary: Tokio is an async runtime.\n\nRelated Information:\n- Mio - I/O\n"
        );

        let request_line = seen.await.unwrap();
        assert!(request_line.starts_with("GET /?"));
        assert!(request_line.contains("q=tokio"));
        assert!(request_line.contains("format=json"));
        assert!(request_line.contains("no_html=1"));
    }

    #[tokio::test]
    async fn server_error_reports_status() {
        let (base, _) = serve_once(503, "unavailable").await;
        let tool = WebSearchTool::new(base, Duration::from_secs(5));

        let result = tool.execute(serde_json::json!({"query": "rust"})).await;
        assert!(!result.success);
        assert_eq!(result.output, "Search failed with status code 503");
    }

    #[tokio::test]
    async fn non_ok_success_status_reports_status() {
        let (base, _) = serve_once(204, "").await;
        let tool = WebSearchTool::new(base, Duration::from_secs(5));

        let result = tool.execute(serde_json::json!({"query": "rust"})).await;
        assert!(!result.success);
        assert_eq!(result.output, "Search failed with status code 204");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_reported_as_text() {
        let tool = WebSearchTool::new("http://127.0.0.1:9/", Duration::from_secs(2));
        let result = tool.execute(serde_json::json!({"query": "rust"})).await;
        assert!(!result.success);
        assert!(result.output.starts_with("Error during search:"));
    }

    #[tokio::test]
    async fn missing_query_is_reported_as_text() {
        let result = WebSearchTool::default().execute(serde_json::json!({})).await;
        assert!(!result.success);
        assert!(result.output.contains("query"));
    }

    #[test]
    fn tool_definition() {
        let def = WebSearchTool::default().to_definition();
        assert_eq!(def.name, "web_search");
        assert_eq!(def.parameters["required"][0], "query");
    }
}
