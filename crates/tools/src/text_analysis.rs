//! Text statistics tool. Token-level heuristics, no NLP.

use async_trait::async_trait;
use research_agent_core::tool::{Tool, ToolResult};

/// Paragraphs summarized by the `keypoints` analysis.
const MAX_KEY_POINTS: usize = 5;

pub struct TextAnalysisTool;

#[async_trait]
impl Tool for TextAnalysisTool {
    fn name(&self) -> &str {
        "analyze_text"
    }

    fn description(&self) -> &str {
        "Analyze text content: count words, sentences and lines, or extract key points \
         (the first sentence of each paragraph)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text to analyze"
                },
                "analysis_type": {
                    "type": "string",
                    "enum": ["summary", "keypoints", "sentiment"],
                    "description": "Type of analysis (default 'summary')"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        let text = arguments["text"].as_str().unwrap_or_default();
        let analysis_type = arguments["analysis_type"].as_str().unwrap_or("summary");
        analyze(text, analysis_type)
    }
}

fn analyze(text: &str, analysis_type: &str) -> ToolResult {
    if text.trim().is_empty() {
        return ToolResult::failure("Error: Empty text provided");
    }

    let words = text.split_whitespace().count();
    let sentences = text.split('.').filter(|s| !s.trim().is_empty()).count();
    let lines = text.split('\n').count();

    let mut output = format!(
        "Text Analysis ({analysis_type}):\n- Words: {words}\n- Sentences: {sentences}\n- Lines: {lines}\n"
    );

    if analysis_type == "keypoints" {
        let paragraphs: Vec<&str> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        output.push_str(&format!("\nKey Points ({} paragraphs):\n", paragraphs.len()));
        for (i, para) in paragraphs.iter().take(MAX_KEY_POINTS).enumerate() {
            let first = para.split('.').next().unwrap_or_default();
            output.push_str(&format!("{}. {first}.\n", i + 1));
        }
    }

    ToolResult::ok(output).with_data(serde_json::json!({
        "words": words,
        "sentences": sentences,
        "lines": lines,
    }))
}
