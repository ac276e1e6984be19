//! Code review tool: line-level lint heuristics.

use async_trait::async_trait;
use research_agent_core::tool::{Tool, ToolResult, required_str};

const MAX_LINE_CHARS: usize = 100;
const MAX_ISSUES: usize = 5;

const SUGGESTIONS: &str = "\nSuggestions:\n\
- Add type hints for better clarity\n\
- Include docstrings for functions\n\
- Add error handling where needed\n";

pub struct CodeReviewTool;

#[async_trait]
impl Tool for CodeReviewTool {
    fn name(&self) -> &str {
        "code_review"
    }

    fn description(&self) -> &str {
        "Analyze code for potential issues (long lines, TODO/FIXME markers) and suggest improvements."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Code snippet to review"
                },
                "language": {
                    "type": "string",
                    "description": "Programming language (default 'python')"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        match required_str(&arguments, "code") {
            Ok(code) => {
                let language = arguments["language"].as_str().unwrap_or("python");
                ToolResult::ok(review(code, language))
            }
            Err(e) => e.into(),
        }
    }
}

/// Produce the review text for `code`.
pub fn review(code: &str, language: &str) -> String {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut feedback = format!("Code Review ({language}):\n\nLines of code: {}\n", lines.len());

    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;
        let width = line.chars().count();
        if width > MAX_LINE_CHARS {
            issues.push(format!("Line {n}: Long line detected ({width} chars)"));
        }
        if line.contains("TODO") || line.contains("FIXME") {
            issues.push(format!("Line {n}: TODO/FIXME found - {}", line.trim()));
        }
    }

    if issues.is_empty() {
        feedback.push_str("\nNo major issues detected.\n");
    } else {
        feedback.push_str("\nPotential Issues:\n");
        for issue in issues.iter().take(MAX_ISSUES) {
            feedback.push_str(&format!("- {issue}\n"));
        }
    }

    feedback.push_str(SUGGESTIONS);
    feedback
}
