//! File read tool: returns a text file's contents.

use async_trait::async_trait;
use research_agent_core::tool::{Tool, ToolResult, required_str};

pub struct FileReadTool;

#[async_trait]
impl Tool for FileReadTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a UTF-8 text file."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the file to read"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        let path = match required_str(&arguments, "file_path") {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(format!("Error reading file: {e}")),
        };

        match tokio::fs::read_to_string(path).await {
            Ok(content) => ToolResult::ok(format!("File Contents ({path}):\n{content}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ToolResult::failure(format!("Error: File not found - {path}"))
            }
            Err(e) => ToolResult::failure(format!("Error reading file: {e}")),
        }
    }
}
