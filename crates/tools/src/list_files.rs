//! Directory listing tool.

use async_trait::async_trait;
use research_agent_core::tool::{Tool, ToolResult};

/// Entries shown before the listing is cut off.
const MAX_ENTRIES: usize = 20;

pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List the files and directories in a directory (default: the current directory)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory path to list (default '.')"
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        let directory = arguments["directory"].as_str().unwrap_or(".");

        match list_directory(directory).await {
            Ok(output) => ToolResult::ok(output),
            Err(e) => ToolResult::failure(format!("Error listing directory: {e}")),
        }
    }
}

async fn list_directory(directory: &str) -> std::io::Result<String> {
    let mut reader = tokio::fs::read_dir(directory).await?;
    let mut entries: Vec<(String, bool)> = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        // follows symlinks, like a path-based is-dir check
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        entries.push((name, is_dir));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut output = format!("Files in {directory}:\n");
    for (name, is_dir) in entries.iter().take(MAX_ENTRIES) {
        if *is_dir {
            output.push_str(&format!("[dir] {name}/\n"));
        } else {
            output.push_str(&format!("[file] {name}\n"));
        }
    }
    if entries.len() > MAX_ENTRIES {
        output.push_str(&format!("... and {} more items", entries.len() - MAX_ENTRIES));
    }
    Ok(output)
}
