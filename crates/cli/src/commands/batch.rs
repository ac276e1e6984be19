//! `research-agent --batch <file>`: run every task in a file.

use research_agent_agent::{ResearchAgent, RunResult};
use std::path::Path;
use std::process::ExitCode;

/// One task per line; blank lines are skipped.
pub fn parse_tasks(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub async fn run(
    agent: &mut ResearchAgent,
    path: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read batch file {}: {e}", path.display()))?;

    let tasks = parse_tasks(&contents);
    if tasks.is_empty() {
        return Err(format!("No tasks found in {}", path.display()).into());
    }

    tracing::info!(tasks = tasks.len(), file = %path.display(), "Running batch");
    let results = agent.run_batch(&tasks).await;

    println!("{}", summary(&tasks, &results));

    if results.iter().all(|r| r.success) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn summary(tasks: &[String], results: &[RunResult]) -> String {
    let total = results.len();
    let passed = results.iter().filter(|r| r.success).count();

    let mut out = format!("\nBatch complete: {passed}/{total} tasks succeeded\n");
    for (i, (task, result)) in tasks.iter().zip(results).enumerate() {
        let mark = if result.success { "✅" } else { "❌" };
        out.push_str(&format!("\n[{}/{total}] {mark} {task}\n{}\n", i + 1, result.output));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn result(output: &str, success: bool) -> RunResult {
        RunResult {
            output: output.into(),
            metrics: Map::new(),
            success,
            error: (!success).then(|| output.trim_start_matches("Error: ").to_string()),
        }
    }

    #[test]
    fn blank_lines_are_skipped() {
        let tasks = parse_tasks("first task\n\n   \n  second task  \r\nthird\n");
        assert_eq!(tasks, vec!["first task", "second task", "third"]);
    }

    #[test]
    fn empty_file_has_no_tasks() {
        assert!(parse_tasks("\n \n").is_empty());
    }

    #[test]
    fn summary_marks_each_task() {
        let tasks = vec!["a".to_string(), "b".to_string()];
        let results = vec![result("answer a", true), result("Error: boom", false)];
        let out = summary(&tasks, &results);

        assert!(out.contains("Batch complete: 1/2 tasks succeeded"));
        assert!(out.contains("[1/2] ✅ a\nanswer a"));
        assert!(out.contains("[2/2] ❌ b\nError: boom"));
    }
}
