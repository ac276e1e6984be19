//! Prompt template: the agent's role plus the per-task instruction.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the task text.
pub const TASK_PLACEHOLDER: &str = "{task}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Role description, sent as the system message
    pub system: String,

    /// Per-task instruction containing [`TASK_PLACEHOLDER`]
    pub task: String,

    /// Sent when the iteration cap is hit and a final answer is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            task: task.into(),
            reflection: None,
        }
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }

    pub fn render_system(&self) -> &str {
        &self.system
    }

    /// Substitute the task text. The task is inserted verbatim.
    pub fn render_task(&self, task: &str) -> String {
        self.task.replace(TASK_PLACEHOLDER, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_task_verbatim() {
        let t = PromptTemplate::new("sys", "Task: {task}\nGo.");
        assert_eq!(t.render_task("count {words}"), "Task: count {words}\nGo.");
    }

    #[test]
    fn empty_task_is_passed_through() {
        let t = PromptTemplate::new("sys", "Task: {task}");
        assert_eq!(t.render_task("   "), "Task:    ");
    }
}
