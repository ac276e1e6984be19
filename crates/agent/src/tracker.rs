//! Per-run execution metrics.

use research_agent_core::executor::ToolInvocation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Aggregate view of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    /// Seconds since the last reset, 2 dp
    pub total_time_secs: f64,
    pub iterations: usize,
    pub tool_calls: usize,
    /// Distinct tool names, sorted
    pub tools_used: Vec<String>,
    /// Mean tool duration in seconds, 2 dp; 0 with no calls
    pub average_tool_time_secs: f64,
}

/// Accumulates tool invocations for a single run. Reset before each task.
#[derive(Debug)]
pub struct ExecutionTracker {
    started: Instant,
    invocations: Vec<ToolInvocation>,
    iterations: usize,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            invocations: Vec::new(),
            iterations: 0,
        }
    }

    pub fn reset(&mut self) {
        self.started = Instant::now();
        self.invocations.clear();
        self.iterations = 0;
    }

    /// Record a call known only by name and duration.
    pub fn log_tool_call(&mut self, tool: impl Into<String>, duration: Duration) {
        self.invocations.push(ToolInvocation {
            tool: tool.into(),
            arguments: serde_json::Value::Null,
            output: String::new(),
            duration,
        });
    }

    pub fn log_invocation(&mut self, invocation: ToolInvocation) {
        self.invocations.push(invocation);
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    pub fn invocations(&self) -> &[ToolInvocation] {
        &self.invocations
    }

    pub fn get_metrics(&self) -> ExecutionMetrics {
        let tools_used: BTreeSet<&str> = self.invocations.iter().map(|i| i.tool.as_str()).collect();

        let average = if self.invocations.is_empty() {
            0.0
        } else {
            let total: f64 = self.invocations.iter().map(|i| i.duration.as_secs_f64()).sum();
            total / self.invocations.len() as f64
        };

        ExecutionMetrics {
            total_time_secs: round2(self.started.elapsed().as_secs_f64()),
            iterations: self.iterations,
            tool_calls: self.invocations.len(),
            tools_used: tools_used.into_iter().map(String::from).collect(),
            average_tool_time_secs: round2(average),
        }
    }
}

impl Default for ExecutionTracker {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
