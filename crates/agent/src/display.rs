//! Console progress output for verbose runs.
//!
//! Purely observational: these write to stdout and never affect results.

use serde_json::{Map, Value};

const RULE_WIDTH: usize = 60;

pub fn print_section(title: &str, content: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{rule}");
    println!("  {title}");
    println!("{rule}");
    if !content.is_empty() {
        println!("{content}");
    }
}

pub fn print_thinking(message: &str) {
    println!("\n🤔 {message}");
}

pub fn print_action(message: &str) {
    println!("\n⚡ {message}");
}

pub fn print_result(message: &str) {
    println!("\n✅ {message}");
}

/// Cut `text` to `max_chars` characters, marking the cut with `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// One `  key: value` line per metric. Strings are shown bare and lists
/// comma-separated.
pub fn format_metrics(metrics: &Map<String, Value>) -> String {
    metrics
        .iter()
        .map(|(key, value)| format!("  {key}: {}", display_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
