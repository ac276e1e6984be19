//! Interactive mode: read tasks from stdin until the user quits.

use research_agent_agent::ResearchAgent;
use research_agent_agent::display::print_section;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Empty,
    Task(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        Input::Empty
    } else if ["quit", "exit", "q"]
        .iter()
        .any(|word| line.eq_ignore_ascii_case(word))
    {
        Input::Quit
    } else {
        Input::Task(line)
    }
}

fn goodbye() {
    println!();
    println!("  Goodbye! 👋");
    println!();
}

pub async fn run(agent: &mut ResearchAgent) -> Result<(), Box<dyn std::error::Error>> {
    let status = agent.status();

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║      Research Agent: Interactive Mode        ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", status.provider);
    println!("  Model:     {}", status.model);
    println!("  Tools:     {}", status.tools.join(", "));
    println!();
    println!("  Type 'quit', 'exit' or 'q' to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        print!("Enter your task: ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                goodbye();
                return Ok(());
            }
        };

        // EOF
        let Some(line) = line else {
            goodbye();
            return Ok(());
        };

        match classify(&line) {
            Input::Quit => {
                goodbye();
                return Ok(());
            }
            Input::Empty => println!("⚠️  Please enter a task"),
            Input::Task(task) => {
                println!("\n⏳ Processing...");
                let result = tokio::select! {
                    result = agent.run(task) => result,
                    _ = tokio::signal::ctrl_c() => {
                        goodbye();
                        return Ok(());
                    }
                };
                if result.success {
                    print_section("RESULT", &result.output);
                } else {
                    println!(
                        "❌ Error: {}",
                        result.error.as_deref().unwrap_or("Unknown error")
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_words_are_case_insensitive() {
        for word in ["quit", "EXIT", "Q", "  exit  "] {
            assert_eq!(classify(word), Input::Quit);
        }
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(classify(""), Input::Empty);
        assert_eq!(classify("   \t"), Input::Empty);
    }

    #[test]
    fn anything_else_is_a_task() {
        assert_eq!(classify("  What is Rust?\n"), Input::Task("What is Rust?"));
        assert_eq!(classify("quitting time"), Input::Task("quitting time"));
    }
}
