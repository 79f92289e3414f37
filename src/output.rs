//! Terminal rendering
//!
//! Prints formatted answer blocks, hint lists, quizzes, and the history
//! view. Inline `$...$` math spans are styled the way the original web
//! client italicized them.

use colored::*;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::types::Quiz;
use crate::format::{BlockKind, FormattedBlock};
use crate::history::HistoryEntry;

static MATH_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(.*?)\$").expect("valid regex"));

/// Style inline `$...$` spans in a body line.
fn style_math(line: &str) -> String {
    MATH_SPAN
        .replace_all(line, |caps: &regex::Captures<'_>| {
            caps[1].cyan().italic().to_string()
        })
        .into_owned()
}

/// Print a sequence of formatted answer blocks.
pub fn print_blocks(blocks: &[FormattedBlock]) {
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if let Some(title) = &block.title {
            println!("{}", title.bright_blue().bold());
        }
        match block.kind {
            BlockKind::Bullets => {
                for line in &block.lines {
                    println!("  {} {}", "•".bright_blue(), style_math(line));
                }
            }
            BlockKind::Numbered => {
                for (n, line) in block.lines.iter().enumerate() {
                    println!("  {} {}", format!("{}.", n + 1).bright_blue(), style_math(line));
                }
            }
            BlockKind::Paragraphs => {
                for line in &block.lines {
                    println!("  {}", style_math(line));
                }
            }
        }
    }
}

/// Print a hint list, one bullet per hint.
pub fn print_hints(hints: &[String]) {
    if hints.is_empty() {
        println!("{}", "No hints available.".dimmed());
        return;
    }
    println!("{}", "Hints".bright_blue().bold());
    for hint in hints {
        println!("  {} {}", "•".bright_blue(), hint);
    }
}

/// Print a quiz question and its numbered options.
pub fn print_quiz(quiz: &Quiz) {
    println!("{} {}", "Q:".bright_blue().bold(), quiz.question);
    for (i, option) in quiz.options.iter().enumerate() {
        println!("  {} {}", format!("{})", i + 1).bright_blue(), option);
    }
}

pub fn print_quiz_feedback(correct: bool) {
    if correct {
        println!("{}", "Correct!".bright_green().bold());
    } else {
        println!("{}", "Try again!".bright_red().bold());
    }
}

/// Print the history view, newest first.
pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No past questions yet.".dimmed());
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let when = entry
            .asked_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{} {}  {}",
            "Q:".bright_blue().bold(),
            entry.question,
            when.dimmed()
        );
        print_blocks(&crate::format::render_answer_sections(&entry.formatted_text));
    }
}

/// Pretty-print an opaque JSON result (the `/parse` response).
pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_math_wraps_span() {
        colored::control::set_override(false);
        let styled = style_math("solve $2x + 3 = 7$ for x");
        assert_eq!(styled, "solve 2x + 3 = 7 for x");
    }

    #[test]
    fn test_style_math_multiple_spans() {
        colored::control::set_override(false);
        let styled = style_math("$a$ and $b$");
        assert_eq!(styled, "a and b");
    }

    #[test]
    fn test_style_math_no_span_unchanged() {
        colored::control::set_override(false);
        let line = "no math here";
        assert_eq!(style_math(line), line);
    }
}
