//! Answer Formatter
//!
//! Converts a backend [`AnswerPayload`] into display text, then splits that
//! text into typed blocks for terminal rendering. Two steps:
//! - [`build_formatted_text`]: normalize any payload shape to a single
//!   string (structured fields are emitted as titled sections).
//! - [`render_answer_sections`]: split the string into titled blocks of
//!   bullets, numbered items, or paragraphs.
//!
//! Convention: a block title is everything before the first colon on the
//! block's first line; bullet items use a `- ` marker. Error answers are
//! normalized to `Error:\n<message>` so they render through the same path.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::api::types::{AnswerPayload, StructuredAnswer};

/// Runs of two-or-more newlines separate blocks.
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

/// A leading `<integer>. ` marker on a numbered-list line.
static NUMBERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\. ").expect("valid regex"));

/// How the body lines of a block should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Bullets,
    Numbered,
    Paragraphs,
}

/// One renderable chunk of answer text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedBlock {
    pub title: Option<String>,
    pub kind: BlockKind,
    pub lines: Vec<String>,
}

/// Step A: normalize an answer payload to a single display string.
///
/// Plain strings and payloads with a non-empty `text` field pass through
/// unchanged. Structured payloads are flattened into titled sections in a
/// fixed order. Anything unrecognized is pretty-printed as JSON so every
/// payload produces displayable text; `null` yields an empty string.
pub fn build_formatted_text(payload: &AnswerPayload) -> String {
    match payload {
        AnswerPayload::Text(text) => text.clone(),
        AnswerPayload::Structured(answer) => {
            if let Some(text) = answer.text.as_deref() {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
            let sections = structured_sections(answer);
            if sections.is_empty() {
                pretty_dump(payload)
            } else {
                sections.join("\n\n")
            }
        }
        AnswerPayload::Other(value) if value.is_null() => String::new(),
        AnswerPayload::Other(_) => pretty_dump(payload),
    }
}

/// Emit the recognized structured fields, in fixed order, as titled
/// section strings.
fn structured_sections(answer: &StructuredAnswer) -> Vec<String> {
    let mut sections = Vec::new();

    if let Some(definition) = answer.definition.as_deref() {
        sections.push(format!("Definition:\n{}", definition));
    }
    if let Some(explanation) = answer.simple_explanation.as_deref() {
        sections.push(format!("Simple Explanation:\n{}", explanation));
    }
    if let Some(examples) = answer.examples.as_deref() {
        if !examples.is_empty() {
            let mut section = String::from("Examples:\n");
            let items: Vec<String> = examples
                .iter()
                .enumerate()
                .map(|(i, example)| format!("{}. {}", i + 1, example))
                .collect();
            section.push_str(&items.join("\n"));
            sections.push(section);
        }
    }
    if let Some(formula) = answer.formula.as_deref() {
        sections.push(format!("Formula:\n{}", formula));
    }
    if let Some(takeaways) = answer.key_takeaways.as_deref() {
        if !takeaways.is_empty() {
            let mut section = String::from("Key Takeaways:\n");
            let items: Vec<String> = takeaways
                .iter()
                .map(|item| format!("- {}", item))
                .collect();
            section.push_str(&items.join("\n"));
            sections.push(section);
        }
    }

    sections
}

/// Structural dump fallback. Serialization of a payload we already hold in
/// memory cannot fail; the Debug form is the last resort.
fn pretty_dump(payload: &AnswerPayload) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| format!("{:?}", payload))
}

/// Step B: split normalized answer text into typed display blocks.
pub fn render_answer_sections(text: &str) -> Vec<FormattedBlock> {
    BLOCK_SEPARATOR
        .split(text)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(render_block)
        .collect()
}

fn render_block(chunk: &str) -> FormattedBlock {
    let mut lines = chunk.split('\n');
    let first = lines.next().unwrap_or_default();

    let (title, mut body): (Option<String>, Vec<&str>) = match first.split_once(':') {
        Some((head, rest)) if !head.trim().is_empty() => {
            (Some(head.trim().to_string()), vec![rest])
        }
        _ => (None, vec![first]),
    };
    body.extend(lines);

    let body: Vec<&str> = body
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let kind = classify(&body);
    let lines = body
        .into_iter()
        .map(|line| match kind {
            BlockKind::Bullets => line.strip_prefix("- ").unwrap_or(line).to_string(),
            BlockKind::Numbered => NUMBERED_MARKER.replace(line, "").into_owned(),
            BlockKind::Paragraphs => line.to_string(),
        })
        .collect();

    FormattedBlock { title, kind, lines }
}

fn classify(body: &[&str]) -> BlockKind {
    if body.len() > 1 && body.iter().all(|line| line.starts_with("- ")) {
        BlockKind::Bullets
    } else if body.len() > 1 && body.iter().all(|line| NUMBERED_MARKER.is_match(line)) {
        BlockKind::Numbered
    } else {
        BlockKind::Paragraphs
    }
}
