//! Study-buddy session
//!
//! Owns the ask/answer loop: an explicit request state machine gates
//! submission (one outstanding request at a time), backend failures are
//! converted into renderable error answers, and successful exchanges are
//! recorded to the history store. All mutation happens on the calling task;
//! the outstanding request is awaited inline.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::api::types::{AnswerPayload, Quiz};
use crate::api::StudyBackend;
use crate::errors::StudydeskError;
use crate::format::{build_formatted_text, render_answer_sections, FormattedBlock};
use crate::history::HistoryStore;
use crate::output;

/// Fixed message shown when the backend is unreachable.
pub const CONNECT_ERROR_MESSAGE: &str =
    "Could not connect to the server. Please try again later.";

/// Lifecycle of the current ask request. Submission is permitted in every
/// state except `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Failed,
}

impl RequestState {
    pub fn can_submit(&self) -> bool {
        !matches!(self, RequestState::Pending)
    }
}

/// Result of one ask: the renderable blocks, and whether the exchange was
/// recorded to history (failures are shown but never recorded).
#[derive(Debug)]
pub struct AskOutcome {
    pub blocks: Vec<FormattedBlock>,
    pub recorded: bool,
}

pub struct StudySession {
    backend: Box<dyn StudyBackend>,
    history: HistoryStore,
    state: RequestState,
}

impl StudySession {
    pub fn new(backend: Box<dyn StudyBackend>, history: HistoryStore) -> Self {
        Self {
            backend,
            history,
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    /// Ask the study buddy one question.
    ///
    /// Backend failures do not propagate: connectivity failures render the
    /// fixed connect message, application failures render the backend's own
    /// message, both as ordinary formatted blocks. Only history persistence
    /// failures surface as errors.
    pub async fn ask(&mut self, question: &str) -> Result<AskOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(AskOutcome {
                blocks: Vec::new(),
                recorded: false,
            });
        }
        if !self.state.can_submit() {
            return Err(StudydeskError::Internal(
                "a request is already pending".to_string(),
            )
            .into());
        }

        self.state = RequestState::Pending;
        debug!("asking: {}", question);

        match self.backend.ask(question).await {
            Ok(payload) => {
                let text = build_formatted_text(&payload);
                let blocks = render_answer_sections(&text);
                self.history.record(question, payload)?;
                self.state = RequestState::Fulfilled;
                Ok(AskOutcome {
                    blocks,
                    recorded: true,
                })
            }
            Err(e) => {
                let message = if e.is_connectivity() {
                    CONNECT_ERROR_MESSAGE.to_string()
                } else {
                    e.to_string()
                };
                let payload = AnswerPayload::error(message);
                let blocks = render_answer_sections(&build_formatted_text(&payload));
                self.state = RequestState::Failed;
                Ok(AskOutcome {
                    blocks,
                    recorded: false,
                })
            }
        }
    }

    /// Interactive REPL: questions in, formatted answers out.
    /// Commands: `/history`, `/clear`, `/quit`.
    pub async fn run_chat(&mut self) -> Result<()> {
        println!("Study Buddy — ask me anything about math, science, etc.");
        println!("Commands: /history  /clear  /quit");

        let stdin = std::io::stdin();
        let mut input = String::new();
        loop {
            print!("? ");
            std::io::stdout().flush()?;
            input.clear();
            if stdin.lock().read_line(&mut input)? == 0 {
                break; // EOF
            }
            let line = input.trim();
            match line {
                "" => continue,
                "/quit" | "/exit" => break,
                "/history" => output::print_history(self.history.entries()),
                "/clear" => {
                    self.history.clear()?;
                    println!("History cleared.");
                }
                question => {
                    let outcome = self.ask(question).await?;
                    output::print_blocks(&outcome.blocks);
                }
            }
        }
        Ok(())
    }
}

/// Resolve a quiz answer typed by the user: either a 1-based option number
/// or the option text itself.
pub fn resolve_choice<'a>(quiz: &'a Quiz, input: &str) -> Option<&'a str> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        if n >= 1 {
            if let Some(option) = quiz.options.get(n - 1) {
                return Some(option.as_str());
            }
        }
    }
    quiz.options
        .iter()
        .find(|option| option.as_str() == input)
        .map(String::as_str)
}
