//! Command-line interface
//!
//! Dispatches the study modes: one-shot problem parsing, hints, quizzes,
//! single questions, the interactive study-buddy chat, and history
//! management.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::io::Write;

use crate::api::{ApiClient, StudyBackend};
use crate::config::Config;
use crate::history::{FileStorage, HistoryStore};
use crate::output;
use crate::session::{resolve_choice, StudySession};
use crate::telemetry;

#[derive(Parser)]
#[command(name = "studydesk")]
#[command(about = "Terminal study assistant — hints, quizzes, and study-buddy Q&A")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Backend endpoint (overrides config)
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive study-buddy session (default)
    #[command(alias = "c")]
    Chat,

    /// Ask the study buddy one question
    #[command(alias = "a")]
    Ask {
        /// The question
        question: String,
    },

    /// Submit a problem for parsing
    #[command(alias = "p")]
    Parse {
        /// Problem text
        text: String,
    },

    /// Fetch solution hints for a problem
    Hints {
        /// Problem text
        text: String,
    },

    /// Take a quiz on a topic
    #[command(alias = "q")]
    Quiz {
        /// Topic or problem text
        text: String,
    },

    /// Show past questions and answers
    History,

    /// Clear the question/answer history
    Clear,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        telemetry::init_tracing_with_filter("debug");
    } else {
        telemetry::init_tracing();
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if cli.no_color || config.no_color {
        colored::control::set_override(false);
    }

    let storage = match &config.history_dir {
        Some(dir) => FileStorage::at(dir.clone())?,
        None => FileStorage::new()?,
    };
    let history = HistoryStore::open(Box::new(storage))?;
    let backend = ApiClient::new(&config.endpoint)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let mut session = StudySession::new(Box::new(backend), history);
            session.run_chat().await
        }
        Commands::Ask { question } => {
            let mut session = StudySession::new(Box::new(backend), history);
            let outcome = session.ask(&question).await?;
            output::print_blocks(&outcome.blocks);
            Ok(())
        }
        Commands::Parse { text } => {
            let parsed = backend.parse_problem(&text).await?;
            output::print_json(&parsed);
            Ok(())
        }
        Commands::Hints { text } => {
            let hints = backend.hints(&text).await?;
            output::print_hints(&hints);
            Ok(())
        }
        Commands::Quiz { text } => run_quiz(&backend, &text).await,
        Commands::History => {
            output::print_history(history.entries());
            Ok(())
        }
        Commands::Clear => {
            let mut history = history;
            history.clear()?;
            println!("History cleared.");
            Ok(())
        }
    }
}

/// One quiz round: show the question, read the user's pick, grade it.
async fn run_quiz(backend: &dyn StudyBackend, topic: &str) -> Result<()> {
    let quiz = backend.quiz(topic).await?;
    output::print_quiz(&quiz);

    print!("Your answer (number or text): ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    match resolve_choice(&quiz, &input) {
        Some(choice) => output::print_quiz_feedback(choice == quiz.correct),
        None => println!("{}", "That's not one of the options.".yellow()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_chat() {
        let cli = Cli::parse_from(["studydesk"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_subcommand() {
        let cli = Cli::parse_from(["studydesk", "ask", "what is calculus?"]);
        match cli.command {
            Some(Commands::Ask { question }) => assert_eq!(question, "what is calculus?"),
            _ => panic!("expected ask subcommand"),
        }
    }

    #[test]
    fn test_endpoint_flag() {
        let cli = Cli::parse_from(["studydesk", "-e", "http://x:9", "history"]);
        assert_eq!(cli.endpoint.as_deref(), Some("http://x:9"));
    }
}
