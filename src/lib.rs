//! studydesk — a terminal study assistant
//!
//! A client for an education backend that does the heavy lifting (problem
//! parsing, hint generation, quiz generation, question answering) over
//! JSON-over-HTTP. This crate owns what the backend does not:
//!
//! - **Formatting**: normalizing loose answer payloads into titled blocks
//!   of bullets, numbered items, and paragraphs ([`format`])
//! - **History**: a newest-first, persisted Q&A history behind a pluggable
//!   storage port ([`history`])
//! - **Sessions**: the ask/answer loop with an explicit request state
//!   machine ([`session`])
//!
//! # Quick Start
//!
//! ```ignore
//! use studydesk::api::ApiClient;
//! use studydesk::history::{FileStorage, HistoryStore};
//! use studydesk::session::StudySession;
//!
//! let backend = ApiClient::new("http://127.0.0.1:8000")?;
//! let history = HistoryStore::open(Box::new(FileStorage::new()?))?;
//! let mut session = StudySession::new(Box::new(backend), history);
//! let outcome = session.ask("What is a derivative?").await?;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod format;
pub mod history;
pub mod output;
pub mod session;
pub mod telemetry;
