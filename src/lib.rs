//! Shopchat - conversational product recommendation client library
//!
//! This library provides the client-side logic for a conversational
//! product-recommendation agent: chat session orchestration, one-shot
//! search filters, image attachments, and the evaluation-job dashboard.
//! The recommendation backend itself (routing, embeddings, ranking) is an
//! external collaborator reached through a fixed REST contract.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: wire types and the reqwest backend client
//! - `session`: conversation log, filters, attachments, and the chat
//!   session state machine
//! - `eval`: bounded polling of background evaluation jobs
//! - `commands`: CLI command handlers
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use shopchat::api::BackendClient;
//! use shopchat::config::Config;
//! use shopchat::session::ChatSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let client = BackendClient::new(&config.backend)?;
//!     let mut session = ChatSession::new(&config.chat, &config.backend);
//!     session.send(&client, "Recommend a breathable t-shirt under $30").await;
//!     println!("{}", session.conversation().last().content);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod eval;
pub mod session;

// Re-export commonly used types
pub use api::{BackendClient, ChatBackend, EvalBackend, EvalMode, FilterSet, Product};
pub use config::Config;
pub use error::{Result, ShopchatError};
pub use eval::{JobOutcome, JobPoller};
pub use session::{ChatSession, Conversation, FilterKey, Role, Turn};
