//! Gmail sender export
//!
//! Fetches the messages a given sender sent to a mailbox and writes them to a
//! local file as a JSON array of `{Id, Sender, Subject, Body}` records.
//!
//! # Overview
//!
//! - **Authentication**: OAuth2 installed-app flow with an on-disk token cache
//! - **Client**: list message IDs by query and fetch full messages
//! - **Body extraction**: first-body search over the MIME part tree, base64url decoding
//! - **Projection**: headers and body flattened into one record per message
//! - **Pipeline**: list, fetch, project, and write, failing fast by default
//!
//! # Example Usage
//!
//! ```no_run
//! use gmail_pipe::{auth, client::ProductionGmailClient, pipeline, AuthFlow, ExportOptions};
//! use gmail_pipe::models::CollectionMode;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let hub = auth::initialize_gmail_hub(
//!         "credentials.json".as_ref(),
//!         "token.json".as_ref(),
//!         AuthFlow::Redirect,
//!     )
//!     .await?;
//!     let client = ProductionGmailClient::new(hub);
//!
//!     let options = ExportOptions {
//!         user: "me".to_string(),
//!         sender: "news@example.com".to_string(),
//!         max_results: 9,
//!         output: "pipe.json".into(),
//!         mode: CollectionMode::FailFast,
//!     };
//!     let report = pipeline::run_export(&client, &options, None).await?;
//!     println!("exported {} message(s)", report.exported);
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`body`] - Body search and base64url decoding
//! - [`client`] - Mail client trait and Gmail implementation
//! - [`cli`] - Command-line interface and progress display
//! - [`config`] - Configuration management
//! - [`error`] - Error types and result aliases
//! - [`models`] - Core data structures
//! - [`pipeline`] - Export orchestration
//! - [`projector`] - Message to record projection

pub mod auth;
pub mod body;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod projector;

pub use error::{GmailError, Result};

pub use models::{CollectionMode, ContentPart, Header, MailMessage, MessageRecord, MessageSummary};

pub use auth::AuthFlow;
pub use body::{decode_body_data, extract_body};
pub use client::{MailClient, ProductionGmailClient};
pub use config::Config;
pub use pipeline::{run_export, ExportOptions, ExportReport};
pub use projector::project_message;
