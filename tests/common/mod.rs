//! Common test utilities and fixtures

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use gmail_pipe::error::Result;
use gmail_pipe::models::{CollectionMode, ContentPart, Header, MailMessage, MessageSummary};
use gmail_pipe::pipeline::ExportOptions;
use mockall::mock;
use std::path::Path;

/// Encode text the way Gmail encodes body data
pub fn encode(text: &str) -> String {
    URL_SAFE.encode(text.as_bytes())
}

/// Create a single-part message with the given headers and plain body
pub fn create_test_message(id: &str, sender: &str, subject: &str, body: &str) -> MailMessage {
    MailMessage {
        id: id.to_string(),
        headers: vec![
            Header::new("Date", "Mon, 1 Jan 2024 10:00:00 -0800"),
            Header::new("From", sender),
            Header::new("To", "me@example.com"),
            Header::new("Subject", subject),
        ],
        content: ContentPart::leaf(encode(body)).with_mime_type("text/plain"),
    }
}

/// Create a multipart/alternative message whose plain part comes first
pub fn create_multipart_message(id: &str, sender: &str, subject: &str, plain: &str, html: &str) -> MailMessage {
    let mut message = create_test_message(id, sender, subject, plain);
    message.content = ContentPart::multipart(vec![
        ContentPart::leaf(encode(plain)).with_mime_type("text/plain"),
        ContentPart::leaf(encode(html)).with_mime_type("text/html"),
    ]);
    message
}

/// Create a message whose content tree has no body anywhere
pub fn create_bodiless_message(id: &str) -> MailMessage {
    MailMessage {
        id: id.to_string(),
        headers: vec![Header::new("From", "empty@example.com")],
        content: ContentPart::multipart(vec![]),
    }
}

pub fn summaries(ids: &[&str]) -> Vec<MessageSummary> {
    ids.iter()
        .map(|id| MessageSummary { id: id.to_string() })
        .collect()
}

pub fn export_options(output: &Path, sender: &str) -> ExportOptions {
    ExportOptions {
        user: "me".to_string(),
        sender: sender.to_string(),
        max_results: 9,
        output: output.to_path_buf(),
        mode: CollectionMode::FailFast,
    }
}

// Mock implementation of MailClient for testing
mock! {
    pub MailClient {}

    #[async_trait::async_trait]
    impl gmail_pipe::client::MailClient for MailClient {
        async fn list_message_ids(&self, user: &str, query: &str, max_results: u32) -> Result<Vec<MessageSummary>>;
        async fn get_message(&self, user: &str, id: &str) -> Result<MailMessage>;
    }
}
