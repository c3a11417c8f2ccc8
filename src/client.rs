//! Gmail API client for listing and fetching messages

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use google_gmail1::api::{Message, MessagePart, MessagePartHeader};
use tracing::debug;

use crate::auth::{GmailHub, READONLY_SCOPES};
use crate::error::{GmailError, Result};
use crate::models::{ContentPart, Header, MailMessage, MessageSummary};

/// Trait defining the mail operations the exporter needs, for easier testing
#[async_trait]
pub trait MailClient: Send + Sync {
    /// List message IDs in `user`'s mailbox matching `query`, at most `max_results`
    async fn list_message_ids(
        &self,
        user: &str,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<MessageSummary>>;

    /// Get a full message (headers and content tree)
    async fn get_message(&self, user: &str, id: &str) -> Result<MailMessage>;
}

/// Gmail client backed by the generated API hub
///
/// Issues one request at a time; no retries.
pub struct ProductionGmailClient {
    hub: GmailHub,
}

impl ProductionGmailClient {
    pub fn new(hub: GmailHub) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl MailClient for ProductionGmailClient {
    async fn list_message_ids(
        &self,
        user: &str,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<MessageSummary>> {
        let (_, response) = self
            .hub
            .users()
            .messages_list(user)
            .q(query)
            .max_results(max_results)
            .add_scope(READONLY_SCOPES[0])
            .doit()
            .await?;

        let ids: Vec<MessageSummary> = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|msg_ref| msg_ref.id)
            .map(|id| MessageSummary { id })
            .collect();

        debug!(
            "Listed {} message(s) for {} (estimate {:?})",
            ids.len(),
            query,
            response.result_size_estimate
        );
        Ok(ids)
    }

    async fn get_message(&self, user: &str, id: &str) -> Result<MailMessage> {
        let (_, msg) = self
            .hub
            .users()
            .messages_get(user, id)
            .format("full")
            .add_scope(READONLY_SCOPES[0])
            .doit()
            .await?;

        convert_message(msg)
    }
}

/// Convert a Gmail API message into our message model
///
/// A message without a payload becomes an empty content tree.
fn convert_message(msg: Message) -> Result<MailMessage> {
    let id = msg
        .id
        .ok_or_else(|| GmailError::InvalidMessageFormat("Missing message ID".to_string()))?;

    let mut payload = msg.payload.unwrap_or_default();
    let headers = payload
        .headers
        .take()
        .unwrap_or_default()
        .into_iter()
        .filter_map(convert_header)
        .collect();

    Ok(MailMessage {
        id,
        headers,
        content: convert_part(payload),
    })
}

fn convert_header(header: MessagePartHeader) -> Option<Header> {
    let name = header.name?;
    Some(Header {
        name,
        value: header.value.unwrap_or_default(),
    })
}

/// The hub hands back body bytes already decoded; re-encode them so the
/// body extractor sees the same base64url text the API put on the wire.
fn convert_part(part: MessagePart) -> ContentPart {
    ContentPart {
        mime_type: part.mime_type,
        data: part
            .body
            .and_then(|body| body.data)
            .map(|bytes| URL_SAFE.encode(bytes)),
        parts: part
            .parts
            .unwrap_or_default()
            .into_iter()
            .map(convert_part)
            .collect(),
    }
}
