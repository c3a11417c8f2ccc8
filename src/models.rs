use serde::{Deserialize, Serialize};

/// A message reference returned by the list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    pub id: String,
}

/// A single message header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A node of a message's content tree
///
/// `data` holds the body exactly as Gmail sends it: base64url text.
/// Children keep the provider's order; the body search depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPart {
    pub mime_type: Option<String>,
    pub data: Option<String>,
    pub parts: Vec<ContentPart>,
}

impl ContentPart {
    /// Leaf part carrying encoded body data
    pub fn leaf(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Default::default()
        }
    }

    /// Container part with no body of its own
    pub fn multipart(parts: Vec<ContentPart>) -> Self {
        Self {
            mime_type: Some("multipart/alternative".to_string()),
            parts,
            ..Default::default()
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Body data if present and non-empty
    pub fn body_data(&self) -> Option<&str> {
        self.data.as_deref().filter(|data| !data.is_empty())
    }
}

/// A fully fetched message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailMessage {
    pub id: String,
    pub headers: Vec<Header>,
    pub content: ContentPart,
}

impl MailMessage {
    /// Value of the first header whose name matches exactly (case-sensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name == name)
            .map(|header| header.value.as_str())
    }
}

/// One entry of the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageRecord {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub body: String,
}

/// Whether a failing message aborts the run or is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMode {
    #[default]
    FailFast,
    BestEffort,
}
