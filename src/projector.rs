//! Flattening of fetched messages into output records

use crate::body::extract_body;
use crate::error::Result;
use crate::models::{MailMessage, MessageRecord};

pub const SENDER_HEADER: &str = "From";
pub const SUBJECT_HEADER: &str = "Subject";

/// Build the output record for a message
///
/// Missing headers become empty strings. A body that cannot be extracted
/// fails the whole projection.
pub fn project_message(message: &MailMessage) -> Result<MessageRecord> {
    let sender = message.header(SENDER_HEADER).unwrap_or_default().to_string();
    let subject = message.header(SUBJECT_HEADER).unwrap_or_default().to_string();
    let body = extract_body(&message.content)?;

    Ok(MessageRecord {
        id: message.id.clone(),
        sender,
        subject,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GmailError;
    use crate::models::{ContentPart, Header};

    fn message(headers: Vec<Header>, content: ContentPart) -> MailMessage {
        MailMessage {
            id: "msg1".to_string(),
            headers,
            content,
        }
    }

    #[test]
    fn test_project_message() {
        let msg = message(
            vec![Header::new("From", "a@x.com"), Header::new("Subject", "Hi")],
            ContentPart::leaf("SGVsbG8="),
        );

        let record = project_message(&msg).unwrap();
        assert_eq!(record.id, "msg1");
        assert_eq!(record.sender, "a@x.com");
        assert_eq!(record.subject, "Hi");
        assert_eq!(record.body, "Hello");
    }

    #[test]
    fn test_missing_subject_is_empty() {
        let msg = message(
            vec![Header::new("From", "a@x.com")],
            ContentPart::leaf("SGVsbG8="),
        );

        let record = project_message(&msg).unwrap();
        assert_eq!(record.subject, "");
        assert_eq!(record.sender, "a@x.com");
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let msg = message(
            vec![Header::new("FROM", "a@x.com"), Header::new("subject", "Hi")],
            ContentPart::leaf("SGVsbG8="),
        );

        let record = project_message(&msg).unwrap();
        assert_eq!(record.sender, "");
        assert_eq!(record.subject, "");
    }

    #[test]
    fn test_missing_body_fails() {
        let msg = message(vec![Header::new("From", "a@x.com")], ContentPart::default());
        assert!(matches!(project_message(&msg), Err(GmailError::BodyNotFound)));
    }

    #[test]
    fn test_bad_body_fails() {
        let msg = message(vec![], ContentPart::leaf("***"));
        assert!(matches!(project_message(&msg), Err(GmailError::DecodeError(_))));
    }
}
