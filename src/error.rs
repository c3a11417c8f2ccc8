use thiserror::Error;

/// Type alias for Result with GmailError
pub type Result<T> = std::result::Result<T, GmailError>;

/// Error types for the export pipeline
#[derive(Error, Debug)]
pub enum GmailError {
    /// Gmail API returned an error
    #[error("Gmail API error: {0}")]
    ApiError(String),

    /// Authentication failed (token cache, authorization flow, TLS setup)
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Network-related error (connection issues, timeouts, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server returned 5xx error
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Resource not found (404)
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden (403)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Message returned by the API is missing required fields
    #[error("Invalid message format: {0}")]
    InvalidMessageFormat(String),

    /// Body data is not valid base64url
    #[error("Failed to decode message body: {0}")]
    DecodeError(String),

    /// No part of the content tree carried a body
    #[error("No message body found")]
    BodyNotFound,

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// OAuth2 client secret descriptor missing or unparseable
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Config file unreadable or a setting out of range
    #[error("Invalid settings: {0}")]
    SettingsError(String),
}

impl GmailError {
    /// True for every failure reported by the Gmail API or its transport
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            GmailError::ApiError(_)
                | GmailError::RateLimitExceeded(_)
                | GmailError::NetworkError(_)
                | GmailError::ServerError { .. }
                | GmailError::MessageNotFound(_)
                | GmailError::BadRequest(_)
                | GmailError::Forbidden(_)
        )
    }

    /// True when the message content itself could not be turned into a record
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            GmailError::DecodeError(_)
                | GmailError::BodyNotFound
                | GmailError::InvalidMessageFormat(_)
        )
    }

    /// Follow-up advice printed under the error message
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            GmailError::AuthError(_) => {
                Some("Delete the token cache and run again to re-authorize.")
            }
            GmailError::ConfigError(_) => Some(
                "Make sure your credentials.json file is valid.\n      \
                 You can download it from Google Cloud Console.",
            ),
            GmailError::SettingsError(_) => Some(
                "Check the config file given with --config and the values\n      \
                 passed on the command line.",
            ),
            e if e.is_content_error() => {
                Some("Run with --best-effort to skip messages that cannot be decoded.")
            }
            e if e.is_api_error() => Some(
                "This may be a temporary API error.\n      Try running the command again.",
            ),
            _ => None,
        }
    }
}

impl From<base64::DecodeError> for GmailError {
    fn from(error: base64::DecodeError) -> Self {
        GmailError::DecodeError(error.to_string())
    }
}

impl From<google_gmail1::Error> for GmailError {
    fn from(error: google_gmail1::Error) -> Self {
        match error {
            // HTTP response with status code (non-success responses)
            google_gmail1::Error::Failure(ref response) => {
                let status = response.status();
                let status_code = status.as_u16();
                let message = format!(
                    "HTTP {}: {}",
                    status_code,
                    status.canonical_reason().unwrap_or("Unknown")
                );

                match status_code {
                    429 => GmailError::RateLimitExceeded(message),
                    404 => GmailError::MessageNotFound("Resource not found".to_string()),
                    400 => GmailError::BadRequest(message),
                    403 => GmailError::Forbidden(message),
                    500..=599 => GmailError::ServerError {
                        status: status_code,
                        message,
                    },
                    _ => GmailError::ApiError(message),
                }
            }
            google_gmail1::Error::BadRequest(ref err) => GmailError::BadRequest(format!("{}", err)),
            google_gmail1::Error::HttpError(ref err) => {
                GmailError::NetworkError(format!("Connection error: {}", err))
            }
            google_gmail1::Error::Io(err) => GmailError::NetworkError(err.to_string()),
            google_gmail1::Error::MissingToken(ref err) => {
                GmailError::AuthError(format!("Missing token: {}", err))
            }
            _ => GmailError::ApiError(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    #[test]
    fn test_api_errors() {
        let server_error = GmailError::ServerError {
            status: 503,
            message: "Service unavailable".to_string(),
        };
        assert!(server_error.is_api_error());
        assert!(!server_error.is_content_error());

        assert!(GmailError::MessageNotFound("msg123".to_string()).is_api_error());
        assert!(GmailError::NetworkError("Connection timeout".to_string()).is_api_error());
        assert!(!GmailError::AuthError("Invalid token".to_string()).is_api_error());
    }

    #[test]
    fn test_content_errors() {
        assert!(GmailError::BodyNotFound.is_content_error());
        assert!(GmailError::DecodeError("bad byte".to_string()).is_content_error());
        assert!(!GmailError::ConfigError("missing".to_string()).is_content_error());
    }

    #[test]
    fn test_hints_match_cause() {
        let credentials = GmailError::ConfigError("Unable to read client secret file".to_string());
        assert!(credentials.hint().unwrap().contains("credentials.json"));

        let settings = GmailError::SettingsError("export.max_results must be at least 1".to_string());
        let hint = settings.hint().unwrap();
        assert!(hint.contains("--config"));
        assert!(!hint.contains("credentials.json"));

        assert!(GmailError::InvalidMessageFormat("Missing message ID".to_string())
            .hint()
            .unwrap()
            .contains("--best-effort"));
        assert!(GmailError::Forbidden("HTTP 403".to_string())
            .hint()
            .unwrap()
            .contains("temporary"));
        assert!(GmailError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk"))
            .hint()
            .is_none());
    }

    #[test]
    fn test_error_display() {
        let display = format!("{}", GmailError::BodyNotFound);
        assert_eq!(display, "No message body found");

        let auth_error = GmailError::AuthError("Invalid token".to_string());
        let display = format!("{}", auth_error);
        assert!(display.contains("Authentication failed"));
    }

    #[test]
    fn test_from_base64_error() {
        let err = base64::engine::general_purpose::URL_SAFE
            .decode("not*base64")
            .unwrap_err();
        let gmail_error: GmailError = err.into();
        assert!(matches!(gmail_error, GmailError::DecodeError(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let gmail_error: GmailError = io.into();
        assert!(matches!(gmail_error, GmailError::IoError(_)));
        assert!(format!("{}", gmail_error).contains("denied"));
    }
}
