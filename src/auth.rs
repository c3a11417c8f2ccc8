//! OAuth2 authentication management for Gmail API

use google_gmail1::{hyper_rustls, hyper_util, yup_oauth2, Gmail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use yup_oauth2::{ApplicationSecret, InstalledFlowReturnMethod};

use crate::error::{GmailError, Result};

/// Read-only scope; the exporter never modifies the mailbox
///
/// Changing the requested scopes invalidates a cached token, so delete the
/// token cache after editing this.
pub const READONLY_SCOPES: &[&str] = &["https://www.googleapis.com/auth/gmail.readonly"];

/// Type alias for Gmail Hub to simplify type signatures
pub type GmailHub = Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>;

/// How the installed-app flow receives the authorization code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuthFlow {
    /// Browser redirects to a loopback listener
    #[default]
    Redirect,
    /// Print the consent URL and read the code from the console
    Interactive,
}

impl AuthFlow {
    fn return_method(self) -> InstalledFlowReturnMethod {
        match self {
            AuthFlow::Redirect => InstalledFlowReturnMethod::HTTPRedirect,
            AuthFlow::Interactive => InstalledFlowReturnMethod::Interactive,
        }
    }
}

/// Load the OAuth2 client secret descriptor
///
/// Accepts the JSON downloaded from Google Cloud Console (`installed` or
/// `web` application).
pub async fn load_credentials(path: &Path) -> Result<ApplicationSecret> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        GmailError::ConfigError(format!(
            "Unable to read client secret file {:?}: {}",
            path, e
        ))
    })?;

    yup_oauth2::parse_application_secret(content).map_err(|e| {
        GmailError::ConfigError(format!("Unable to parse client secret file: {}", e))
    })
}

/// Initialize Gmail API hub with OAuth2 authentication
///
/// Sets up:
/// - the installed-app OAuth2 flow, reusing the token cache when valid
/// - token persistence to disk, readable by the owner only
/// - an HTTP/1 client with TLS using native roots
///
/// Fetching the first token happens here, so a missing or stale cache
/// triggers the authorization prompt before any API call is made.
pub async fn initialize_gmail_hub(
    credentials_path: &Path,
    token_cache_path: &Path,
    flow: AuthFlow,
) -> Result<GmailHub> {
    let secret = load_credentials(credentials_path).await?;

    if let Some(parent) = token_cache_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let auth = yup_oauth2::InstalledFlowAuthenticator::builder(secret, flow.return_method())
        .persist_tokens_to_disk(token_cache_path)
        .build()
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to build authenticator: {}", e)))?;

    // Pre-authenticate so the cached token carries exactly the read-only scope
    let _token = auth
        .token(READONLY_SCOPES)
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to obtain token: {}", e)))?;

    if token_cache_path.exists() {
        secure_token_file(token_cache_path).await?;
    }
    tracing::debug!("Token cache at {:?}", token_cache_path);

    // Use HTTP/1 for compatibility (HTTP/2 is default but HTTP/1 works better with google-gmail1)
    let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|e| {
                    GmailError::AuthError(format!("Failed to load TLS roots: {}", e))
                })?
                .https_or_http()
                .enable_http1()
                .build(),
        );

    Ok(Gmail::new(client, auth))
}

/// Secure token file permissions on Unix systems
///
/// Sets file permissions to 0600 (read/write for owner only)
#[cfg(unix)]
pub async fn secure_token_file(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Windows uses ACLs instead of Unix permissions; nothing to do here
#[cfg(windows)]
pub async fn secure_token_file(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_credentials() {
        let credentials_json = r#"{
            "installed": {
                "client_id": "test-client-id",
                "project_id": "test-project",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_secret": "test-secret",
                "redirect_uris": ["http://localhost"]
            }
        }"#;

        let temp_file = NamedTempFile::new().unwrap();
        tokio::fs::write(temp_file.path(), credentials_json)
            .await
            .unwrap();

        let secret = load_credentials(temp_file.path()).await.unwrap();
        assert_eq!(secret.client_id, "test-client-id");
        assert_eq!(secret.client_secret, "test-secret");
        assert_eq!(secret.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[tokio::test]
    async fn test_load_credentials_missing_file() {
        let result = load_credentials(Path::new("/tmp/no-such-credentials-98765.json")).await;
        match result {
            Err(GmailError::ConfigError(msg)) => assert!(msg.contains("Unable to read")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_credentials_unparseable() {
        let temp_file = NamedTempFile::new().unwrap();
        tokio::fs::write(temp_file.path(), "{ not json").await.unwrap();

        let result = load_credentials(temp_file.path()).await;
        match result {
            Err(GmailError::ConfigError(msg)) => assert!(msg.contains("Unable to parse")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_initialize_hub_fails_on_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let result = initialize_gmail_hub(
            &dir.path().join("credentials.json"),
            &dir.path().join("token.json"),
            AuthFlow::Interactive,
        )
        .await;

        assert!(matches!(result, Err(GmailError::ConfigError(_))));
        assert!(!dir.path().join("token.json").exists());
    }

    #[tokio::test]
    async fn test_secure_token_file() {
        let temp_file = NamedTempFile::new().unwrap();
        tokio::fs::write(temp_file.path(), "test content")
            .await
            .unwrap();

        secure_token_file(temp_file.path()).await.unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = tokio::fs::metadata(temp_file.path()).await.unwrap();
            let perms = metadata.permissions();
            assert_eq!(perms.mode() & 0o777, 0o600);
        }
    }

    #[test]
    fn test_scopes_constants() {
        assert_eq!(READONLY_SCOPES.len(), 1);
        assert!(READONLY_SCOPES.contains(&"https://www.googleapis.com/auth/gmail.readonly"));
    }

    #[test]
    fn test_auth_flow_serde() {
        let flow: AuthFlow = serde_json::from_str("\"interactive\"").unwrap();
        assert_eq!(flow, AuthFlow::Interactive);
        assert_eq!(serde_json::to_string(&AuthFlow::Redirect).unwrap(), "\"redirect\"");
    }
}
