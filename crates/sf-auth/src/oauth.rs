//! OAuth 2.0 username-password flow and identity lookup.

use serde::{Deserialize, Serialize};
use sf_ingest_client::{Response, SfHttpClient};
use tracing::{debug, instrument};

use crate::credentials::PasswordCredentials;
use crate::error::{Error, ErrorKind, Result};
use crate::identity::IdentityInfo;

/// OAuth client for the password grant and the identity service.
///
/// Sends every request exactly once.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: SfHttpClient,
}

impl OAuthClient {
    /// Create a new OAuth client over the given HTTP client.
    pub fn new(http: SfHttpClient) -> Self {
        Self { http }
    }

    /// Exchange username, password and security token for an access token.
    ///
    /// POSTs a form to `{login_url}/services/oauth2/token`. The credentials
    /// are not logged.
    #[instrument(skip(self, credentials))]
    pub async fn password_grant(
        &self,
        login_url: &str,
        credentials: &PasswordCredentials,
    ) -> Result<TokenResponse> {
        let password = credentials.password_with_token();
        let params = [
            ("grant_type", "password"),
            ("client_id", credentials.consumer_key()),
            ("client_secret", credentials.consumer_secret()),
            ("username", credentials.username()),
            ("password", password.as_str()),
        ];

        let body = serde_urlencoded::to_string(params)?;
        let url = format!("{}/services/oauth2/token", login_url.trim_end_matches('/'));

        let response = self
            .http
            .execute_raw(self.http.post(url).form_encoded(body))
            .await?;

        let token = handle_token_response(response).await?;
        debug!("Password grant succeeded");
        Ok(token)
    }

    /// Fetch the identity document at `id_url` using the access token.
    ///
    /// The token parameter is not logged.
    #[instrument(skip(self, access_token))]
    pub async fn identity(&self, id_url: &str, access_token: &str) -> Result<IdentityInfo> {
        let info = self
            .http
            .send_json(self.http.get(id_url).bearer_auth(access_token))
            .await?;
        Ok(info)
    }
}

/// Check a token endpoint response, mapping OAuth error bodies.
async fn handle_token_response(response: Response) -> Result<TokenResponse> {
    if !response.is_success() {
        let status = response.status();
        let body = response.text().await?;

        return Err(match serde_json::from_str::<OAuthErrorResponse>(&body) {
            Ok(error) => Error::new(ErrorKind::OAuth {
                error: error.error,
                description: error.error_description,
            }),
            Err(_) => Error::new(ErrorKind::Http {
                status: Some(status),
                message: format!("token request failed with status {status}"),
            }),
        });
    }

    let token: TokenResponse = response.json().await?;
    Ok(token)
}

/// Token response from the password grant.
///
/// `access_token` and `signature` are redacted in Debug output.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Identity URL for the authenticated user.
    pub id: String,
    /// Instance URL.
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
    /// Issued at timestamp.
    #[serde(default)]
    pub issued_at: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("id", &self.id)
            .field("instance_url", &self.instance_url)
            .field("token_type", &self.token_type)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// OAuth error response.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}
