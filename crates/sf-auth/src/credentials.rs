//! Username-password credentials for the OAuth password grant.
//!
//! Debug output redacts every secret.

/// Credentials for the OAuth 2.0 username-password flow.
///
/// The password, security token and consumer secret are never exposed in
/// Debug output.
#[derive(Clone)]
pub struct PasswordCredentials {
    username: String,
    password: String,
    security_token: String,
    consumer_key: String,
    consumer_secret: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security_token", &"[REDACTED]")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

impl PasswordCredentials {
    /// Create new password-grant credentials.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: security_token.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// The login username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The connected app consumer key (OAuth `client_id`).
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// The `password` form value: password immediately followed by the
    /// security token.
    pub(crate) fn password_with_token(&self) -> String {
        format!("{}{}", self.password, self.security_token)
    }
}
