//! Error types for sf-ingest-auth.
//!
//! Error messages are designed to avoid exposing sensitive credential data.

/// Result type alias for sf-ingest-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-ingest-auth operations.
///
/// Error messages are sanitized to prevent accidental credential exposure.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the server rejected the credentials.
    pub fn is_rejected_credentials(&self) -> bool {
        match &self.kind {
            ErrorKind::OAuth { error, .. } => error == "invalid_grant" || error == "invalid_client",
            ErrorKind::Http { status, .. } => *status == Some(401),
            _ => false,
        }
    }
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// OAuth error response from Salesforce.
    #[error("OAuth error: {error} - {description}")]
    OAuth { error: String, description: String },

    /// HTTP error during authentication.
    #[error("HTTP error: {message}")]
    Http {
        status: Option<u16>,
        message: String,
    },

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A URL returned by or given to the identity service is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

impl From<sf_ingest_client::Error> for Error {
    fn from(err: sf_ingest_client::Error) -> Self {
        if let sf_ingest_client::ErrorKind::Json(message) = &err.kind {
            return Error::with_source(ErrorKind::Json(message.clone()), err);
        }

        let status = err.status();
        // Sanitize any potential credential exposure
        let message = err.to_string();
        let message = if message.contains("Bearer") || message.contains("token") {
            "Client error (details redacted for security)".to_string()
        } else {
            message
        };
        Error::with_source(ErrorKind::Http { status, message }, err)
    }
}
