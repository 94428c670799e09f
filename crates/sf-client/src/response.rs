//! HTTP response handling with Salesforce-specific extensions.

use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// Unbuffered response body, yielded chunk by chunk as it arrives.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Wrapper around HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }

    /// Consume the response as a stream of body chunks without buffering.
    pub fn bytes_stream(self) -> ByteStream {
        Box::pin(self.inner.bytes_stream().map_err(Error::from))
    }
}

/// Extension trait for processing Salesforce API responses.
pub trait ResponseExt {
    /// Check for Salesforce API errors and convert to appropriate error type.
    fn check_salesforce_error(self) -> impl std::future::Future<Output = Result<Response>> + Send;
}

impl ResponseExt for Response {
    async fn check_salesforce_error(self) -> Result<Response> {
        let status = self.status();

        if self.is_success() {
            return Ok(self);
        }

        let body = self.text().await.unwrap_or_default();
        Err(parse_error_response(status, &body))
    }
}

/// Parse error response body and convert to appropriate error kind.
fn parse_error_response(status: u16, body: &str) -> Error {
    // Salesforce error JSON (array format)
    if let Ok(errors) = serde_json::from_str::<Vec<SalesforceErrorResponse>>(body) {
        if let Some(err) = errors.into_iter().next() {
            return Error::new(ErrorKind::SalesforceApi {
                status,
                error_code: err.error_code,
                message: sanitize_error_message(&err.message),
            });
        }
    }

    // Single error object
    if let Ok(err) = serde_json::from_str::<SalesforceErrorResponse>(body) {
        return Error::new(ErrorKind::SalesforceApi {
            status,
            error_code: err.error_code,
            message: sanitize_error_message(&err.message),
        });
    }

    let sanitized = sanitize_error_message(body);
    let kind = match status {
        401 => ErrorKind::Authentication(sanitized),
        403 => ErrorKind::Authorization(sanitized),
        404 => ErrorKind::NotFound(sanitized),
        _ => ErrorKind::Http {
            status,
            message: sanitized,
        },
    };

    Error::new(kind)
}

/// Sanitize an error message to prevent exposing sensitive data.
///
/// This function:
/// - Truncates messages longer than 500 characters
/// - Removes potential tokens (anything that looks like an access token)
/// - Removes potential session IDs
pub(crate) fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    // Salesforce tokens start with the 15+ char org id followed by '!'
    let token_pattern = regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+")
        .expect("static token pattern is valid");
    let mut sanitized = token_pattern
        .replace_all(message, "[REDACTED_TOKEN]")
        .to_string();

    let session_pattern =
        regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}").expect("static session pattern is valid");
    sanitized = session_pattern
        .replace_all(&sanitized, "sid=[REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

/// Salesforce API error response format.
#[derive(Debug, serde::Deserialize)]
struct SalesforceErrorResponse {
    #[serde(alias = "errorCode")]
    error_code: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_redacts_access_tokens() {
        let msg = "Session expired: 00Dxx0000001gEF!AQcAQH3k9s7LKbp_example_token_value.here";
        let sanitized = sanitize_error_message(msg);
        assert!(sanitized.contains("[REDACTED_TOKEN]"), "{sanitized}");
        assert!(!sanitized.contains("AQcAQH3k9s7LKbp"), "{sanitized}");
    }

    #[test]
    fn test_sanitize_redacts_session_ids() {
        let msg = "Invalid session: sid=abc123def456ghi789jkl012";
        let sanitized = sanitize_error_message(msg);
        assert!(sanitized.contains("sid=[REDACTED]"), "{sanitized}");
        assert!(!sanitized.contains("abc123def456"), "{sanitized}");
    }

    #[test]
    fn test_sanitize_truncates_long_messages() {
        let sanitized = sanitize_error_message(&"x".repeat(600));
        assert!(sanitized.len() < 600);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_sanitize_passes_through_clean_messages() {
        let msg = "InvalidJob : Found Invalid Job Id";
        assert_eq!(sanitize_error_message(msg), msg);
    }

    #[test]
    fn test_parse_error_array_format() {
        let body = r#"[{"errorCode":"NOT_FOUND","message":"The requested resource does not exist"}]"#;
        let err = parse_error_response(404, body);
        assert!(matches!(
            err.kind,
            ErrorKind::SalesforceApi { status: 404, ref error_code, .. } if error_code == "NOT_FOUND"
        ));
    }

    #[test]
    fn test_parse_error_falls_back_to_status() {
        assert!(matches!(
            parse_error_response(401, "Bad_OAuth_Token").kind,
            ErrorKind::Authentication(_)
        ));
        assert!(matches!(
            parse_error_response(403, "").kind,
            ErrorKind::Authorization(_)
        ));
        assert!(matches!(
            parse_error_response(404, "").kind,
            ErrorKind::NotFound(_)
        ));
        assert!(matches!(
            parse_error_response(500, "boom").kind,
            ErrorKind::Http { status: 500, .. }
        ));
    }

    #[test]
    fn test_parse_error_empty_array_falls_back() {
        assert!(matches!(
            parse_error_response(400, "[]").kind,
            ErrorKind::Http { status: 400, .. }
        ));
    }
}
