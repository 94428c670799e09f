//! Security utilities for building Salesforce API requests.
//!
//! ## URL Parameter Encoding
//!
//! Caller-provided values placed in URL paths MUST be encoded:
//!
//! ```rust
//! use sf_ingest_client::security::url;
//!
//! // CORRECT
//! let encoded_id = url::encode_param("750/../../limits");
//! let path = format!("/services/data/v62.0/jobs/ingest/{}", encoded_id);
//! assert!(!path.contains("/../"));
//! ```

/// URL encoding utilities for parameter safety.
pub mod url {
    /// URL-encode a parameter value.
    ///
    /// This ensures that caller-provided values cannot break out of URL paths
    /// or inject additional parameters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sf_ingest_client::security::url;
    ///
    /// assert_eq!(url::encode_param("750/../x"), "750%2F..%2Fx");
    /// ```
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::url::*;

    #[test]
    fn test_encode_param() {
        assert_eq!(encode_param("simple"), "simple");
        assert_eq!(encode_param("has space"), "has%20space");
        assert_eq!(encode_param("path/traversal"), "path%2Ftraversal");
        assert_eq!(encode_param("../../etc/passwd"), "..%2F..%2Fetc%2Fpasswd");
        assert_eq!(encode_param("750?x=1"), "750%3Fx%3D1");
    }
}
