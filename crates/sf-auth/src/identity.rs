//! Identity service response and base URL derivation.

use serde::Deserialize;

use crate::error::{Error, ErrorKind, Result};

/// Response from the identity URL returned with an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityInfo {
    /// User ID.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Organization ID.
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Service URLs for the org.
    pub urls: IdentityUrls,
}

/// The `urls` map of an identity response.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUrls {
    /// The user's profile page, e.g. `https://na1.salesforce.com/005x0000001`.
    pub profile: String,
    #[serde(default)]
    pub enterprise: Option<String>,
    #[serde(default)]
    pub partner: Option<String>,
    #[serde(default)]
    pub rest: Option<String>,
    #[serde(default)]
    pub sobjects: Option<String>,
}

impl IdentityInfo {
    /// Base URL of the org's service host, derived from the profile URL.
    pub fn instance_base_url(&self) -> Result<String> {
        base_url_from_profile(&self.urls.profile)
    }
}

/// Strip the final `/`-delimited segment from a profile URL.
///
/// `https://na1.salesforce.com/005x0000001` becomes
/// `https://na1.salesforce.com`. The profile must be an absolute URL with
/// at least one path segment.
pub fn base_url_from_profile(profile: &str) -> Result<String> {
    let parsed = url::Url::parse(profile)?;

    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(Error::new(ErrorKind::InvalidUrl(format!(
            "profile URL is not an absolute URL: {profile}"
        ))));
    }

    if parsed.path().trim_start_matches('/').is_empty() {
        return Err(Error::new(ErrorKind::InvalidUrl(format!(
            "profile URL has no path segment: {profile}"
        ))));
    }

    profile
        .rsplit_once('/')
        .map(|(base, _)| base.to_string())
        .ok_or_else(|| {
            Error::new(ErrorKind::InvalidUrl(format!(
                "profile URL has no path segment: {profile}"
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_from_profile() {
        assert_eq!(
            base_url_from_profile("https://na1.salesforce.com/005x0000001").unwrap(),
            "https://na1.salesforce.com"
        );
        assert_eq!(
            base_url_from_profile("https://acme.my.salesforce.com/005Dn000001aBcD").unwrap(),
            "https://acme.my.salesforce.com"
        );
    }

    #[test]
    fn test_base_url_keeps_port() {
        assert_eq!(
            base_url_from_profile("http://127.0.0.1:4010/005x0000001").unwrap(),
            "http://127.0.0.1:4010"
        );
    }

    #[test]
    fn test_base_url_rejects_relative_and_bare_hosts() {
        let err = base_url_from_profile("/005x0000001").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));

        let err = base_url_from_profile("https://na1.salesforce.com").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));

        let err = base_url_from_profile("mailto:admin@example.com").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));
    }

    #[test]
    fn test_identity_deserialize() {
        let json = serde_json::json!({
            "id": "https://login.salesforce.com/id/00Dx0000001/005x0000001",
            "user_id": "005x0000001",
            "organization_id": "00Dx0000001",
            "username": "u@example.com",
            "display_name": "Test User",
            "urls": {
                "enterprise": "https://na1.salesforce.com/services/Soap/c/{version}/00Dx0000001",
                "profile": "https://na1.salesforce.com/005x0000001",
                "rest": "https://na1.salesforce.com/services/data/v{version}/"
            }
        });

        let info: IdentityInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.user_id.as_deref(), Some("005x0000001"));
        assert_eq!(info.instance_base_url().unwrap(), "https://na1.salesforce.com");
    }
}
