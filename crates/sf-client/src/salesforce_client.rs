//! High-level Salesforce client with typed HTTP methods.
//!
//! This module provides `SalesforceClient`, which combines an instance base
//! URL and bearer token with an HTTP client and provides typed JSON methods
//! for API interactions.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Sensitive parameters are skipped in tracing spans

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::RequestBuilder;
use crate::response::Response;
use crate::DEFAULT_API_VERSION;

/// Authenticated Salesforce API client.
///
/// Holds the org's base service URL, the bearer token attached to every
/// request, and the API version used when building versioned paths.
///
/// # Example
///
/// ```rust,ignore
/// use sf_ingest_client::SalesforceClient;
///
/// let client = SalesforceClient::new("https://myorg.my.salesforce.com", token)?
///     .with_api_version("62.0");
///
/// let job: serde_json::Value = client
///     .get_json(&client.bulk_url("ingest/750xx0000000001"))
///     .await?;
/// ```
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a new Salesforce client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(instance_url, access_token, ClientConfig::default())
    }

    /// Create a new Salesforce client with custom configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = SfHttpClient::new(config)?;
        Self::with_http(http, instance_url, access_token)
    }

    /// Create a client that shares an existing HTTP client (and its pool).
    ///
    /// The instance URL must be an absolute URL.
    pub fn with_http(
        http: SfHttpClient,
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let instance_url = instance_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&instance_url)?;

        Ok(Self {
            http,
            instance_url,
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        })
    }

    /// Set the API version (e.g., "62.0"; a leading "v" is accepted).
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.api_version = version.trim_start_matches(['v', 'V']).to_string();
        self
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build the full URL for a path.
    ///
    /// If the path starts with `/`, it's appended to the instance URL.
    /// Otherwise, it's assumed to be a full URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url, path)
        } else {
            format!("{}/{}", self.instance_url, path)
        }
    }

    /// Build the Bulk API 2.0 URL for a path.
    ///
    /// Example: `bulk_url("ingest")` -> `{instance}/services/data/v62.0/jobs/ingest`
    pub fn bulk_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/services/data/v{}/jobs/{}",
            self.instance_url, self.api_version, path
        )
    }

    // =========================================================================
    // Base HTTP Methods (with authentication)
    // =========================================================================

    /// Create a GET request builder with authentication.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.access_token)
    }

    /// Create a POST request builder with authentication.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.access_token)
    }

    /// Create a PATCH request builder with authentication.
    pub fn patch(&self, url: &str) -> RequestBuilder {
        self.http.patch(url).bearer_auth(&self.access_token)
    }

    /// Create a PUT request builder with authentication.
    pub fn put(&self, url: &str) -> RequestBuilder {
        self.http.put(url).bearer_auth(&self.access_token)
    }

    /// Create a DELETE request builder with authentication.
    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.http.delete(url).bearer_auth(&self.access_token)
    }

    /// Execute a request and return the raw response.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    // =========================================================================
    // Typed JSON Methods
    // =========================================================================

    /// GET request with JSON response deserialization.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let full_url = self.url(url);
        let request = self.get(&full_url);
        let response = self.http.execute(request).await?;
        response.json().await
    }

    /// POST request with JSON body and response.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let full_url = self.url(url);
        let request = self.post(&full_url).json(body)?;
        let response = self.http.execute(request).await?;
        response.json().await
    }

    /// PATCH request with JSON body and response.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let full_url = self.url(url);
        let request = self.patch(&full_url).json(body)?;
        let response = self.http.execute(request).await?;
        response.json().await
    }

    /// DELETE request.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn delete_request(&self, url: &str) -> Result<()> {
        let full_url = self.url(url);
        let request = self.delete(&full_url);
        self.http.execute(request).await?;
        Ok(())
    }
}
