//! # sf-ingest-auth
//!
//! Salesforce authentication for the Bulk API 2.0 ingest client.
//!
//! ## Security
//!
//! - Passwords, security tokens, consumer secrets and access tokens are
//!   redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages never include credential values
//!
//! ## Supported Authentication Methods
//!
//! - **OAuth 2.0 Username-Password Flow** - `password` + security token
//!   exchanged for a bearer token at `/services/oauth2/token`
//! - **Identity lookup** - resolves the org's base service URL from the
//!   identity URL returned with the token
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_ingest_auth::{OAuthClient, PasswordCredentials, PRODUCTION_LOGIN_URL};
//! use sf_ingest_client::SfHttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sf_ingest_auth::Error> {
//!     let creds = PasswordCredentials::new(
//!         "user@example.com", "password", "securityToken", "consumerKey", "consumerSecret",
//!     );
//!     let oauth = OAuthClient::new(SfHttpClient::default_client()?);
//!
//!     let token = oauth.password_grant(PRODUCTION_LOGIN_URL, &creds).await?;
//!     let identity = oauth.identity(&token.id, &token.access_token).await?;
//!     println!("base URL: {}", identity.instance_base_url()?);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod identity;
mod oauth;

pub use credentials::PasswordCredentials;
pub use error::{Error, ErrorKind, Result};
pub use identity::{base_url_from_profile, IdentityInfo, IdentityUrls};
pub use oauth::{OAuthClient, TokenResponse};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
