//! # sf-ingest
//!
//! A Salesforce Bulk API 2.0 ingest client for Rust.
//!
//! One [`JobClient`] logs in with the OAuth username-password flow, resolves
//! the org's base URL, tracks one ingest job, uploads CSV data to it, and
//! streams back the per-record results.
//!
//! ## Security
//!
//! - Sensitive data (passwords, tokens, secrets) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **sf-ingest-client** - Core HTTP client infrastructure with compression and error classification
//! - **sf-ingest-auth** - Authentication: OAuth 2.0 password grant, identity lookup
//! - **sf-ingest-bulk** - Bulk API 2.0 ingest jobs and result streams
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use sf_ingest::JobClientBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // SF_LOGIN_URL, SF_USERNAME, SF_PASSWORD, SF_SECURITY_TOKEN, ...
//!     let client = JobClientBuilder::from_env()?.build()?;
//!
//!     client.upload_job_data(std::fs::read("accounts.csv")?).await?;
//!     client.close_job(None).await?;
//!     client.wait_for_job(None).await?;
//!
//!     let mut failures = client.get_failed_results(None).await?;
//!     while let Some(chunk) = failures.next().await {
//!         eprint!("{}", String::from_utf8_lossy(&chunk?));
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
pub use sf_ingest_auth as auth;
pub use sf_ingest_bulk as bulk;
pub use sf_ingest_client as client;

pub use sf_ingest_bulk::{
    BulkOperation, Error, ErrorKind, IngestJob, JobClient, JobClientBuilder, JobState,
    ResultKind, ResultStream, Result,
};
