//! # sf-ingest-client
//!
//! Core HTTP client infrastructure for the Bulk API 2.0 ingest client.
//!
//! This crate provides the foundational HTTP layer with:
//! - Compression support (gzip, deflate)
//! - Salesforce error-body classification and message sanitizing
//! - Streaming response bodies
//! - Request/response tracing
//!
//! Requests are attempted exactly once. Errors are returned to the caller
//! unchanged; there is no retry or rate-limit backoff in this layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (sf-auth, sf-bulk)                                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds base URL + bearer token + HTTP client              │
//! │  - Provides typed JSON methods (get_json, post_json)        │
//! │  - Builds Bulk API URLs                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP with compression and tracing                    │
//! │  - Request building                                         │
//! │  - Response handling                                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_ingest_client::{ClientConfig, SalesforceClient, SfHttpClient};
//!
//! let http = SfHttpClient::new(ClientConfig::default())?;
//! let client = SalesforceClient::with_http(http, "https://myorg.my.salesforce.com", token)?
//!     .with_api_version("62.0");
//!
//! let job: serde_json::Value = client
//!     .get_json(&client.bulk_url("ingest/750xx0000000001"))
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
pub mod security;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, CompressionConfig};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{ByteStream, Response, ResponseExt};
pub use salesforce_client::SalesforceClient;

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sf-ingest/", env!("CARGO_PKG_VERSION"));
