//! # sf-ingest-bulk
//!
//! Salesforce Bulk API 2.0 ingest jobs.
//!
//! ## Features
//!
//! - **JobClient** - one session and one tracked job per instance, logging
//!   in and resolving the org URL on first use
//! - **Job Management** - create, upload, close, abort, delete and poll jobs
//! - **Result Streams** - successful, failed and unprocessed records as raw
//!   CSV byte streams
//! - **BulkApiClient** - the same calls with explicit job ids over an
//!   already-authenticated client
//!
//! Nothing is retried. Every failed request is returned to the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use sf_ingest_bulk::{BulkOperation, JobClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sf_ingest_bulk::Error> {
//!     let client = JobClient::builder()
//!         .url("https://login.salesforce.com")
//!         .username("user@example.com")
//!         .password("password")
//!         .token("securityToken")
//!         .api_version("62.0")
//!         .consumer_key("consumerKey")
//!         .consumer_secret("consumerSecret")
//!         .object("Account")
//!         .operation(BulkOperation::Insert)
//!         .build()?;
//!
//!     client.upload_job_data("Name,Industry\nAcme Corp,Technology\n").await?;
//!     client.close_job(None).await?;
//!
//!     let job = client.wait_for_job(None).await?;
//!     println!("Processed {} records", job.number_records_processed);
//!
//!     let mut successes = client.get_successful_results(None).await?;
//!     while let Some(chunk) = successes.next().await {
//!         print!("{}", String::from_utf8_lossy(&chunk?));
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod job;
mod results;
mod types;

pub use client::{BulkApiClient, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};
pub use error::{Error, ErrorKind, Result};
pub use job::{env, JobClient, JobClientBuilder};
pub use results::ResultStream;
pub use types::*;
