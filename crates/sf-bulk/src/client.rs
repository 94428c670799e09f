//! Bulk API 2.0 ingest client.
//!
//! Stateless wrapper over an authenticated [`SalesforceClient`]; every call
//! names its job explicitly.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::sleep;
use tracing::{info, instrument};

use sf_ingest_client::security::url::encode_param;
use sf_ingest_client::{ClientConfig, SalesforceClient};

use crate::error::{Error, ErrorKind, Result};
use crate::results::ResultStream;
use crate::types::*;

/// Default polling interval for job status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default maximum wait time for job completion.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(3600); // 1 hour

/// Salesforce Bulk API 2.0 ingest client.
///
/// # Example
///
/// ```rust,ignore
/// use sf_ingest_bulk::{BulkApiClient, BulkOperation, CreateIngestJobRequest, ResultKind};
///
/// let client = BulkApiClient::new(
///     "https://myorg.my.salesforce.com",
///     "access_token_here",
/// )?;
///
/// let request = CreateIngestJobRequest::new("Account", BulkOperation::Insert);
/// let job = client.create_ingest_job(&request).await?;
///
/// client.upload_job_data(&job.id, "Name\nTest Account 1\nTest Account 2").await?;
/// client.close_ingest_job(&job.id).await?;
///
/// let done = client.wait_for_ingest_job(&job.id).await?;
/// let failures = client.get_results(&done.id, ResultKind::Failed).await?.text().await?;
/// ```
#[derive(Debug, Clone)]
pub struct BulkApiClient {
    client: SalesforceClient,
    poll_interval: Duration,
    max_wait: Duration,
}

impl BulkApiClient {
    /// Create a new Bulk API client.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = SalesforceClient::new(instance_url, access_token)?;
        Ok(Self::from_client(client))
    }

    /// Create a new Bulk API client with custom HTTP configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = SalesforceClient::with_config(instance_url, access_token, config)?;
        Ok(Self::from_client(client))
    }

    /// Create a Bulk API client from an existing SalesforceClient.
    pub fn from_client(client: SalesforceClient) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        self.client.instance_url()
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        self.client.api_version()
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.client = self.client.with_api_version(version);
        self
    }

    /// Set the polling interval for job status checks.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the maximum wait time for job completion.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/{}", self.client.bulk_url("ingest"), encode_param(job_id))
    }

    /// Create a new ingest job.
    #[instrument(skip(self, request), fields(object = %request.object, operation = %request.operation))]
    pub async fn create_ingest_job(&self, request: &CreateIngestJobRequest) -> Result<IngestJob> {
        let url = self.client.bulk_url("ingest");
        let job: IngestJob = self.client.post_json(&url, request).await?;
        info!(job_id = %job.id, state = ?job.state, "Ingest job created");
        Ok(job)
    }

    /// Upload CSV data to an ingest job.
    #[instrument(skip(self, csv_data))]
    pub async fn upload_job_data(&self, job_id: &str, csv_data: impl Into<Bytes>) -> Result<()> {
        let url = format!("{}/batches", self.job_url(job_id));
        let request = self.client.put(&url).csv(csv_data);
        self.client.execute(request).await?;
        Ok(())
    }

    /// Get ingest job status.
    #[instrument(skip(self))]
    pub async fn get_ingest_job(&self, job_id: &str) -> Result<IngestJob> {
        let job: IngestJob = self.client.get_json(&self.job_url(job_id)).await?;
        Ok(job)
    }

    /// Request a state transition and return the state the server reports.
    #[instrument(skip(self))]
    pub async fn update_job_state(&self, job_id: &str, state: JobState) -> Result<IngestJob> {
        let request = UpdateJobStateRequest { state };
        let job: IngestJob = self
            .client
            .patch_json(&self.job_url(job_id), &request)
            .await?;
        info!(job_id = %job.id, requested = ?state, reported = ?job.state, "Job state updated");
        Ok(job)
    }

    /// Close an ingest job (mark as UploadComplete).
    pub async fn close_ingest_job(&self, job_id: &str) -> Result<IngestJob> {
        self.update_job_state(job_id, JobState::UploadComplete).await
    }

    /// Abort an ingest job.
    pub async fn abort_ingest_job(&self, job_id: &str) -> Result<IngestJob> {
        self.update_job_state(job_id, JobState::Aborted).await
    }

    /// Delete an ingest job.
    #[instrument(skip(self))]
    pub async fn delete_ingest_job(&self, job_id: &str) -> Result<()> {
        self.client.delete_request(&self.job_url(job_id)).await?;
        info!(job_id, "Ingest job deleted");
        Ok(())
    }

    /// Open one of the job's result collections as a CSV byte stream.
    #[instrument(skip(self))]
    pub async fn get_results(&self, job_id: &str, kind: ResultKind) -> Result<ResultStream> {
        let url = format!("{}/{}/", self.job_url(job_id), kind.path_segment());
        let request = self.client.get(&url).accept_csv();
        let response = self.client.execute(request).await?;
        Ok(ResultStream::new(kind, response.bytes_stream()))
    }

    /// Poll an ingest job until it reaches a terminal state.
    ///
    /// Any error from a poll is returned immediately.
    #[instrument(skip(self))]
    pub async fn wait_for_ingest_job(&self, job_id: &str) -> Result<IngestJob> {
        let start = std::time::Instant::now();

        loop {
            let job = self.get_ingest_job(job_id).await?;

            if job.state.is_terminal() {
                return Ok(job);
            }

            if start.elapsed() > self.max_wait {
                return Err(Error::new(ErrorKind::Timeout(format!(
                    "Job {} did not complete within {:?}",
                    job_id, self.max_wait
                ))));
            }

            sleep(self.poll_interval).await;
        }
    }
}
