//! Lazily-initialised ingest job client.
//!
//! A [`JobClient`] owns one session and tracks at most one current job.
//! The session is established on first use, in order: access token, then
//! the org's base URL, then (for uploads) the job itself. Each step runs at
//! most once at a time; concurrent first callers wait for the in-flight
//! attempt instead of starting their own.

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, instrument};

use sf_ingest_auth::{OAuthClient, PasswordCredentials, TokenResponse};
use sf_ingest_client::{ClientConfig, SalesforceClient, SfHttpClient};

use crate::client::{BulkApiClient, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};
use crate::error::{Error, ErrorKind, Result};
use crate::results::ResultStream;
use crate::types::{BulkOperation, IngestJob, JobConfig, LineEnding, ResultKind};

/// Environment variable names read by [`JobClientBuilder::from_env`].
pub mod env {
    pub const LOGIN_URL: &str = "SF_LOGIN_URL";
    pub const USERNAME: &str = "SF_USERNAME";
    pub const PASSWORD: &str = "SF_PASSWORD";
    pub const SECURITY_TOKEN: &str = "SF_SECURITY_TOKEN";
    pub const API_VERSION: &str = "SF_API_VERSION";
    pub const CONSUMER_KEY: &str = "SF_CONSUMER_KEY";
    pub const CONSUMER_SECRET: &str = "SF_CONSUMER_SECRET";
    pub const OBJECT: &str = "SF_OBJECT";
    pub const OPERATION: &str = "SF_OPERATION";
    pub const EXTERNAL_ID_FIELD: &str = "SF_EXTERNAL_ID_FIELD";
    pub const LINE_ENDING: &str = "SF_LINE_ENDING";
}

/// Session state, each piece set once and never refreshed.
#[derive(Debug, Default)]
struct Session {
    token: OnceCell<TokenResponse>,
    api: OnceCell<BulkApiClient>,
}

/// Client for one Bulk API 2.0 ingest job lifecycle.
///
/// Every per-job operation takes an optional job id; `None` means the job
/// this client created last.
///
/// # Example
///
/// ```rust,ignore
/// use sf_ingest_bulk::{BulkOperation, JobClient};
///
/// let client = JobClient::builder()
///     .url("https://login.salesforce.com")
///     .username("user@example.com")
///     .password("password")
///     .token("securityToken")
///     .api_version("62.0")
///     .consumer_key("consumerKey")
///     .consumer_secret("consumerSecret")
///     .object("Account")
///     .operation(BulkOperation::Insert)
///     .build()?;
///
/// client.upload_job_data("Name\nAcme\n").await?;
/// client.close_job(None).await?;
/// let job = client.wait_for_job(None).await?;
/// println!("{} records processed", job.number_records_processed);
/// ```
#[derive(Debug)]
pub struct JobClient {
    login_url: String,
    api_version: String,
    credentials: PasswordCredentials,
    job_config: JobConfig,
    http: SfHttpClient,
    oauth: OAuthClient,
    poll_interval: Duration,
    max_wait: Duration,
    session: Session,
    current_job: Mutex<Option<String>>,
}

impl JobClient {
    /// Start building a client.
    pub fn builder() -> JobClientBuilder {
        JobClientBuilder::default()
    }

    /// The job shape this client creates.
    pub fn config(&self) -> &JobConfig {
        &self.job_config
    }

    /// The API version used in job paths, without a leading `v`.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Id of the job this client created last, if any.
    pub async fn job_id(&self) -> Option<String> {
        self.current_job.lock().await.clone()
    }

    /// Upload CSV data to the current job, creating the job first if this
    /// client has none yet.
    #[instrument(skip(self, csv))]
    pub async fn upload_job_data(&self, csv: impl Into<Bytes>) -> Result<()> {
        let job_id = {
            let mut current = self.current_job.lock().await;
            match current.clone() {
                Some(id) => id,
                None => self.create_job_into(&mut current).await?.id,
            }
        };

        self.api().await?.upload_job_data(&job_id, csv).await
    }

    /// Obtain an access token. Only the first successful call talks to the
    /// server.
    #[instrument(skip(self))]
    pub async fn login(&self) -> Result<()> {
        self.token().await.map(|_| ())
    }

    /// Resolve the org's base service URL, logging in first if needed.
    #[instrument(skip(self))]
    pub async fn get_url(&self) -> Result<String> {
        Ok(self.api().await?.instance_url().to_string())
    }

    /// Create a new remote job and make it the current job.
    ///
    /// Every call creates another job.
    #[instrument(skip(self))]
    pub async fn create_job(&self) -> Result<IngestJob> {
        let mut current = self.current_job.lock().await;
        self.create_job_into(&mut current).await
    }

    /// Fetch the job's status and metadata.
    #[instrument(skip(self))]
    pub async fn get_job_info(&self, id: Option<&str>) -> Result<IngestJob> {
        let job_id = self.resolve_job_id(id).await?;
        self.api().await?.get_ingest_job(&job_id).await
    }

    /// Abort the job.
    #[instrument(skip(self))]
    pub async fn abort_job(&self, id: Option<&str>) -> Result<IngestJob> {
        let job_id = self.resolve_job_id(id).await?;
        self.api().await?.abort_ingest_job(&job_id).await
    }

    /// Mark the job's upload complete so the server queues it.
    #[instrument(skip(self))]
    pub async fn close_job(&self, id: Option<&str>) -> Result<IngestJob> {
        let job_id = self.resolve_job_id(id).await?;
        self.api().await?.close_ingest_job(&job_id).await
    }

    /// Delete the job.
    #[instrument(skip(self))]
    pub async fn delete_job(&self, id: Option<&str>) -> Result<()> {
        let job_id = self.resolve_job_id(id).await?;
        self.api().await?.delete_ingest_job(&job_id).await
    }

    /// Stream the records that were processed successfully.
    pub async fn get_successful_results(&self, id: Option<&str>) -> Result<ResultStream> {
        self.results(id, ResultKind::Successful).await
    }

    /// Stream the records that failed.
    pub async fn get_failed_results(&self, id: Option<&str>) -> Result<ResultStream> {
        self.results(id, ResultKind::Failed).await
    }

    /// Stream the records that were never processed.
    pub async fn get_unprocessed_records(&self, id: Option<&str>) -> Result<ResultStream> {
        self.results(id, ResultKind::Unprocessed).await
    }

    /// Poll the job until it reaches a terminal state.
    #[instrument(skip(self))]
    pub async fn wait_for_job(&self, id: Option<&str>) -> Result<IngestJob> {
        let job_id = self.resolve_job_id(id).await?;
        self.api().await?.wait_for_ingest_job(&job_id).await
    }

    #[instrument(skip(self))]
    async fn results(&self, id: Option<&str>, kind: ResultKind) -> Result<ResultStream> {
        let job_id = self.resolve_job_id(id).await?;
        self.api().await?.get_results(&job_id, kind).await
    }

    /// An empty explicit id counts as no id.
    async fn resolve_job_id(&self, id: Option<&str>) -> Result<String> {
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }

        self.current_job
            .lock()
            .await
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::NoJob))
    }

    /// Create a job while the caller holds the current-job lock.
    async fn create_job_into(&self, current: &mut Option<String>) -> Result<IngestJob> {
        let request = self.job_config.create_request()?;
        let job = self.api().await?.create_ingest_job(&request).await?;
        *current = Some(job.id.clone());
        Ok(job)
    }

    async fn token(&self) -> Result<&TokenResponse> {
        self.session
            .token
            .get_or_try_init(|| async {
                info!(login_url = %self.login_url, "Requesting access token");
                let token = self
                    .oauth
                    .password_grant(&self.login_url, &self.credentials)
                    .await?;
                Ok::<_, Error>(token)
            })
            .await
    }

    async fn api(&self) -> Result<&BulkApiClient> {
        self.session
            .api
            .get_or_try_init(|| async {
                let token = self.token().await?;
                let identity = self.oauth.identity(&token.id, &token.access_token).await?;
                let base_url = identity.instance_base_url()?;
                debug!(base_url = %base_url, "Resolved instance base URL");

                let client = SalesforceClient::with_http(
                    self.http.clone(),
                    base_url,
                    token.access_token.clone(),
                )?
                .with_api_version(&self.api_version);

                Ok::<_, Error>(
                    BulkApiClient::from_client(client)
                        .with_poll_interval(self.poll_interval)
                        .with_max_wait(self.max_wait),
                )
            })
            .await
    }
}

/// Builder for [`JobClient`].
///
/// `url`, `username`, `password`, `token`, `api_version`, `consumer_key` and
/// `consumer_secret` are required. Secrets are redacted in Debug output.
#[derive(Default, Clone)]
pub struct JobClientBuilder {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    api_version: Option<String>,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    object: Option<String>,
    operation: Option<BulkOperation>,
    external_id_field_name: Option<String>,
    line_ending: Option<LineEnding>,
    client_config: Option<ClientConfig>,
    poll_interval: Option<Duration>,
    max_wait: Option<Duration>,
}

impl std::fmt::Debug for JobClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("JobClientBuilder")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .field("token", &redacted(&self.token))
            .field("api_version", &self.api_version)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &redacted(&self.consumer_secret))
            .field("object", &self.object)
            .field("operation", &self.operation)
            .field("external_id_field_name", &self.external_id_field_name)
            .field("line_ending", &self.line_ending)
            .finish_non_exhaustive()
    }
}

impl JobClientBuilder {
    /// Load options from `SF_*` environment variables.
    ///
    /// Unset variables leave the option unset; [`build`](Self::build)
    /// reports any required one that is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let operation = lookup(env::OPERATION)
            .map(|op| op.parse::<BulkOperation>())
            .transpose()?;
        let line_ending = lookup(env::LINE_ENDING)
            .map(|ending| ending.parse::<LineEnding>())
            .transpose()?;

        Ok(Self {
            url: lookup(env::LOGIN_URL),
            username: lookup(env::USERNAME),
            password: lookup(env::PASSWORD),
            token: lookup(env::SECURITY_TOKEN),
            api_version: lookup(env::API_VERSION),
            consumer_key: lookup(env::CONSUMER_KEY),
            consumer_secret: lookup(env::CONSUMER_SECRET),
            object: lookup(env::OBJECT),
            operation,
            external_id_field_name: lookup(env::EXTERNAL_ID_FIELD),
            line_ending,
            ..Self::default()
        })
    }

    /// Login URL, e.g. `https://login.salesforce.com`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Security token appended to the password at login.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// API version, e.g. `62.0` (a leading `v` is accepted).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn consumer_key(mut self, key: impl Into<String>) -> Self {
        self.consumer_key = Some(key.into());
        self
    }

    pub fn consumer_secret(mut self, secret: impl Into<String>) -> Self {
        self.consumer_secret = Some(secret.into());
        self
    }

    /// Target SObject for created jobs.
    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn operation(mut self, operation: BulkOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// External ID field, sent only when set.
    pub fn external_id_field_name(mut self, field: impl Into<String>) -> Self {
        self.external_id_field_name = Some(field.into());
        self
    }

    /// Line ending declared for uploads. Left to the server default when unset.
    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = Some(line_ending);
        self
    }

    /// HTTP settings (timeouts, user agent, compression).
    ///
    /// The default sets no total request timeout.
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = Some(config);
        self
    }

    /// Interval between polls in [`JobClient::wait_for_job`].
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Upper bound on [`JobClient::wait_for_job`].
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Validate the options and build the client. No network traffic.
    pub fn build(self) -> Result<JobClient> {
        let url = required(self.url, "url")?;
        let username = required(self.username, "username")?;
        let password = required(self.password, "password")?;
        let token = required(self.token, "token")?;
        let api_version = required(self.api_version, "api_version")?;
        let consumer_key = required(self.consumer_key, "consumer_key")?;
        let consumer_secret = required(self.consumer_secret, "consumer_secret")?;

        let api_version = api_version.trim_start_matches(['v', 'V']).to_string();
        if api_version.is_empty() {
            return Err(Error::new(ErrorKind::MissingOption("api_version")));
        }

        let http = SfHttpClient::new(self.client_config.unwrap_or_default())?;

        Ok(JobClient {
            login_url: url.trim_end_matches('/').to_string(),
            api_version,
            credentials: PasswordCredentials::new(
                username,
                password,
                token,
                consumer_key,
                consumer_secret,
            ),
            job_config: JobConfig::new(
                self.object,
                self.operation,
                self.external_id_field_name,
                self.line_ending,
            ),
            oauth: OAuthClient::new(http.clone()),
            http,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            max_wait: self.max_wait.unwrap_or(DEFAULT_MAX_WAIT),
            session: Session::default(),
            current_job: Mutex::new(None),
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::new(ErrorKind::MissingOption(name))),
    }
}
