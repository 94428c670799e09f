//! Types for Bulk API 2.0 ingest jobs.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Deserialize API version that can be either a float (59.0) or string ("59.0").
pub(crate) fn deserialize_api_version<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ApiVersion {
        Float(f64),
        String(String),
    }

    Option::<ApiVersion>::deserialize(deserializer).map(|opt| {
        opt.map(|v| match v {
            ApiVersion::Float(f) => format!("{:.1}", f),
            ApiVersion::String(s) => s,
        })
    })
}

/// Bulk API 2.0 job states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Job is open and accepting data
    Open,
    /// Upload is complete, job is ready for processing
    UploadComplete,
    /// Job is processing
    InProgress,
    /// Job was aborted
    Aborted,
    /// Job completed successfully
    JobComplete,
    /// Job failed
    Failed,
}

impl JobState {
    /// Check if job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Aborted | JobState::JobComplete | JobState::Failed
        )
    }

    /// Check if job completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, JobState::JobComplete)
    }
}

/// Bulk API 2.0 operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkOperation {
    /// Insert new records
    Insert,
    /// Update existing records
    Update,
    /// Upsert based on external ID
    Upsert,
    /// Delete records (soft delete)
    Delete,
    /// Hard delete records (permanent)
    HardDelete,
    /// Query records
    Query,
    /// Query all records including deleted
    QueryAll,
}

impl BulkOperation {
    /// Get the API string for this operation.
    pub fn api_name(&self) -> &'static str {
        match self {
            BulkOperation::Insert => "insert",
            BulkOperation::Update => "update",
            BulkOperation::Upsert => "upsert",
            BulkOperation::Delete => "delete",
            BulkOperation::HardDelete => "hardDelete",
            BulkOperation::Query => "query",
            BulkOperation::QueryAll => "queryAll",
        }
    }
}

impl std::fmt::Display for BulkOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_name())
    }
}

impl std::str::FromStr for BulkOperation {
    type Err = Error;

    /// Parse an operation from its API name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        const ALL: [BulkOperation; 7] = [
            BulkOperation::Insert,
            BulkOperation::Update,
            BulkOperation::Upsert,
            BulkOperation::Delete,
            BulkOperation::HardDelete,
            BulkOperation::Query,
            BulkOperation::QueryAll,
        ];

        ALL.into_iter()
            .find(|op| op.api_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::new(ErrorKind::Config(format!("unknown operation: {s}"))))
    }
}

/// Line ending of the uploaded CSV. The server assumes `LF` when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style (LF)
    #[serde(rename = "LF")]
    Lf,
    /// Windows-style (CRLF)
    #[serde(rename = "CRLF")]
    Crlf,
}

impl std::str::FromStr for LineEnding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LF" => Ok(LineEnding::Lf),
            "CRLF" => Ok(LineEnding::Crlf),
            _ => Err(Error::new(ErrorKind::Config(format!("unknown line ending: {s}")))),
        }
    }
}

/// Which per-record result collection of a job to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// Records that were processed successfully
    Successful,
    /// Records that failed, with an error column
    Failed,
    /// Records that were never processed
    Unprocessed,
}

impl ResultKind {
    /// Path segment of the result collection under the job resource.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResultKind::Successful => "successfulResults",
            ResultKind::Failed => "failedResults",
            ResultKind::Unprocessed => "unprocessedrecords",
        }
    }
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Shape of the jobs a client creates. Fixed once the client is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobConfig {
    object: Option<String>,
    operation: Option<BulkOperation>,
    external_id_field_name: Option<String>,
    line_ending: Option<LineEnding>,
}

impl JobConfig {
    pub(crate) fn new(
        object: Option<String>,
        operation: Option<BulkOperation>,
        external_id_field_name: Option<String>,
        line_ending: Option<LineEnding>,
    ) -> Self {
        Self {
            object,
            operation,
            external_id_field_name,
            line_ending,
        }
    }

    /// Target SObject API name.
    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    /// Operation applied to each uploaded record.
    pub fn operation(&self) -> Option<BulkOperation> {
        self.operation
    }

    /// External ID field used to match records on upsert.
    pub fn external_id_field_name(&self) -> Option<&str> {
        self.external_id_field_name.as_deref()
    }

    /// Declared line ending of uploads, if any.
    pub fn line_ending(&self) -> Option<LineEnding> {
        self.line_ending
    }

    /// Build the create-job request, failing if object or operation is unset.
    pub(crate) fn create_request(&self) -> Result<CreateIngestJobRequest> {
        let object = self
            .object
            .as_deref()
            .ok_or_else(|| Error::new(ErrorKind::Config("object is required to create a job".into())))?;
        let operation = self.operation.ok_or_else(|| {
            Error::new(ErrorKind::Config(
                "operation is required to create a job".into(),
            ))
        })?;

        let mut request = CreateIngestJobRequest::new(object, operation);
        if let Some(ref field) = self.external_id_field_name {
            request = request.with_external_id_field(field);
        }
        if let Some(line_ending) = self.line_ending {
            request = request.with_line_ending(line_ending);
        }
        Ok(request)
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Request to create an ingest job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngestJobRequest {
    /// SObject API name
    pub object: String,
    /// Operation type
    pub operation: BulkOperation,
    /// External ID field for upsert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id_field_name: Option<String>,
    /// Line ending of the uploaded CSV
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_ending: Option<LineEnding>,
}

impl CreateIngestJobRequest {
    /// Create a new ingest job request.
    pub fn new(sobject: impl Into<String>, operation: BulkOperation) -> Self {
        Self {
            object: sobject.into(),
            operation,
            external_id_field_name: None,
            line_ending: None,
        }
    }

    /// Set the external ID field for upsert operations.
    pub fn with_external_id_field(mut self, field: impl Into<String>) -> Self {
        self.external_id_field_name = Some(field.into());
        self
    }

    /// Set the line ending.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = Some(line_ending);
        self
    }
}

/// Body of the PATCH that moves a job to a new state.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateJobStateRequest {
    pub state: JobState,
}

// =============================================================================
// Response Types
// =============================================================================

/// Ingest job response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestJob {
    /// Job ID
    pub id: String,
    /// Current state
    pub state: JobState,
    /// SObject API name
    pub object: String,
    /// Operation type
    pub operation: String,
    /// External ID field for upsert jobs
    #[serde(default)]
    pub external_id_field_name: Option<String>,
    /// Number of records processed
    #[serde(default)]
    pub number_records_processed: i64,
    /// Number of records failed
    #[serde(default)]
    pub number_records_failed: i64,
    /// Job creation time
    #[serde(default)]
    pub created_date: Option<String>,
    /// Last modification time
    #[serde(default)]
    pub system_modstamp: Option<String>,
    /// Total processing time in milliseconds
    #[serde(default)]
    pub total_processing_time: Option<i64>,
    /// API version (can be float like 59.0 or string like "59.0")
    #[serde(default, deserialize_with = "deserialize_api_version")]
    pub api_version: Option<String>,
    /// Concurrency mode
    #[serde(default)]
    pub concurrency_mode: Option<String>,
    /// Content type of the uploaded data
    #[serde(default)]
    pub content_type: Option<String>,
    /// Error message if failed
    #[serde(default)]
    pub error_message: Option<String>,
}
