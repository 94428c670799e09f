//! Error types for sf-bulk.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// HTTP status of the failed call, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        let source = self.source.as_deref()?;

        if let Some(err) = source.downcast_ref::<sf_ingest_client::Error>() {
            return err.status();
        }

        match source.downcast_ref::<sf_ingest_auth::Error>() {
            Some(sf_ingest_auth::Error {
                kind: sf_ingest_auth::ErrorKind::Http { status, .. },
                ..
            }) => *status,
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Client error: {0}")]
    Client(String),
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("No job id given and no job has been created")]
    NoJob,
    #[error("Job error: {0}")]
    Job(String),
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl From<sf_ingest_client::Error> for Error {
    fn from(err: sf_ingest_client::Error) -> Self {
        Error::with_source(ErrorKind::Client(err.to_string()), err)
    }
}

impl From<sf_ingest_auth::Error> for Error {
    fn from(err: sf_ingest_auth::Error) -> Self {
        Error::with_source(ErrorKind::Auth(err.to_string()), err)
    }
}
