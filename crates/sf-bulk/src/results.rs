//! Streaming access to a job's per-record result collections.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use sf_ingest_client::ByteStream;

use crate::error::{Error, ErrorKind, Result};
use crate::types::ResultKind;

/// Raw CSV body of one result collection, read as it arrives.
///
/// Nothing is buffered or parsed. Use [`ResultStream::text`] only when the
/// result set is known to be small.
pub struct ResultStream {
    kind: ResultKind,
    inner: ByteStream,
}

impl std::fmt::Debug for ResultStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStream")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl ResultStream {
    pub(crate) fn new(kind: ResultKind, inner: ByteStream) -> Self {
        Self { kind, inner }
    }

    /// Which collection this stream reads.
    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Read the whole collection into a string.
    pub async fn text(mut self) -> Result<String> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.next().await {
            buf.extend_from_slice(&chunk?);
        }

        String::from_utf8(buf).map_err(|e| {
            Error::with_source(
                ErrorKind::Job(format!("{} body is not valid UTF-8", self.kind)),
                e,
            )
        })
    }

    /// Unwrap into the underlying byte stream.
    pub fn into_inner(self) -> ByteStream {
        self.inner
    }
}

impl Stream for ResultStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner
            .poll_next_unpin(cx)
            .map(|item| item.map(|chunk| chunk.map_err(Error::from)))
    }
}
