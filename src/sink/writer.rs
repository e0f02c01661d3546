//! Sink writing records to an async byte writer.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter, Stdout};
use tracing::debug;

use super::RecordSink;
use crate::error::SinkError;

/// Writes each record followed by `\n`, flushing before `accept` resolves.
///
/// With the compact layout the output is newline-delimited JSON.
pub struct WriterSink<W> {
    writer: BufWriter<W>,
    bytes_written: u64,
}

impl<W: AsyncWrite + Unpin + Send> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            bytes_written: 0,
        }
    }

    /// Total bytes written, including separators.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Recover the inner writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterSink<File> {
    /// Create or truncate a file for writing.
    pub async fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).await?;
        debug!(path = %path.display(), "Opened output file");
        Ok(Self::new(file))
    }
}

impl WriterSink<Stdout> {
    /// Write records to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> RecordSink for WriterSink<W> {
    async fn accept(&mut self, record: String) -> Result<(), SinkError> {
        self.writer.write_all(record.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        self.bytes_written += record.len() as u64 + 1;
        Ok(())
    }
}
