//! Line source over async readers.
//!
//! Wraps any tokio buffered reader and yields its lines lazily. `\n` and
//! `\r\n` terminators are stripped, a UTF-8 byte order mark at the start of
//! the input is dropped, and invalid UTF-8 is replaced with U+FFFD rather than
//! failing the read.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio_util::io::StreamReader;
use tracing::debug;

use super::LineSource;

const BOM: char = '\u{feff}';

/// A [`LineSource`] reading from an [`AsyncBufRead`].
pub struct ReaderLineSource<R> {
    reader: R,
    buf: Vec<u8>,
    lines_read: u64,
}

impl<R> ReaderLineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Create a source over a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            lines_read: 0,
        }
    }

    /// Number of lines yielded so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

impl ReaderLineSource<BufReader<File>> {
    /// Open a file for reading.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        debug!(path = %path.display(), "Opened input file");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl ReaderLineSource<BufReader<Stdin>> {
    /// Read lines from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<S> ReaderLineSource<StreamReader<S, Bytes>>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin + Send,
{
    /// Read lines from a stream of byte chunks, such as a blob download.
    ///
    /// Chunk boundaries need not align with line boundaries.
    pub fn from_byte_stream(stream: S) -> Self {
        Self::new(StreamReader::new(stream))
    }
}

#[async_trait]
impl<R> LineSource for ReaderLineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }

        let mut bytes = self.buf.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest.strip_suffix(b"\r").unwrap_or(rest);
        }

        let mut line = String::from_utf8_lossy(bytes).into_owned();
        if self.lines_read == 0 && line.starts_with(BOM) {
            line.replace_range(..BOM.len_utf8(), "");
        }

        self.lines_read += 1;
        Ok(Some(line))
    }
}
