//! Line sources feeding the transcoder.
//!
//! A [`LineSource`] yields text lines strictly in order, one at a time.
//! `Ok(None)` marks a clean end of stream and is distinct from an empty
//! final line, which arrives as `Ok(Some(String::new()))`.
//!
//! Line terminators are `\n` and `\r\n`. A lone `\r` is not a terminator and
//! stays in the line as data, so old Mac-style input reads as a single line.

mod reader;

use async_trait::async_trait;
use std::collections::VecDeque;

pub use reader::ReaderLineSource;

/// Ordered, lazy producer of text lines.
#[async_trait]
pub trait LineSource: Send {
    /// Read the next line without its terminator.
    ///
    /// Returns `Ok(None)` once the stream is exhausted.
    async fn next_line(&mut self) -> std::io::Result<Option<String>>;
}

#[async_trait]
impl<S: LineSource + ?Sized> LineSource for Box<S> {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        (**self).next_line().await
    }
}

/// In-memory line source.
#[derive(Debug, Clone, Default)]
pub struct IterLineSource {
    lines: VecDeque<String>,
}

impl IterLineSource {
    /// Create a source over the given lines.
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a source by splitting `text` on `\n`, the way a line reader would.
    ///
    /// A trailing terminator does not produce an extra empty line.
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<&str> = text.split('\n').collect();
        if text.is_empty() || text.ends_with('\n') {
            lines.pop();
        }
        Self::new(
            lines
                .into_iter()
                .map(|line| line.strip_suffix('\r').unwrap_or(line)),
        )
    }

    /// Number of lines not yet read.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl LineSource for IterLineSource {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
