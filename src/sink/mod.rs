//! Record sinks.
//!
//! A [`RecordSink`] accepts one serialized record at a time. The returned
//! future resolves once the record has been handed off, or fails; the
//! transcoder does not read another line until it has resolved.

mod channel;
mod writer;

use async_trait::async_trait;

pub use channel::ChannelSink;
pub use writer::WriterSink;

use crate::error::SinkError;

/// Single-item asynchronous consumer of serialized records.
#[async_trait]
pub trait RecordSink: Send {
    /// Hand off one record.
    async fn accept(&mut self, record: String) -> Result<(), SinkError>;
}

#[async_trait]
impl<K: RecordSink + ?Sized> RecordSink for Box<K> {
    async fn accept(&mut self, record: String) -> Result<(), SinkError> {
        (**self).accept(record).await
    }
}
