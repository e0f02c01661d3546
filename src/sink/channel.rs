//! Sink forwarding records into a bounded channel.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::RecordSink;
use crate::error::SinkError;

/// Forwards records to a bounded [`mpsc`] channel.
///
/// `accept` waits for channel capacity, so a slow consumer throttles the
/// transcoder. A dropped receiver is reported as a rejection.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    /// Create a sink and the receiver draining it.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl RecordSink for ChannelSink {
    async fn accept(&mut self, record: String) -> Result<(), SinkError> {
        self.tx
            .send(record)
            .await
            .map_err(|_| "record channel closed".into())
    }
}
