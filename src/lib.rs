//! sleet: a streaming transcoder from delimited text rows to JSON records.
//!
//! The first line of the input is a header; every following line becomes one
//! JSON object pairing header fields with row values by position. Records are
//! handed to a sink one at a time, and the next line is not read until the
//! sink has accepted the previous record.
//!
//! # Example
//!
//! ```ignore
//! use sleet::{ChannelSink, IterLineSource, TranscoderConfig, transcode_all};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sleet::PipelineError> {
//!     let source = IterLineSource::from_text("name,age\nAlice,30\n");
//!     let (mut sink, mut rx) = ChannelSink::new(16);
//!     let stats = transcode_all(source, &mut sink, &TranscoderConfig::default()).await?;
//!     assert_eq!(rx.recv().await.as_deref(), Some(r#"{"name":"Alice","age":"30"}"#));
//!     println!("Emitted {} records", stats.records_emitted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod tracing;
pub mod transcode;

// Re-export main types
pub use config::{Config, RecordLayout, TranscoderConfig};
pub use error::{PipelineError, SinkError, TranscodeError};
pub use pipeline::{TranscodeStats, emit_record, run, transcode_all};
pub use sink::{ChannelSink, RecordSink, WriterSink};
pub use source::{IterLineSource, LineSource, ReaderLineSource};
pub use crate::tracing::init_tracing;
pub use transcode::{Header, Transcoder};
