//! Driving loop connecting a line source, the transcoder and a record sink.
//!
//! The loop is strictly sequential: read a line, transcode it, await the
//! sink's acceptance, then read the next line. The sink's `accept` call is the
//! only suspension point that waits on downstream capacity, so memory stays
//! bounded to one in-flight record and the sink alone sets the pace.
//!
//! Delivery is at-least-once with no rollback: when a run aborts, records
//! already accepted by the sink stay accepted, and the error reports how many
//! there were.

use snafu::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{Config, STDIO_PATH, TranscoderConfig};
use crate::emit;
use crate::error::{
    AbortedSnafu, OpenSinkSnafu, OpenSourceSnafu, PipelineError, SinkRejectedSnafu,
    TranscodeError,
};
use crate::metrics::events::{ActiveRuns, RecordEmitted, SinkAcceptCompleted, SinkRejected};
use crate::sink::{RecordSink, WriterSink};
use crate::source::{LineSource, ReaderLineSource};
use crate::transcode::Transcoder;

/// Statistics about a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeStats {
    /// Records accepted by the sink.
    pub records_emitted: u64,
    /// Serialized bytes accepted by the sink.
    pub bytes_emitted: u64,
}

/// Hand one record to the sink and wait for it to resolve.
///
/// A sink failure is wrapped as [`TranscodeError::SinkRejected`] for `row`.
/// No retry is attempted.
pub async fn emit_record<K>(sink: &mut K, record: String, row: u64) -> Result<(), TranscodeError>
where
    K: RecordSink + ?Sized,
{
    let bytes = record.len() as u64;
    let started = Instant::now();
    let result = sink.accept(record).await;
    emit!(SinkAcceptCompleted {
        duration: started.elapsed()
    });

    match result {
        Ok(()) => {
            emit!(RecordEmitted { bytes });
            Ok(())
        }
        Err(e) => {
            emit!(SinkRejected);
            Err(e).context(SinkRejectedSnafu { row })
        }
    }
}

/// Transcode every row of `source` into `sink`, one record at a time.
///
/// Returns the number of records emitted. Any error aborts the run and is
/// returned as [`PipelineError::Aborted`] carrying the count of records the
/// sink had already accepted.
pub async fn transcode_all<S, K>(
    source: S,
    sink: &mut K,
    config: &TranscoderConfig,
) -> Result<TranscodeStats, PipelineError>
where
    S: LineSource,
    K: RecordSink + ?Sized,
{
    emit!(ActiveRuns { delta: 1.0 });
    let mut stats = TranscodeStats::default();
    let result = drive(source, sink, config, &mut stats).await;
    emit!(ActiveRuns { delta: -1.0 });

    result.context(AbortedSnafu {
        emitted: stats.records_emitted,
    })?;
    Ok(stats)
}

async fn drive<S, K>(
    source: S,
    sink: &mut K,
    config: &TranscoderConfig,
    stats: &mut TranscodeStats,
) -> Result<(), TranscodeError>
where
    S: LineSource,
    K: RecordSink + ?Sized,
{
    let mut transcoder = Transcoder::initialize(source, config).await?;

    while let Some(record) = transcoder.next_record().await? {
        let bytes = record.len() as u64;
        let row = transcoder.rows_read();
        emit_record(sink, record, row).await?;

        stats.records_emitted += 1;
        stats.bytes_emitted += bytes;
    }

    debug!(
        rows = transcoder.rows_read(),
        records = stats.records_emitted,
        "Reached end of input"
    );
    Ok(())
}

/// Run the configured source and sink through [`transcode_all`].
///
/// This is the hosting glue used by the binary: it opens a file or stdin as
/// the source and a file or stdout as the sink.
pub async fn run(config: &Config) -> Result<TranscodeStats, PipelineError> {
    let source: Box<dyn LineSource> = if config.source.path == STDIO_PATH {
        Box::new(ReaderLineSource::stdin())
    } else {
        Box::new(
            ReaderLineSource::open(&config.source.path)
                .await
                .context(OpenSourceSnafu {
                    path: config.source.path.clone(),
                })?,
        )
    };

    let mut sink: Box<dyn RecordSink> = if config.sink.path == STDIO_PATH {
        Box::new(WriterSink::stdout())
    } else {
        Box::new(
            WriterSink::create(&config.sink.path)
                .await
                .context(OpenSinkSnafu {
                    path: config.sink.path.clone(),
                })?,
        )
    };

    info!(
        source = %config.source.path,
        sink = %config.sink.path,
        delimiter = %config.transcoder.delimiter,
        "Starting transcoding run"
    );

    transcode_all(source, sink.as_mut(), &config.transcoder).await
}
