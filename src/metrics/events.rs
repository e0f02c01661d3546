//! Internal events for sleet metrics emission.
//!
//! Each event struct represents a measurable occurrence while transcoding.
//! Events implement the `InternalEvent` trait which records the corresponding
//! metric through the `metrics` facade. Without an installed recorder the
//! calls are no-ops.

use metrics::{counter, gauge, histogram};
use std::time::Duration;
use tracing::trace;

/// Trait for internal events that can be emitted as metrics.
pub trait InternalEvent {
    /// Emit this event as a metric.
    fn emit(self);
}

/// Event emitted when the sink accepts a record.
pub struct RecordEmitted {
    pub bytes: u64,
}

impl InternalEvent for RecordEmitted {
    fn emit(self) {
        trace!(bytes = self.bytes, "Record emitted");
        counter!("sleet_records_emitted_total").increment(1);
        counter!("sleet_bytes_emitted_total").increment(self.bytes);
    }
}

/// Why a row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Short,
    Long,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Short => "short",
            RejectReason::Long => "long",
        }
    }
}

/// Event emitted when a row fails header alignment.
pub struct RowRejected {
    pub reason: RejectReason,
}

impl InternalEvent for RowRejected {
    fn emit(self) {
        trace!(reason = self.reason.as_str(), "Row rejected");
        counter!("sleet_rows_rejected_total", "reason" => self.reason.as_str()).increment(1);
    }
}

/// Event emitted when trailing values beyond the header are dropped.
pub struct ValuesTruncated {
    pub count: u64,
}

impl InternalEvent for ValuesTruncated {
    fn emit(self) {
        trace!(count = self.count, "Values truncated");
        counter!("sleet_values_truncated_total").increment(self.count);
    }
}

/// Event emitted when the sink fails to accept a record.
pub struct SinkRejected;

impl InternalEvent for SinkRejected {
    fn emit(self) {
        trace!("Sink rejected record");
        counter!("sleet_sink_rejections_total").increment(1);
    }
}

/// Event emitted when a sink accept call resolves, successfully or not.
pub struct SinkAcceptCompleted {
    pub duration: Duration,
}

impl InternalEvent for SinkAcceptCompleted {
    fn emit(self) {
        trace!(
            duration_ms = self.duration.as_millis(),
            "Sink accept completed"
        );
        histogram!("sleet_sink_accept_duration_seconds").record(self.duration.as_secs_f64());
    }
}

/// Event emitted when a run starts or finishes, tracking concurrent runs.
pub struct ActiveRuns {
    pub delta: f64,
}

impl InternalEvent for ActiveRuns {
    fn emit(self) {
        trace!(delta = self.delta, "Active runs changed");
        gauge!("sleet_active_runs").increment(self.delta);
    }
}
