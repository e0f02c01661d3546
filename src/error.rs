//! Error types for sleet using snafu.
//!
//! This module defines structured error types with context selectors for
//! all error conditions in the codebase.

use snafu::prelude::*;

/// Error type surfaced by record sinks.
///
/// Boxed so that any sink adapter can report its own failure through the
/// same channel the transcoder awaits.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

// ============ Transcode Errors ============

/// Errors that abort a transcoding run.
///
/// `row` is the 1-based index of the data row being processed; the header
/// line is not counted.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TranscodeError {
    /// The source yielded no lines at all, so there is no header.
    #[snafu(display("Input stream is empty: no header line"))]
    EmptyStream,

    /// A row has fewer values than the header has fields.
    #[snafu(display("Row {row} is short: expected {expected} fields, found {actual}"))]
    ShortRow {
        row: u64,
        expected: usize,
        actual: usize,
    },

    /// A row has more values than the header has fields.
    #[snafu(display("Row {row} is long: expected {expected} fields, found {actual}"))]
    LongRow {
        row: u64,
        expected: usize,
        actual: usize,
    },

    /// Reading the next line from the source failed.
    #[snafu(display("Failed to read line for row {row}"))]
    ReadLine { row: u64, source: std::io::Error },

    /// Serializing a record failed.
    #[snafu(display("Failed to serialize row {row}"))]
    Serialize {
        row: u64,
        source: serde_json::Error,
    },

    /// The sink failed to accept a record.
    #[snafu(display("Sink rejected row {row}"))]
    SinkRejected { row: u64, source: SinkError },
}

impl TranscodeError {
    /// The data row the error is attributed to, if any.
    pub fn row(&self) -> Option<u64> {
        match self {
            TranscodeError::EmptyStream => None,
            TranscodeError::ShortRow { row, .. }
            | TranscodeError::LongRow { row, .. }
            | TranscodeError::ReadLine { row, .. }
            | TranscodeError::Serialize { row, .. }
            | TranscodeError::SinkRejected { row, .. } => Some(*row),
        }
    }

    /// Whether the error comes from a header/row arity mismatch.
    pub fn is_arity_mismatch(&self) -> bool {
        matches!(
            self,
            TranscodeError::ShortRow { .. } | TranscodeError::LongRow { .. }
        )
    }
}

// ============ Config Errors ============

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Delimiter is empty.
    #[snafu(display("Delimiter cannot be empty"))]
    EmptyDelimiter,

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },
}

// ============ Metrics Errors ============

/// Errors that can occur during metrics initialization.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MetricsError {
    /// Failed to initialize Prometheus recorder.
    #[snafu(display("Failed to initialize Prometheus recorder"))]
    PrometheusInit {
        source: metrics_exporter_prometheus::BuildError,
    },
}

// ============ Pipeline Error (top-level) ============

/// Top-level errors returned to the hosting layer.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    /// Configuration error.
    #[snafu(display("Configuration error"))]
    Config { source: ConfigError },

    /// The input could not be opened.
    #[snafu(display("Failed to open input {path}"))]
    OpenSource {
        path: String,
        source: std::io::Error,
    },

    /// The output could not be opened.
    #[snafu(display("Failed to open output {path}"))]
    OpenSink {
        path: String,
        source: std::io::Error,
    },

    /// The run stopped part way. Records already emitted stay emitted.
    #[snafu(display("Transcoding aborted after {emitted} records were emitted"))]
    Aborted { emitted: u64, source: TranscodeError },

    /// Address parsing error.
    #[snafu(display("Failed to parse address"))]
    AddressParse { source: std::net::AddrParseError },

    /// Metrics error.
    #[snafu(display("Metrics error"))]
    Metrics { source: MetricsError },
}

impl PipelineError {
    /// Number of records handed to the sink before the run aborted.
    pub fn records_emitted(&self) -> u64 {
        match self {
            PipelineError::Aborted { emitted, .. } => *emitted,
            _ => 0,
        }
    }

    /// The underlying transcoding failure, if the run got that far.
    pub fn transcode_error(&self) -> Option<&TranscodeError> {
        match self {
            PipelineError::Aborted { source, .. } => Some(source),
            _ => None,
        }
    }
}
