//! Row-to-record transcoding.
//!
//! The [`Transcoder`] reads the header line once, then turns each following
//! line into one JSON record. Rows are split on the configured delimiter with
//! no quote handling: a value that contains the delimiter is split like any
//! other field boundary.
//!
//! Alignment is strict by default. A row with fewer values than the header is
//! a [`TranscodeError::ShortRow`], one with more is a
//! [`TranscodeError::LongRow`]. With `truncate_extra_fields` set, excess
//! trailing values are dropped instead; short rows are always rejected.

mod record;

use snafu::prelude::*;
use tracing::{debug, trace};

use crate::config::{RecordLayout, TranscoderConfig};
use crate::emit;
use crate::error::{
    EmptyStreamSnafu, LongRowSnafu, ReadLineSnafu, SerializeSnafu, ShortRowSnafu, TranscodeError,
};
use crate::metrics::events::{RejectReason, RowRejected, ValuesTruncated};
use crate::source::LineSource;

use record::RecordView;

/// Ordered field names taken from the first line of the input.
///
/// Always holds at least one field: splitting any line, including an empty
/// one, yields at least one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    fields: Vec<String>,
}

impl Header {
    /// Parse a header line.
    pub fn parse(line: &str, delimiter: &str) -> Self {
        Self {
            fields: split_row(line, delimiter).map(str::to_string).collect(),
        }
    }

    /// Field names in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the header has no fields. Never true for a parsed header.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a line on `delimiter` without any quote awareness.
pub fn split_row<'a>(line: &'a str, delimiter: &'a str) -> impl Iterator<Item = &'a str> {
    line.split(delimiter)
}

/// Streaming transcoder bound to one line source.
///
/// Holds only the immutable header and a row counter; nothing from one row
/// is retained when the next is read.
pub struct Transcoder<S> {
    source: S,
    header: Header,
    delimiter: String,
    truncate_extra_fields: bool,
    layout: RecordLayout,
    rows_read: u64,
}

impl<S: LineSource> Transcoder<S> {
    /// Read the header line and build a transcoder over the rest of `source`.
    ///
    /// Consumes exactly one line. Fails with [`TranscodeError::EmptyStream`]
    /// when the source has no lines at all. A read failure on the header line
    /// is reported as row 0.
    pub async fn initialize(
        mut source: S,
        config: &TranscoderConfig,
    ) -> Result<Self, TranscodeError> {
        let line = source
            .next_line()
            .await
            .context(ReadLineSnafu { row: 0u64 })?
            .context(EmptyStreamSnafu)?;

        let header = Header::parse(&line, &config.delimiter);
        debug!(fields = header.len(), "Parsed header");

        Ok(Self {
            source,
            header,
            delimiter: config.delimiter.clone(),
            truncate_extra_fields: config.truncate_extra_fields,
            layout: config.layout,
            rows_read: 0,
        })
    }

    /// The parsed header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of data rows read so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Read and transcode the next row.
    ///
    /// Returns `Ok(None)` at end of stream. An error leaves nothing emitted for
    /// the failing row.
    pub async fn next_record(&mut self) -> Result<Option<String>, TranscodeError> {
        let row = self.rows_read + 1;
        let Some(line) = self
            .source
            .next_line()
            .await
            .context(ReadLineSnafu { row })?
        else {
            return Ok(None);
        };
        self.rows_read = row;

        let record = self.transcode_line(&line, row)?;
        trace!(row, bytes = record.len(), "Transcoded row");
        Ok(Some(record))
    }

    fn transcode_line(&self, line: &str, row: u64) -> Result<String, TranscodeError> {
        let expected = self.header.len();
        let mut values: Vec<&str> = split_row(line, &self.delimiter).collect();
        let actual = values.len();

        if actual < expected {
            emit!(RowRejected {
                reason: RejectReason::Short
            });
            return ShortRowSnafu {
                row,
                expected,
                actual,
            }
            .fail();
        }

        if actual > expected {
            if !self.truncate_extra_fields {
                emit!(RowRejected {
                    reason: RejectReason::Long
                });
                return LongRowSnafu {
                    row,
                    expected,
                    actual,
                }
                .fail();
            }
            emit!(ValuesTruncated {
                count: (actual - expected) as u64
            });
            values.truncate(expected);
        }

        RecordView {
            fields: self.header.fields(),
            values: &values,
        }
        .to_json(self.layout)
        .context(SerializeSnafu { row })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IterLineSource;

    fn strict() -> TranscoderConfig {
        TranscoderConfig::default()
    }

    async fn transcoder(text: &str, config: &TranscoderConfig) -> Transcoder<IterLineSource> {
        Transcoder::initialize(IterLineSource::from_text(text), config)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let err = Transcoder::initialize(IterLineSource::from_text(""), &strict())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, TranscodeError::EmptyStream));
    }

    #[tokio::test]
    async fn test_header_only_yields_nothing() {
        let mut t = transcoder("a,b,c\n", &strict()).await;
        assert_eq!(t.header().fields(), ["a", "b", "c"]);
        assert_eq!(t.next_record().await.unwrap(), None);
        assert_eq!(t.rows_read(), 0);
    }

    #[tokio::test]
    async fn test_pairs_values_by_position() {
        let mut t = transcoder("name,age\nAlice,30\nBob,25\n", &strict()).await;
        assert_eq!(
            t.next_record().await.unwrap().as_deref(),
            Some(r#"{"name":"Alice","age":"30"}"#)
        );
        assert_eq!(
            t.next_record().await.unwrap().as_deref(),
            Some(r#"{"name":"Bob","age":"25"}"#)
        );
        assert_eq!(t.next_record().await.unwrap(), None);
        assert_eq!(t.rows_read(), 2);
    }

    #[tokio::test]
    async fn test_short_row_rejected() {
        let mut t = transcoder("a,b,c\n1,2,3\n4,5\n", &strict()).await;
        t.next_record().await.unwrap();
        let err = t.next_record().await.unwrap_err();
        match err {
            TranscodeError::ShortRow {
                row,
                expected,
                actual,
            } => {
                assert_eq!((row, expected, actual), (2, 3, 2));
            }
            other => panic!("expected ShortRow, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_long_row_rejected_in_strict_mode() {
        let mut t = transcoder("a,b\n1,2,3\n", &strict()).await;
        let err = t.next_record().await.unwrap_err();
        assert!(matches!(
            err,
            TranscodeError::LongRow {
                row: 1,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_long_row_truncated_when_enabled() {
        let config = TranscoderConfig {
            truncate_extra_fields: true,
            ..TranscoderConfig::default()
        };
        let mut t = transcoder("a,b\n1,2,3,4\n", &config).await;
        assert_eq!(
            t.next_record().await.unwrap().as_deref(),
            Some(r#"{"a":"1","b":"2"}"#)
        );
    }

    #[tokio::test]
    async fn test_truncation_does_not_relax_short_rows() {
        let config = TranscoderConfig {
            truncate_extra_fields: true,
            ..TranscoderConfig::default()
        };
        let mut t = transcoder("a,b\n1\n", &config).await;
        assert!(matches!(
            t.next_record().await.unwrap_err(),
            TranscodeError::ShortRow { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_line_is_short_for_wide_header() {
        let mut t = transcoder("a,b\n\n", &strict()).await;
        assert!(matches!(
            t.next_record().await.unwrap_err(),
            TranscodeError::ShortRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_line_with_single_field_header() {
        let mut t = transcoder("only\n\nx\n", &strict()).await;
        assert_eq!(
            t.next_record().await.unwrap().as_deref(),
            Some(r#"{"only":""}"#)
        );
        assert_eq!(
            t.next_record().await.unwrap().as_deref(),
            Some(r#"{"only":"x"}"#)
        );
    }

    #[tokio::test]
    async fn test_custom_delimiter() {
        let config = TranscoderConfig {
            delimiter: "::".to_string(),
            ..TranscoderConfig::default()
        };
        let mut t = transcoder("k::v\na,b::c\n", &config).await;
        assert_eq!(
            t.next_record().await.unwrap().as_deref(),
            Some(r#"{"k":"a,b","v":"c"}"#)
        );
    }

    #[tokio::test]
    async fn test_quoted_delimiter_is_not_special() {
        let mut t = transcoder("a,b\n\"x,y\"\n", &strict()).await;
        assert_eq!(
            t.next_record().await.unwrap().as_deref(),
            Some(r#"{"a":"\"x","b":"y\""}"#)
        );
    }

    #[tokio::test]
    async fn test_pretty_layout() {
        let config = TranscoderConfig {
            layout: RecordLayout::Pretty,
            ..TranscoderConfig::default()
        };
        let mut t = transcoder("a,b\n1,2\n", &config).await;
        assert_eq!(
            t.next_record().await.unwrap().as_deref(),
            Some("{\n  \"a\": \"1\",\n  \"b\": \"2\"\n}")
        );
    }

    #[test]
    fn test_header_of_empty_line_has_one_field() {
        let header = Header::parse("", ",");
        assert_eq!(header.len(), 1);
        assert!(!header.is_empty());
        assert_eq!(header.fields(), [""]);
    }
}
