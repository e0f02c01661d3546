//! Configuration loading.
//!
//! Handles loading configuration from YAML files (with environment variable
//! interpolation) and validating the transcoder options.

mod vars;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::path::Path;

use crate::error::{
    ConfigError, EmptyDelimiterSnafu, EnvInterpolationSnafu, ReadFileSnafu, YamlParseSnafu,
};

/// Path value meaning stdin for the source and stdout for the sink.
pub const STDIO_PATH: &str = "-";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Row-to-record transcoding options.
    #[serde(default)]
    pub transcoder: TranscoderConfig,
    /// Where input lines come from.
    #[serde(default)]
    pub source: SourceConfig,
    /// Where records go.
    #[serde(default)]
    pub sink: SinkConfig,
    /// Metrics configuration (optional, disabled by default).
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Options controlling how rows become records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Field separator (default: ",").
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Drop trailing values beyond the header width instead of failing.
    #[serde(default)]
    pub truncate_extra_fields: bool,

    /// Output layout of each record.
    #[serde(default)]
    pub layout: RecordLayout,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            truncate_extra_fields: false,
            layout: RecordLayout::default(),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Textual layout of a serialized record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    /// Single-line JSON object.
    #[default]
    Compact,
    /// Two-space indented JSON object, one field per line.
    Pretty,
}

/// Input location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Input file path, or "-" for stdin.
    #[serde(default = "default_stdio_path")]
    pub path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_stdio_path(),
        }
    }
}

/// Output location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Output file path, or "-" for stdout.
    #[serde(default = "default_stdio_path")]
    pub path: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: default_stdio_path(),
        }
    }
}

fn default_stdio_path() -> String {
    STDIO_PATH.to_string()
}

/// Metrics configuration for the Prometheus endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether the metrics endpoint is started (default: false).
    #[serde(default)]
    pub enabled: bool,
    /// Address to bind the metrics HTTP server (default: "0.0.0.0:9090").
    #[serde(default = "default_metrics_address")]
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: default_metrics_address(),
        }
    }
}

fn default_metrics_address() -> String {
    "0.0.0.0:9090".to_string()
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).context(ReadFileSnafu)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, interpolating environment variables.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let content = vars::interpolate(content).map_err(|problems| {
            EnvInterpolationSnafu {
                message: problems.join("\n"),
            }
            .build()
        })?;

        let config: Config = serde_yaml::from_str(&content).context(YamlParseSnafu)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(!self.transcoder.delimiter.is_empty(), EmptyDelimiterSnafu);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.transcoder.delimiter, ",");
        assert!(!config.transcoder.truncate_extra_fields);
        assert_eq!(config.transcoder.layout, RecordLayout::Compact);
        assert_eq!(config.source.path, STDIO_PATH);
        assert_eq!(config.sink.path, STDIO_PATH);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_config_yaml_parsing() {
        let yaml = r#"
transcoder:
  delimiter: "|"
  truncate_extra_fields: true
  layout: pretty

source:
  path: /data/in.csv

sink:
  path: /data/out.ndjson
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.transcoder.delimiter, "|");
        assert!(config.transcoder.truncate_extra_fields);
        assert_eq!(config.transcoder.layout, RecordLayout::Pretty);
        assert_eq!(config.source.path, "/data/in.csv");
        assert_eq!(config.sink.path, "/data/out.ndjson");
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let err = Config::from_yaml("transcoder:\n  delimiter: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDelimiter));
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let err = Config::from_yaml("transcoder:\n  layout: fancy\n").unwrap_err();
        assert!(matches!(err, ConfigError::YamlParse { .. }));
    }
}
