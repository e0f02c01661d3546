//! sleet: command-line host for the row-to-record transcoder.
//!
//! Reads a delimited file (or stdin), writes one JSON record per data row to
//! a file (or stdout).

use clap::Parser;
use snafu::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

use sleet::config::RecordLayout;
use sleet::error::{AddressParseSnafu, ConfigSnafu, MetricsSnafu, PipelineError};
use sleet::{Config, TranscodeError, init_tracing, run};

/// Delimited text to JSON records streaming tool.
#[derive(Parser, Debug)]
#[command(name = "sleet")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input file, or "-" for stdin. Overrides the config file.
    #[arg(short, long)]
    input: Option<String>,

    /// Output file, or "-" for stdout. Overrides the config file.
    #[arg(short, long)]
    output: Option<String>,

    /// Field delimiter. Overrides the config file.
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Drop values beyond the header width instead of failing the run.
    #[arg(long)]
    truncate_extra_fields: bool,

    /// Emit indented records instead of one record per line.
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    let config = build_config(&args)?;

    if config.metrics.enabled {
        let addr = config.metrics.address.parse().context(AddressParseSnafu)?;
        sleet::metrics::init(addr).context(MetricsSnafu)?;
    }

    let stats = match run(&config).await {
        Ok(stats) => stats,
        Err(e) => {
            if let Some(cause) = e.transcode_error().filter(|c| c.is_arity_mismatch()) {
                warn!(
                    row = cause.row(),
                    emitted = e.records_emitted(),
                    truncate_extra_fields = config.transcoder.truncate_extra_fields,
                    "Row width does not match the header"
                );
            }
            return Err(e);
        }
    };

    info!(
        records = stats.records_emitted,
        bytes = stats.bytes_emitted,
        "Transcoding completed"
    );

    Ok(())
}

/// Load the config file, if any, then apply command-line overrides.
fn build_config(args: &Args) -> Result<Config, PipelineError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path).context(ConfigSnafu)?,
        None => Config::default(),
    };

    if let Some(input) = &args.input {
        config.source.path = input.clone();
    }
    if let Some(output) = &args.output {
        config.sink.path = output.clone();
    }
    if let Some(delimiter) = &args.delimiter {
        config.transcoder.delimiter = delimiter.clone();
    }
    if args.truncate_extra_fields {
        config.transcoder.truncate_extra_fields = true;
    }
    if args.pretty {
        config.transcoder.layout = RecordLayout::Pretty;
    }

    config.validate().context(ConfigSnafu)?;
    Ok(config)
}
