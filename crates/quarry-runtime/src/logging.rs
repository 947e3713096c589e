//! Subscriber setup driven by [`LoggingConfig`].
//!
//! Each dispatch runs inside a `resolve` span carrying the plugin id. Turn on
//! `span_events.close` to get one line per resolution with its busy and idle
//! time:
//!
//! ```toml
//! [logging]
//! level = "info"
//! span_events = { close = true }
//! filters = { quarry_core = "debug" }
//! ```
//!
//! `RUST_LOG`, when set, replaces `level`. Per-target `filters` apply on top
//! of either.

use std::ffi::OsStr;
use std::path::Path;

use tracing::debug;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig, SpanEventConfig};

const DEFAULT_LOG_FILE: &str = "quarry.log";

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber for `config`.
///
/// Does nothing if a subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    if try_init_from_config(config).is_err() {
        debug!("Global subscriber already set, keeping it");
    }
}

/// Installs the global subscriber for `config`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn try_init_from_config(config: &LoggingConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(output_layer(config))
        .with(env_filter(config))
        .try_init()
}

/// Builds the level filter for `config`.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let level = LevelFilter::from_level(config.level.to_tracing_level());
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    target_directives(config)
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(filter, EnvFilter::add_directive)
}

/// Maps the configured span events onto formatter flags.
pub fn span_events(config: &SpanEventConfig) -> FmtSpan {
    [
        (config.new, FmtSpan::NEW),
        (config.enter, FmtSpan::ENTER),
        (config.exit, FmtSpan::EXIT),
        (config.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |events, (_, flag)| events | flag)
}

/// `target=level` directives, sorted by target.
fn target_directives(config: &LoggingConfig) -> Vec<String> {
    let mut directives: Vec<String> = config
        .filters
        .iter()
        .map(|(target, level)| format!("{target}={level}"))
        .collect();
    directives.sort();
    directives
}

fn output_layer(config: &LoggingConfig) -> OutputLayer {
    let layer = fmt::layer()
        .with_writer(writer(config))
        .with_span_events(span_events(&config.span_events))
        .with_thread_ids(config.thread_ids)
        .with_file(config.file_location)
        .with_line_number(config.file_location);

    match config.format {
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Full => layer.boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        #[cfg(feature = "json-log")]
        LogFormat::Json => layer.json().boxed(),
    }
}

fn writer(config: &LoggingConfig) -> BoxMakeWriter {
    match (config.output, &config.file_path) {
        (LogOutput::Stdout, _) => BoxMakeWriter::new(std::io::stdout),
        (LogOutput::File, Some(path)) => {
            let (dir, file) = split_log_path(path);
            match RollingFileAppender::builder()
                .filename_prefix(file.to_string_lossy())
                .build(dir)
            {
                Ok(appender) => BoxMakeWriter::new(appender),
                Err(e) => {
                    eprintln!("cannot open log file {}: {e}, logging to stderr", path.display());
                    BoxMakeWriter::new(std::io::stderr)
                }
            }
        }
        // Validation rejects file output without a path.
        (LogOutput::Stderr, _) | (LogOutput::File, None) => BoxMakeWriter::new(std::io::stderr),
    }
}

/// Splits a log path into the directory to create it in and its file name.
fn split_log_path(path: &Path) -> (&Path, &OsStr) {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file = path.file_name().unwrap_or(OsStr::new(DEFAULT_LOG_FILE));
    (dir, file)
}
