//! Configuration schema definitions.

use quarry_core::strategy::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuarryConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Plugin resolution settings.
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file, used when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,

    /// Span lifecycle events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Per-target levels, e.g. `quarry_core = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            thread_ids: false,
            file_location: false,
            span_events: SpanEventConfig::default(),
            filters: HashMap::new(),
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    #[cfg(feature = "json-log")]
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    /// Default so that command output on stdout stays clean.
    #[default]
    Stderr,
    File,
}

/// Span events to log.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    /// Logs span duration when a resolution finishes.
    #[serde(default)]
    pub close: bool,
}

// =============================================================================
// Resolution
// =============================================================================

/// Plugin resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResolutionConfig {
    /// Plugins bundled with the host.
    #[serde(default)]
    pub builtin: BuiltinConfig,

    /// Roots searched for locally built plugin descriptors.
    #[serde(default)]
    pub classpath: Vec<PathBuf>,

    /// Declared repositories, in resolution order.
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,

    /// Never contact the remote plugin service.
    #[serde(default)]
    pub offline: bool,
}

/// Builtin plugin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinConfig {
    /// Namespace of bundled plugins.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Ids of bundled plugins. Unqualified ids join the namespace.
    #[serde(default)]
    pub plugins: Vec<String>,
}

impl Default for BuiltinConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            plugins: Vec::new(),
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// A declared repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Absolute URL, or a path relative to the configuration directory.
    pub url: String,
}

impl RepositoryConfig {
    /// Creates a repository entry.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
