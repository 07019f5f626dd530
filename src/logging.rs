//! Structured logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the application (or the `cable` binary). [`init_logging_with_config`]
//! installs the usual one: an `EnvFilter` plus a JSON or pretty fmt layer,
//! optionally written through a non-blocking `tracing-appender` worker.
//!
//! | Variable                     | Default |
//! |------------------------------|---------|
//! | `CABLE_LOG_LEVEL`            | `info`  |
//! | `CABLE_LOG_FORMAT`           | `json` (`pretty` also accepted) |
//! | `CABLE_LOG_OUTPUT`           | `stdout` (`stderr` also accepted) |
//! | `CABLE_LOG_ASYNC`            | `false` |
//! | `CABLE_LOG_TARGET_FILTER`    | unset, comma-separated, e.g. `cable::router=debug` |
//! | `CABLE_LOG_INCLUDE_LOCATION` | `false` |
//!
//! `RUST_LOG`, when set, takes precedence over `CABLE_LOG_LEVEL`.

use std::env;
use std::io;

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::parse_bool;

/// Event encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, with span context
    Json,
    /// Multi-line human readable output
    Pretty,
}

impl LogFormat {
    /// Parse a format name; anything but `pretty` is JSON.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("pretty") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

/// Stream events are written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

impl LogOutput {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("stderr") {
            LogOutput::Stderr
        } else {
            LogOutput::Stdout
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Write through a background worker thread
    pub async_logging: bool,
    /// Extra `EnvFilter` directives, comma-separated
    pub target_filter: Option<String>,
    /// Include file:line in events
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            output: LogOutput::Stdout,
            async_logging: false,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Read the `CABLE_LOG_*` variables on top of [`LogConfig::default`].
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = env::var("CABLE_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Ok(format) = env::var("CABLE_LOG_FORMAT") {
            config.format = LogFormat::parse(&format);
        }
        if let Ok(output) = env::var("CABLE_LOG_OUTPUT") {
            config.output = LogOutput::parse(&output);
        }
        if let Some(flag) = env::var("CABLE_LOG_ASYNC").ok().and_then(|s| parse_bool(&s)) {
            config.async_logging = flag;
        }
        config.target_filter = env::var("CABLE_LOG_TARGET_FILTER")
            .ok()
            .filter(|s| !s.trim().is_empty());
        if let Some(flag) = env::var("CABLE_LOG_INCLUDE_LOCATION")
            .ok()
            .and_then(|s| parse_bool(&s))
        {
            config.include_location = flag;
        }
        config
    }

    /// Debug level, pretty output with source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Self::default()
        }
    }

    fn level(&self) -> LevelFilter {
        self.log_level.trim().parse().unwrap_or(LevelFilter::INFO)
    }

    fn env_filter(&self) -> EnvFilter {
        let base = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().to_string()));

        self.target_filter
            .iter()
            .flat_map(|f| f.split(','))
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .fold(base, |filter, directive| match directive.parse() {
                Ok(directive) => filter.add_directive(directive),
                Err(_) => {
                    eprintln!("Warning: Invalid log filter directive: {directive}");
                    filter
                }
            })
    }

    fn fmt_layer(&self, writer: BoxMakeWriter) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_target(true)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_writer(writer);
        match self.format {
            LogFormat::Json => layer
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
        }
    }
}

/// Keeps the background log writer alive.
///
/// Buffered events are flushed when the guard is dropped, so hold it until
/// the process is about to exit. Synchronous logging returns an empty guard.
#[must_use = "dropping the guard stops the background log writer"]
#[derive(Debug)]
pub struct LoggingGuard(Option<WorkerGuard>);

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
///
/// ```no_run
/// use cable::logging::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::from_env()).expect("logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> anyhow::Result<LoggingGuard> {
    let (writer, guard) = match (config.async_logging, config.output) {
        (false, LogOutput::Stdout) => (BoxMakeWriter::new(io::stdout), None),
        (false, LogOutput::Stderr) => (BoxMakeWriter::new(io::stderr), None),
        (true, LogOutput::Stdout) => {
            let (writer, guard) = tracing_appender::non_blocking(io::stdout());
            (BoxMakeWriter::new(writer), Some(guard))
        }
        (true, LogOutput::Stderr) => {
            let (writer, guard) = tracing_appender::non_blocking(io::stderr());
            (BoxMakeWriter::new(writer), Some(guard))
        }
    };

    tracing_subscriber::registry()
        .with(config.fmt_layer(writer))
        .with(config.env_filter())
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(LoggingGuard(guard))
}
