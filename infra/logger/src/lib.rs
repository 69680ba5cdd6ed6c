//! # Logger
//!
//! Process-wide structured logging for the broker, built on `tracing-subscriber`.
//!
//! Every event goes to stdout. With [`LoggerBuilder::errors_to_stderr`] errors are
//! additionally copied to stderr, so a platform that only scrapes stderr still sees
//! failures. An optional rolling file sink writes through a non-blocking worker.
//! `RUST_LOG` is honored unless [`LoggerBuilder::env_filter`] supplies directives.
//!
//! ## Example
//!
//! ```rust
//! # use osb_logger::{LogFormat, Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("broker")
//!     .format(LogFormat::Json)
//!     .errors_to_stderr(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Line format of the console sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human output with ANSI colors.
    #[default]
    Compact,
    /// Multi-line human output, for local debugging.
    Pretty,
    /// One JSON object per event.
    Json,
}

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    format: LogFormat,
    errors_to_stderr: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    file_json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            format: LogFormat::Compact,
            errors_to_stderr: false,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            file_json: false,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// Configures the global tracing subscriber. A name is required before [`init`](Self::init)
/// becomes available; file-only options appear once a [`path`](Self::path) is set.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Names the process; also the prefix of rolled log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder { name: WithName(name.into()), config: self.config, file_state: PhantomData }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes the log file as JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self) -> Self {
        self.config.file_json = true;
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Programmatic filter directives (e.g. `osb_broker=debug,tower_http=info`).
    ///
    /// Replaces `RUST_LOG`. Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Copies `ERROR` events to stderr in addition to stdout.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn errors_to_stderr(mut self, enabled: bool) -> Self {
        self.config.errors_to_stderr = enabled;
        self
    }

    /// Adds a rolling file sink in `path`.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, file_state: PhantomData }
    }

    /// Installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the file worker guard; keep it alive until shutdown
    /// or buffered file output is lost.
    ///
    /// # Errors
    /// [`LoggerError::Subscriber`] if a global subscriber is already set,
    /// [`LoggerError::InvalidConfiguration`] for unusable builder settings, and
    /// [`LoggerError::Io`] / [`LoggerError::Appender`] when the file sink cannot be opened.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { config, name: WithName(name), .. } = self;
        validate_config(&config, &name)?;

        let filter = build_env_filter(&config)?;
        let mut layers = Vec::new();

        if config.console {
            let console = if config.errors_to_stderr {
                let errors = io::stderr.with_max_level(Level::ERROR);
                console_layer(config.format, io::stdout.and(errors))
            } else {
                console_layer(config.format, io::stdout)
            };
            layers.push(console);
        }

        let guard = match &config.path {
            Some(path) => {
                let (file, guard) = file_layer(&config, &name, path)?;
                layers.push(file);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::invalid(
                "No logging layers enabled. Enable console or file output.",
            ));
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts configuring the global subscriber.
    ///
    /// ```rust
    /// use osb_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder().name("broker").level(LevelFilter::WARN).init().unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName, file_state: PhantomData }
    }

    /// The file worker guard, present only when a file sink is configured.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

fn console_layer<S, W>(format: LogFormat, writer: W) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = layer().with_writer(writer);
    match format {
        LogFormat::Compact => base.compact().with_ansi(true).boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().with_ansi(false).boxed(),
    }
}

fn file_layer<S>(
    config: &LoggerConfig,
    name: &str,
    path: &Path,
) -> Result<(BoxedLayer<S>, WorkerGuard), LoggerError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(path).context(format!("creating {}", path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(config.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.max_files)
        .build(path)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let base = layer().with_writer(writer).with_ansi(false);
    let boxed = if config.file_json { base.json().boxed() } else { base.boxed() };
    Ok((boxed, guard))
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::invalid("Logger name cannot be empty"));
    }
    if config.path.is_some() && config.max_files == 0 {
        return Err(LoggerError::invalid("max_files must be greater than zero"));
    }
    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    match &config.env_filter {
        Some(directives) => builder
            .parse(directives)
            .map_err(|e| LoggerError::invalid(format!("Invalid env filter '{directives}': {e}"))),
        None => Ok(builder.from_env_lossy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("broker");
        assert!(builder.config.console);
        assert!(!builder.config.errors_to_stderr);
        assert_eq!(builder.config.format, LogFormat::Compact);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert!(builder.config.path.is_none());
    }

    #[test]
    fn builder_records_file_settings() {
        let builder = Logger::builder()
            .name("broker")
            .errors_to_stderr(true)
            .env_filter("osb_broker=debug")
            .path("/var/log/broker")
            .max_files(3)
            .json();

        assert!(builder.config.errors_to_stderr);
        assert!(builder.config.file_json);
        assert_eq!(builder.config.max_files, 3);
        assert_eq!(builder.config.env_filter.as_deref(), Some("osb_broker=debug"));
        assert_eq!(builder.config.path.as_deref(), Some(Path::new("/var/log/broker")));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = validate_config(&LoggerConfig::default(), "  ").expect_err("blank name");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn zero_max_files_is_rejected_only_with_a_file_sink() {
        let mut config = LoggerConfig { max_files: 0, ..LoggerConfig::default() };
        assert!(validate_config(&config, "broker").is_ok());

        config.path = Some(PathBuf::from("logs"));
        assert!(validate_config(&config, "broker").is_err());
    }

    #[test]
    fn invalid_directives_are_rejected() {
        let config = LoggerConfig {
            env_filter: Some("osb_broker=loud".to_owned()),
            ..LoggerConfig::default()
        };
        assert!(build_env_filter(&config).is_err());
    }
}
