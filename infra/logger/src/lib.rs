//! # Logger
//!
//! Installs the global `tracing` subscriber for applications that host the billing
//! adapter. The adapter crates only emit events; this crate decides where they go:
//! console, rolling files (optionally JSON), filtered by level, explicit directives
//! and `RUST_LOG`.
//!
//! Configure either in code through [`Logger::builder`] or from the `logging`
//! section of the billing configuration through [`Logger::from_config`].
//!
//! ## Example
//!
//! ```rust
//! # use pbill_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("billing-host")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .env_filter("pbill_billing=trace")
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use pbill_domain::config::LoggingConfig;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Rolling file output settings.
#[derive(Debug, Clone)]
pub struct FileOutput {
    directory: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl FileOutput {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }
}

#[derive(Debug)]
struct Settings {
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    file: Option<FileOutput>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { console: true, level: LevelFilter::INFO, env_filter: None, file: None }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl private::Sealed for NoName {}
impl private::Sealed for WithName {}

/// A builder for configuring and initializing the global tracing subscriber.
///
/// A name is required before [`LoggerBuilder::init`] becomes available.
#[derive(Debug)]
pub struct LoggerBuilder<N: private::Sealed = NoName> {
    settings: Settings,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name of the logger; it prefixes rolling file names.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { settings: self.settings, name: WithName(name.into()) }
    }
}

impl<N: private::Sealed> LoggerBuilder<N> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Adds explicit filter directives (e.g., `pbill_billing=debug`).
    ///
    /// Invalid directives cause [`LoggerBuilder::init`] to return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.settings.env_filter = Some(filter.into());
        self
    }

    /// Enables console logging.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Adds rolling file output.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn file(mut self, output: FileOutput) -> Self {
        self.settings.file = Some(output);
        self
    }
}

impl LoggerBuilder<WithName> {
    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. **Note:** This handle contains a [`WorkerGuard`]
    /// that must be kept alive for the duration of the program to ensure
    /// that non-blocking logs are flushed correctly.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        validate(&self.settings, &name)?;

        let env_filter = build_env_filter(&self.settings)?;
        let mut layers = Vec::new();

        if self.settings.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match self.settings.file {
            Some(output) => {
                fs::create_dir_all(&output.directory).context(format!(
                    "Failed to create log directory: {}",
                    output.directory.display()
                ))?;

                let appender = RollingFileAppender::builder()
                    .rotation(output.rotation)
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(output.max_files)
                    .build(&output.directory)?;

                let (writer, guard) = tracing_appender::non_blocking(appender);
                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if output.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;
        tracing::debug!(logger = %name, "Logging initialized");

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// This struct holds the background worker guard. Drop it only when the
/// application is shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: NoName }
    }

    /// Builds the logger described by the `logging` configuration section.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level name, plus
    /// everything [`LoggerBuilder::init`] can return.
    pub fn from_config(config: &LoggingConfig) -> Result<Self, LoggerError> {
        let builder = Self::builder()
            .name(config.name.clone())
            .console(config.console)
            .level(parse_level(&config.level)?);

        let builder = match &config.filter {
            Some(filter) => builder.env_filter(filter.clone()),
            None => builder,
        };

        let builder = match &config.directory {
            Some(directory) => builder.file(
                FileOutput::new(directory).max_files(config.max_files).json(config.json),
            ),
            None => builder,
        };

        builder.init()
    }

    /// Best-effort synchronization point before shutdown; the actual flush
    /// happens when this handle is dropped.
    pub fn flush(&self) {
        tracing::debug!("Logger flushed");
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{level}': {e}").into(),
        context: None,
    })
}

fn validate(settings: &Settings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if settings.file.as_ref().is_some_and(|f| f.max_files == 0) {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(settings: &Settings) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(settings.level.into());
    settings.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_logger_builder_initial_state() {
        let builder = Logger::builder().name("test-app").env_filter("pbill=debug");
        assert!(builder.settings.console);
        assert_eq!(builder.settings.level, LevelFilter::INFO);
        assert_eq!(builder.settings.env_filter.as_deref(), Some("pbill=debug"));
        assert!(builder.settings.file.is_none());
    }

    #[test]
    fn test_file_output_configuration() {
        let output = FileOutput::new("logs").max_files(5).json(true);
        let builder = Logger::builder().level(LevelFilter::DEBUG).file(output).name("test-app");

        let file = builder.settings.file.as_ref().expect("file output configured");
        assert_eq!(file.max_files, 5);
        assert!(file.json);
        assert_eq!(file.directory, PathBuf::from("logs"));
        assert_eq!(builder.settings.level, LevelFilter::DEBUG);
    }

    #[test]
    fn test_parse_level_accepts_names_case_insensitively() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(matches!(parse_level("loud"), Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    #[serial]
    fn test_invalid_settings_are_rejected_before_install() {
        let empty_name = Logger::builder().name("  ").init();
        assert!(matches!(empty_name, Err(LoggerError::InvalidConfiguration { .. })));

        let no_layers = Logger::builder().name("silent").console(false).init();
        assert!(matches!(no_layers, Err(LoggerError::InvalidConfiguration { .. })));

        let zero_files =
            Logger::builder().name("files").file(FileOutput::new("logs").max_files(0)).init();
        assert!(matches!(zero_files, Err(LoggerError::InvalidConfiguration { .. })));

        let bad_filter = Logger::builder().name("filtered").env_filter("pbill_billing=loudest").init();
        assert!(matches!(bad_filter, Err(LoggerError::InvalidConfiguration { .. })));
    }
}
