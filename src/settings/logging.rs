//! Logging settings
//!
//! Builds the `LOGGING` mapping handed to the framework, and initialises
//! `tracing` for this process from the same mapping.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Handler every logger writes to.
pub const CONSOLE_HANDLER: &str = "normal_console";

const NORMAL_FORMAT: &str = "%(asctime)s.%(msecs)03d %(levelname)-7s %(name)s :\n  %(message)s";
const VERBOSE_FORMAT: &str = "%(asctime)s.%(msecs)03d %(levelname)-7s %(name)-20s %(filename)-15s %(funcName)30s() :\n  %(message)s";
const DATE_FORMAT: &str = "%H:%M:%S";

/// Severity threshold for a logger or handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    /// `Debug` in debug mode, `Info` otherwise.
    pub fn from_debug(debug: bool) -> Self {
        if debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
        }
    }

    /// Lowercase form used in `EnvFilter` directives.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formatter {
    pub format: String,
    pub datefmt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handler {
    pub level: LogLevel,
    pub class: String,
    pub formatter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Logger {
    pub handlers: Vec<String>,
    pub level: LogLevel,
}

/// The `LOGGING` mapping (dictConfig schema, version 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    pub version: u32,
    pub disable_existing_loggers: bool,
    pub formatters: BTreeMap<String, Formatter>,
    pub handlers: BTreeMap<String, Handler>,
    pub loggers: BTreeMap<String, Logger>,
}

impl LoggingConfig {
    /// Console logging with `django` at INFO and the application loggers at
    /// `level`.
    pub fn new(level: LogLevel) -> Self {
        let formatter = |format: &str| Formatter {
            format: format.to_string(),
            datefmt: DATE_FORMAT.to_string(),
        };
        let formatters = BTreeMap::from([
            ("normal".to_string(), formatter(NORMAL_FORMAT)),
            ("verbose".to_string(), formatter(VERBOSE_FORMAT)),
        ]);

        let handlers = BTreeMap::from([(
            CONSOLE_HANDLER.to_string(),
            Handler {
                level: LogLevel::Debug,
                class: "logging.StreamHandler".to_string(),
                formatter: "normal".to_string(),
            },
        )]);

        let logger = |level| Logger {
            handlers: vec![CONSOLE_HANDLER.to_string()],
            level,
        };
        let loggers = BTreeMap::from([
            ("django".to_string(), logger(LogLevel::Info)),
            ("nautobot".to_string(), logger(level)),
            ("rq.worker".to_string(), logger(level)),
        ]);

        Self {
            version: 1,
            disable_existing_loggers: false,
            formatters,
            handlers,
            loggers,
        }
    }

    /// Formatter name used by the console handler.
    pub fn console_formatter(&self) -> Option<&str> {
        self.handlers
            .get(CONSOLE_HANDLER)
            .map(|handler| handler.formatter.as_str())
    }

    /// `EnvFilter` directives equivalent to the configured loggers.
    ///
    /// Dotted logger names become `::`-separated targets. This crate's own
    /// events follow the `nautobot` logger.
    pub fn filter_directives(&self) -> String {
        let own_level = self
            .loggers
            .get("nautobot")
            .map(|logger| logger.level)
            .unwrap_or(LogLevel::Info);

        let mut directives: Vec<String> = self
            .loggers
            .iter()
            .map(|(name, logger)| {
                format!("{}={}", name.replace('.', "::"), logger.level.as_directive())
            })
            .collect();
        directives.push(format!(
            "{}={}",
            env!("CARGO_CRATE_NAME"),
            own_level.as_directive()
        ));
        directives.join(",")
    }
}

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence over the configured loggers.
pub fn init_tracing(logging: &LoggingConfig) {
    let verbose = logging.console_formatter() == Some("verbose");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logging.filter_directives().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .init();
}
