#![forbid(unsafe_code)]

//! Logging initialisation.
//!
//! All mtui crates log through [`tracing`]. This module installs a global
//! `tracing-subscriber` fmt subscriber for embedders that do not bring their
//! own. Since the UI owns the terminal, output goes to a file when one is
//! configured and to stderr otherwise.
//!
//! The filter uses `EnvFilter` syntax (`"mtui_keymap=debug,warn"`). The
//! `MTUI_LOG` environment variable, when set, replaces the configured filter.

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides [`LogConfig::filter`].
pub const LOG_ENV: &str = "MTUI_LOG";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    /// Append log lines to this file instead of stderr.
    pub file: Option<PathBuf>,
    /// Emit JSON lines (needs the `json-logs` feature).
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            file: None,
            json: false,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// The effective filter, honouring [`LOG_ENV`].
    pub fn effective_filter(&self) -> String {
        self.effective_filter_with(|key| std::env::var(key).ok())
    }

    fn effective_filter_with<F>(&self, get_env: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        match get_env(LOG_ENV) {
            Some(v) if !v.trim().is_empty() => v,
            _ => self.filter.clone(),
        }
    }
}

/// Errors from [`init_logging`].
#[derive(Debug)]
pub enum LogError {
    /// A global subscriber is already installed.
    AlreadyInitialised,
    /// The filter string could not be parsed.
    Filter(String),
    /// The log file could not be opened.
    Io(io::Error),
    /// JSON output was requested but the `json-logs` feature is off.
    JsonUnavailable,
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::AlreadyInitialised => write!(f, "logging already initialised"),
            LogError::Filter(msg) => write!(f, "invalid log filter: {msg}"),
            LogError::Io(err) => write!(f, "cannot open log file: {err}"),
            LogError::JsonUnavailable => write!(f, "JSON logging is not compiled in"),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(err: io::Error) -> Self {
        LogError::Io(err)
    }
}

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_new(config.effective_filter())
        .map_err(|e| LogError::Filter(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    let result = match (&config.file, config.json) {
        (_, true) => {
            #[cfg(feature = "json-logs")]
            {
                let builder = builder.json();
                match &config.file {
                    Some(path) => builder
                        .with_writer(Mutex::new(
                            OpenOptions::new().create(true).append(true).open(path)?,
                        ))
                        .try_init(),
                    None => builder.with_writer(io::stderr).try_init(),
                }
            }
            #[cfg(not(feature = "json-logs"))]
            {
                return Err(LogError::JsonUnavailable);
            }
        }
        (Some(path), false) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        (None, false) => builder.with_writer(io::stderr).try_init(),
    };

    result.map_err(|_| LogError::AlreadyInitialised)
}
