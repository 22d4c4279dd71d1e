//! Error type shared by the converter
//!
//! Conversion itself almost never fails: an unknown fence language or a
//! missing palette degrades to a fallback instead of surfacing here. What is
//! left are file system problems, a broken config file and the rare tree
//! rebuild failure.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// `Result` with the converter's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a conversion or a config operation.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────────
    /// Terminal or stream I/O outside a named file
    Io(io::Error),

    /// A Markdown or CSS source could not be read
    FileRead { path: PathBuf, source: io::Error },

    /// The HTML page (or its directory) could not be written
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Config file
    // ─────────────────────────────────────────────────────────────────────────
    /// No platform config directory (usually `HOME` is unset)
    NoConfigDir,

    /// The config file exists but cannot be read
    ConfigRead { path: PathBuf, source: io::Error },

    /// The config file is not settings JSON
    ConfigInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Serializing or storing the settings failed
    ConfigWrite {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────
    /// syntect failed on a lexer it had already resolved
    Highlight { language: String, message: String },

    /// Neither the requested palette nor the mode default is bundled
    PaletteMissing(String),

    /// The HTML tree could not be rebuilt or serialized
    Render(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Could not read file '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Could not write '{}': {}", path.display(), source)
            }
            Error::NoConfigDir => f.write_str("No configuration directory on this platform"),
            Error::ConfigRead { path, source } => {
                write!(f, "Could not read config '{}': {}", path.display(), source)
            }
            Error::ConfigInvalid { path, source } => {
                write!(f, "Config '{}' is not valid: {}", path.display(), source)
            }
            Error::ConfigWrite { path, source } => {
                write!(f, "Could not save config '{}': {}", path.display(), source)
            }
            Error::Highlight { language, message } => {
                write!(f, "Failed to highlight '{}' code: {}", language, message)
            }
            Error::PaletteMissing(name) => {
                write!(f, "Highlighting palette '{}' is not available", name)
            }
            Error::Render(msg) => write!(f, "Failed to render HTML: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileRead { source, .. }
            | Error::FileWrite { source, .. }
            | Error::ConfigRead { source, .. } => Some(source),
            Error::ConfigInvalid { source, .. } => Some(source),
            Error::ConfigWrite { source, .. } => Some(source.as_ref()),
            Error::NoConfigDir
            | Error::Highlight { .. }
            | Error::PaletteMissing(_)
            | Error::Render(_) => None,
        }
    }
}

/// Degrade instead of failing.
pub trait ResultExt<T> {
    /// Log the error at `warn` under `context` and return `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{}: {}. Falling back.", context, err);
            default
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
