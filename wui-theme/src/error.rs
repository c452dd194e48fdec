//! # Error Types
//!
//! Every fallible operation in wui reports an [Error] carrying its [ErrorKind],
//! the name of the component that produced it and a human readable message.
//! Errors are returned, never thrown across control boundaries; controls that
//! hit one record it and expose it through their `error()` accessor.

use std::fmt;

use thiserror::Error;

/// The category of an [Error].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A file (theme, locale or configuration) does not exist.
    FileNotFound,
    /// A file could not be parsed.
    InvalidJson,
    /// A value is out of range or malformed.
    InvalidValue,
    /// Something that can only run once is already running.
    AlreadyStarted,
    /// A required platform handle (display, clipboard, window) is missing.
    NoHandle,
    /// The operating system reported a failure.
    SystemError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::FileNotFound => "file not found",
            ErrorKind::InvalidJson => "invalid json",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::AlreadyStarted => "already started",
            ErrorKind::NoHandle => "no handle",
            ErrorKind::SystemError => "system error",
        };
        f.write_str(name)
    }
}

/// An error raised by a wui component.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{component}: {kind}: {message}")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// The component that produced the error, e.g. `"clipboard"` or `"ticker"`.
    pub component: String,
    /// Details about the failure.
    pub message: String,
}

/// Result type alias for wui operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileNotFound, component, message)
    }

    /// Create a parse error.
    pub fn invalid_json(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidJson, component, message)
    }

    /// Create an invalid value error.
    pub fn invalid_value(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, component, message)
    }

    /// Create an already started error.
    pub fn already_started(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyStarted, component, message)
    }

    /// Create a missing handle error.
    pub fn no_handle(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoHandle, component, message)
    }

    /// Create a system error.
    pub fn system_error(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SystemError, component, message)
    }

    /// Map an I/O error raised while `component` was working.
    pub fn from_io(component: impl Into<String>, err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::InvalidData => ErrorKind::InvalidValue,
            _ => ErrorKind::SystemError,
        };
        Self::new(kind, component, err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::from_io("io", err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::invalid_json("config", err.to_string())
    }
}
