//! Error handling for repoclip
//!
//! Per-file problems (`FileError`) are collected and reported without stopping
//! the run. Only a sink failure or a run that produced nothing is terminal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A problem with a single input file. Never aborts the batch.
#[derive(Error, Debug)]
pub enum FileError {
    /// Extension is neither known text nor eligible for pass-through
    #[error("{}: unsupported file type: {extension}", path.display())]
    UnsupportedType { path: PathBuf, extension: String },

    /// File exists but could not be read
    #[error("{}: read failed: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Path of the offending file
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::UnsupportedType { path, .. } | Self::ReadFailure { path, .. } => path,
        }
    }

    /// Reason without the path prefix, for tabular reports
    pub fn reason(&self) -> String {
        match self {
            Self::UnsupportedType { extension, .. } => {
                format!("unsupported file type: {}", extension)
            }
            Self::ReadFailure { source, .. } => format!("read failed: {}", source),
        }
    }
}

/// Error type for sink operations
#[derive(Error, Debug)]
pub enum SinkError {
    /// The command is not available on the system
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Global error type for repoclip operations
#[derive(Error, Debug)]
pub enum RepoclipError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rule file parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The destination refused the output
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// No input produced any output
    #[error("Nothing to copy: no file produced any output")]
    EmptyResult,

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),
}

/// Specialized Result type for repoclip operations
pub type Result<T> = std::result::Result<T, RepoclipError>;

/// Creates a RepoclipError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::RepoclipError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Map an error to the process exit code
pub fn exit_code(error: &RepoclipError) -> i32 {
    match error {
        RepoclipError::Sink(_) => 1,
        RepoclipError::EmptyResult => 2,
        RepoclipError::Config(_) | RepoclipError::Json(_) | RepoclipError::PathNotFound(_) => 3,
        RepoclipError::Io(_) => 1,
    }
}
