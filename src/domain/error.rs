//! Domain error types

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// How a file was being opened when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Truncate,
    Append,
    Create,
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpenMode::Read => "reading",
            OpenMode::Truncate => "writing",
            OpenMode::Append => "appending",
            OpenMode::Create => "creating",
        };
        f.write_str(s)
    }
}

/// Why a single config line was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatErrorKind {
    #[error("unknown line in the config")]
    UnknownDirective,

    #[error("failed to parse preamp gain '{0}'")]
    InvalidGain(String),
}

/// Errors that can occur while loading or writing the equalizer config
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be opened (after retries, for the write paths).
    #[error("Failed to open {} for {mode}: {source}", path.display())]
    Open {
        path: PathBuf,
        mode: OpenMode,
        #[source]
        source: io::Error,
    },

    /// A non-blank line did not match the config grammar.
    #[error("Line {line_number}: {kind}: {line}")]
    Format {
        line_number: usize,
        line: String,
        kind: FormatErrorKind,
    },

    /// Read, write or flush failed after the file was open.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid profile name: '{0}'")]
    InvalidName(String),
}

/// Result type alias for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;
