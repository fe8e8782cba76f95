//! Error types for APT index handling.

use std::fmt;

/// Errors raised while reading or writing index files.
#[derive(Debug)]
pub enum IndexError {
    /// The control-format text could not be parsed
    Control(control_parse::Error),
    /// A paragraph could not be converted into a typed record
    Record(String),
    /// A depiction URL could not be built
    Url(url::ParseError),
    /// An I/O operation failed
    Io(std::io::Error),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Control(e) => write!(f, "Control file error: {}", e),
            IndexError::Record(e) => write!(f, "Record error: {}", e),
            IndexError::Url(e) => write!(f, "URL error: {}", e),
            IndexError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for IndexError {}

impl From<control_parse::Error> for IndexError {
    fn from(e: control_parse::Error) -> Self {
        IndexError::Control(e)
    }
}

impl From<url::ParseError> for IndexError {
    fn from(e: url::ParseError) -> Self {
        IndexError::Url(e)
    }
}

impl From<std::io::Error> for IndexError {
    fn from(e: std::io::Error) -> Self {
        IndexError::Io(e)
    }
}
