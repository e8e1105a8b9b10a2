//! Errors raised by the format adapters.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// FormatError represents a failure to read, write or parse a document.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed document: {message}")]
    Malformed { message: String },
}

impl FormatError {
    /// Creates a file access error for `path`.
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FormatError::File {
            path: path.into(),
            source,
        }
    }

    /// Creates a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        FormatError::Malformed {
            message: message.into(),
        }
    }
}

/// Result type for format operations.
pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_display() {
        let err = FormatError::file(
            "missing.json",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        let text = err.to_string();
        assert!(text.contains("missing.json"));
        assert!(text.contains("not found"));
    }

    #[test]
    fn test_malformed_display() {
        let err = FormatError::malformed("no root element");
        assert_eq!(err.to_string(), "malformed document: no root element");
    }
}
