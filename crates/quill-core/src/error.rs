//! Error types for the Quill application.

use thiserror::Error;

/// A shared error type for the entire Quill application.
///
/// Every variant is recoverable at the turn level: the session loop reports
/// the condition to the user and continues with the next prompt.
#[derive(Error, Debug)]
pub enum QuillError {
    /// A file could not be found on read.
    #[error("File not found: '{path}'")]
    NotFound { path: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Path canonicalization failure.
    #[error("Invalid path: '{path}'")]
    InvalidPath { path: String },

    /// The diff target snippet is absent from the file.
    #[error("Original snippet not found in '{path}'")]
    SnippetNotFound { path: String },

    /// The streamed reply could not be parsed or failed schema validation.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The inference endpoint was unreachable or returned a non-success status.
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

}

impl QuillError {
    /// Creates a NotFound error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an InvalidPath error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a Transport error
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvalidPath error
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<std::io::Error> for QuillError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// A type alias for `Result<T, QuillError>`.
pub type Result<T> = std::result::Result<T, QuillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_convert_with_kind() {
        let err: QuillError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, QuillError::Io { .. }));
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_transport_display_includes_status_when_present() {
        let with_status = QuillError::transport(Some(500), "server fell over");
        assert!(with_status.to_string().contains("HTTP 500"));

        let without_status = QuillError::transport(None, "connection refused");
        assert!(!without_status.to_string().contains("HTTP"));
    }
}
