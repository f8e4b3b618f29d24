//! Error types for lexigraph-core.
//!
//! A single error enum is shared by every Lexigraph crate. Validation
//! outcomes of the concept-map builder (too few concepts, vocabulary out of
//! range) are *not* errors; they are reported as structured results by
//! `lexigraph-graph`. This enum covers genuine failures: I/O, malformed
//! input, configuration problems, and external tool invocations.

use std::path::{Path, PathBuf};

/// Result type alias for Lexigraph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Lexigraph.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error with the path that caused it.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic.
        message: String,
    },

    /// A referenced item does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of item ("node", "concept", ...).
        kind: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// Rendering failed (bad graph description, undecodable output).
    #[error("Render error: {0}")]
    Render(String),

    /// An external tool could not be run or exited unsuccessfully.
    #[error("External tool `{tool}` failed: {message}")]
    Tool {
        /// Binary that was invoked.
        tool: String,
        /// Captured stderr or spawn error.
        message: String,
    },
}

impl Error {
    /// Creates an I/O error tagged with a path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse(message.into())
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates a render error.
    pub fn render<S: Into<String>>(message: S) -> Self {
        Error::Render(message.into())
    }

    /// Creates an external tool error.
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("node", "n-42");
        assert_eq!(err.to_string(), "node not found: n-42");
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("canvas width must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: canvas width must be positive"
        );
    }

    #[test]
    fn test_tool_error_display() {
        let err = Error::tool("dot", "syntax error in line 3");
        assert!(err.to_string().contains("`dot`"));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_io_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io, "/tmp/corpus.json");
        assert!(err.to_string().contains("/tmp/corpus.json"));
    }

    #[test]
    fn test_json_error_from() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: Error = serde_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
