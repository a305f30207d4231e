//! Custom error types for dataset description runs.
//!
//! This module provides the error hierarchy using `thiserror`. Errors carry
//! enough context (file, root folder, artifact path) for the caller to apply
//! the skip-or-surface policy of each kind.
//!
//! Errors are serializable so that the CLI can emit them as JSON.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for dataset description.
#[derive(Error, Debug)]
pub enum DescribeError {
    /// A source file could not be read as tabular data.
    #[error("Failed to parse '{}': {reason}", file.display())]
    Parse { file: PathBuf, reason: String },

    /// A configured root yielded no matching files.
    #[error("No .{extension} file found in {}", root.display())]
    EmptyCollection { root: PathBuf, extension: String },

    /// The typesetting backend failed after the CSV export was written.
    #[error("Failed to render report (CSV already written to {}): {reason}", csv_path.display())]
    Render { csv_path: PathBuf, reason: String },

    /// The typesetting backend could not compile a document.
    #[error("Typeset backend failed: {0}")]
    Typeset(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Downloading or extracting a dataset failed.
    #[error("Failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (only with the "fetch" feature).
    #[cfg(feature = "fetch")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DescribeError>,
    },
}

impl DescribeError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DescribeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "PARSE_ERROR",
            Self::EmptyCollection { .. } => "EMPTY_COLLECTION",
            Self::Render { .. } => "RENDER_ERROR",
            Self::Typeset(_) => "TYPESET_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Fetch { .. } => "FETCH_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "fetch")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error only affects a single file or root.
    ///
    /// Recoverable errors are logged and skipped; the run continues with the
    /// remaining inputs.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Parse { .. } | Self::EmptyCollection { .. } => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// Build a [`DescribeError::Parse`] for `file`.
    pub fn parse(file: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for DescribeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DescribeError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for description operations.
pub type Result<T> = std::result::Result<T, DescribeError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DescribeError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DescribeError::Io(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DescribeError::Json(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            DescribeError::parse("raw/iris.data", "bad row").error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            DescribeError::InvalidConfig("x".to_string()).error_code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(DescribeError::parse("a.data", "bad").is_recoverable());
        assert!(
            DescribeError::EmptyCollection {
                root: PathBuf::from("raw"),
                extension: "data".to_string(),
            }
            .is_recoverable()
        );
        assert!(
            !DescribeError::Render {
                csv_path: PathBuf::from("out.csv"),
                reason: "boom".to_string(),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_parse_error_names_file() {
        let error = DescribeError::parse("raw/classification/iris.data", "ragged row");
        let message = error.to_string();
        assert!(message.contains("iris.data"));
        assert!(message.contains("ragged row"));
    }

    #[test]
    fn test_error_serialization() {
        let error = DescribeError::InvalidConfig("no data folders".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INVALID_CONFIG"));
        assert!(json.contains("no data folders"));
    }

    #[test]
    fn test_with_context() {
        let error = DescribeError::parse("wine.data", "empty").with_context("During statistics");
        assert!(error.to_string().contains("During statistics"));
        assert_eq!(error.error_code(), "PARSE_ERROR");
        assert!(error.is_recoverable());
    }
}
