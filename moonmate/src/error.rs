//! Error types for MoonMate
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the UI layer as plain strings.

use crate::services::text_improvement::ApiError;
use crate::storage::ExportFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Read, write or decode failure on the documents or settings files
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Export format not supported: {0}")]
    UnsupportedFormat(ExportFormat),

    #[error("Text improvement failed: {0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serializes_as_message() {
        let error = AppError::DocumentNotFound("abc".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, "\"Document not found: abc\"");

        let error = AppError::UnsupportedFormat(ExportFormat::Pdf);
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!("Export format not supported: pdf")
        );
    }
}
