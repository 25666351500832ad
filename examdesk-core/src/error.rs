//! Error types for Examdesk Core

use thiserror::Error;

/// Result type alias using ExamdeskError
pub type Result<T> = std::result::Result<T, ExamdeskError>;

/// Top-level error type for all Examdesk operations
#[derive(Debug, Error)]
pub enum ExamdeskError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while reading stored content or editor documents
///
/// Individual malformed blocks are never reported here; they are skipped.
/// Only a document-level shape problem is an error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected a JSON array of blocks, found {0}")]
    NotAnArray(&'static str),
}

/// Errors that occur in the problem storage collaborator
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Errors that occur while uploading an image
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Empty file: {0}")]
    EmptyFile(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Errors raised by the editing session
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Command not applicable: {0}")]
    CommandRejected(String),

    #[error("Image insertion failed: {0}")]
    ImageInsert(#[from] UploadError),
}

/// Validation and save failures reported by the problem form
#[derive(Debug, Error)]
pub enum FormError {
    #[error("No exam selected")]
    NoExamSelected,

    #[error("Problem number is required")]
    MissingNumber,

    #[error("Select at least one correct choice")]
    MissingAnswer,

    #[error("Problem content is required")]
    EmptyContent,

    #[error("Save failed: {0}")]
    SaveFailed(#[source] StorageError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),
}
