//! Image upload collaborator

use crate::error::UploadError;
use async_trait::async_trait;

/// An image picked, pasted or dropped into the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Build from a file name, guessing the content type from its extension
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).unwrap_or("application/octet-stream");
        Self::new(name, content_type, bytes)
    }

    /// Reject empty files and anything that is not an image
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.bytes.is_empty() {
            return Err(UploadError::EmptyFile(self.name.clone()));
        }
        if !self.content_type.starts_with("image/") {
            return Err(UploadError::UnsupportedType(self.content_type.clone()));
        }
        Ok(())
    }

    /// File extension for the content type, when it is a known image type
    pub fn extension(&self) -> Option<&'static str> {
        match self.content_type.as_str() {
            "image/png" => Some("png"),
            "image/jpeg" => Some("jpg"),
            "image/gif" => Some("gif"),
            "image/webp" => Some("webp"),
            "image/svg+xml" => Some("svg"),
            "image/bmp" => Some("bmp"),
            _ => None,
        }
    }
}

fn content_type_for(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Stores an image and returns the URL it is served from
///
/// The URL may carry a transient `?...` signature; it is stripped before
/// the image reaches stored content.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError>;
}
