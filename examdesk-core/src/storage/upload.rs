//! Content-addressed image uploads on the local filesystem

use crate::editor::{ImageFile, ImageUploader};
use crate::error::UploadError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use uuid::Uuid;

/// Stores images as `images/<sha256>.<ext>` and serves them under a base URL
///
/// Returned URLs carry a one-off `?sig=` query, the way signed storage URLs
/// do. Uploading the same bytes twice stores one file.
pub struct LocalUploader {
    root: PathBuf,
    base_url: String,
}

impl LocalUploader {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn file_name(file: &ImageFile) -> Result<String, UploadError> {
        let ext = file
            .extension()
            .ok_or_else(|| UploadError::UnsupportedType(file.content_type.clone()))?;
        let digest = hex::encode(Sha256::digest(&file.bytes));
        Ok(format!("{digest}.{ext}"))
    }
}

#[async_trait]
impl ImageUploader for LocalUploader {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError> {
        file.validate()?;
        let name = Self::file_name(file)?;
        let dir = self.root.join("images");
        let path = dir.join(&name);

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| UploadError::BackendError(e.to_string()))?;
        if !exists {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| UploadError::BackendError(e.to_string()))?;
            let temp_path = dir.join(format!("{name}.tmp"));
            tokio::fs::write(&temp_path, &file.bytes)
                .await
                .map_err(|e| UploadError::BackendError(e.to_string()))?;
            tokio::fs::rename(&temp_path, &path)
                .await
                .map_err(|e| UploadError::BackendError(e.to_string()))?;
            tracing::info!(name = %name, size = file.bytes.len(), "Stored uploaded image");
        }

        Ok(format!(
            "{}/images/{name}?sig={}",
            self.base_url,
            Uuid::new_v4().simple()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::canonicalize_src;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_upload_is_content_addressed() {
        let dir = TempDir::new().unwrap();
        let uploader = LocalUploader::new(dir.path(), "https://cdn.example.com/");
        let file = ImageFile::from_name("a.png", b"png bytes".to_vec());

        let first = uploader.upload(&file).await.unwrap();
        let second = uploader.upload(&file).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(canonicalize_src(&first), canonicalize_src(&second));
        assert!(canonicalize_src(&first).starts_with("https://cdn.example.com/images/"));
        assert!(canonicalize_src(&first).ends_with(".png"));
        assert!(first.contains("?sig="));
        assert_eq!(std::fs::read_dir(dir.path().join("images")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_non_images() {
        let dir = TempDir::new().unwrap();
        let uploader = LocalUploader::new(dir.path(), "https://cdn.example.com");
        let result = uploader
            .upload(&ImageFile::new("a.tiff", "image/tiff", vec![1]))
            .await;
        assert!(matches!(result, Err(UploadError::UnsupportedType(_))));
        let result = uploader.upload(&ImageFile::from_name("a.png", Vec::new())).await;
        assert!(matches!(result, Err(UploadError::EmptyFile(_))));
    }
}
