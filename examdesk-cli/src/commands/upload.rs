//! Upload command implementation

use anyhow::{Context, Result};
use examdesk_core::editor::{ImageFile, ImageUploader};
use examdesk_core::storage::LocalUploader;
use std::path::Path;

/// Store an image the way the editor does and print the URL it gets
pub async fn upload(input: &str, data_path: &str, base_url: &str) -> Result<()> {
    let path = Path::new(input);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to open input file: {}", input))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Could not determine image file name")?;

    let uploader = LocalUploader::new(data_path, base_url);
    let url = uploader
        .upload(&ImageFile::from_name(name, bytes))
        .await
        .with_context(|| format!("Failed to upload {}", input))?;

    println!("{}", url);
    Ok(())
}
