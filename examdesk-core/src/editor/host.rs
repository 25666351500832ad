//! One live editing session

use super::command::EditorCommand;
use super::engine::EditorEngine;
use super::upload::{ImageFile, ImageUploader};
use crate::decoder::MarkupDecoder;
use crate::encoder::DocEncoder;
use crate::error::EditorError;
use crate::types::{Block, ImageAttrs};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Owns an editing engine and keeps the encoded blocks current
///
/// The document is encoded when the session opens and again after every
/// change, so [`EditorHost::pending`] is valid even if the user never edits.
/// Image uploads from one session run one at a time, in call order.
pub struct EditorHost<E: EditorEngine> {
    id: Uuid,
    encoder: DocEncoder,
    engine: Mutex<E>,
    pending: RwLock<Vec<Block>>,
    upload_gate: Mutex<()>,
    uploader: Arc<dyn ImageUploader>,
}

impl<E: EditorEngine> EditorHost<E> {
    /// Initialize a session from markup and capture its blocks
    pub fn open(
        mut engine: E,
        markup: &str,
        uploader: Arc<dyn ImageUploader>,
    ) -> Result<Self, EditorError> {
        engine.load_markup(markup)?;
        let encoder = DocEncoder::new();
        let pending = encoder.encode(&engine.document());
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, blocks = pending.len(), "Opened editing session");
        Ok(Self {
            id,
            encoder,
            engine: Mutex::new(engine),
            pending: RwLock::new(pending),
            upload_gate: Mutex::new(()),
            uploader,
        })
    }

    /// Initialize a session from stored blocks
    pub fn open_blocks(
        engine: E,
        blocks: &[Block],
        uploader: Arc<dyn ImageUploader>,
    ) -> Result<Self, EditorError> {
        Self::open(engine, &MarkupDecoder::new().decode(blocks), uploader)
    }

    /// Use a differently configured encoder; the pending blocks are re-captured
    pub fn with_encoder(mut self, encoder: DocEncoder) -> Self {
        let blocks = encoder.encode(&self.engine.get_mut().document());
        *self.pending.get_mut() = blocks;
        self.encoder = encoder;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The latest encoded blocks, ready to save
    pub async fn pending(&self) -> Vec<Block> {
        self.pending.read().await.clone()
    }

    /// Apply a command and re-encode
    ///
    /// A rejected command leaves both the document and the pending blocks as
    /// they were.
    pub async fn apply(&self, command: EditorCommand) -> Result<(), EditorError> {
        let mut engine = self.engine.lock().await;
        if let Err(e) = engine.apply(&command) {
            tracing::debug!(session = %self.id, error = %e, "Editor command rejected");
            return Err(e);
        }
        self.capture(&*engine).await;
        Ok(())
    }

    /// Run an arbitrary change against the engine, then re-encode
    pub async fn edit<F>(&self, change: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut E) -> Result<(), EditorError>,
    {
        let mut engine = self.engine.lock().await;
        change(&mut engine)?;
        self.capture(&*engine).await;
        Ok(())
    }

    /// Re-encode after the engine reported a change
    pub async fn notify_changed(&self) {
        let engine = self.engine.lock().await;
        self.capture(&*engine).await;
    }

    /// Upload an image and insert it at the cursor
    ///
    /// Returns the URL the uploader produced. On failure the document is
    /// not touched.
    pub async fn insert_image(&self, file: ImageFile) -> Result<String, EditorError> {
        let _gate = self.upload_gate.lock().await;
        file.validate()?;

        tracing::info!(session = %self.id, name = %file.name, size = file.bytes.len(), "Uploading image");
        let url = match self.uploader.upload(&file).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "Image upload failed");
                return Err(e.into());
            }
        };

        let mut engine = self.engine.lock().await;
        engine.insert_image(ImageAttrs::new(url.as_str()))?;
        self.capture(&*engine).await;
        Ok(url)
    }

    async fn capture(&self, engine: &E) {
        let blocks = self.encoder.encode(&engine.document());
        tracing::trace!(session = %self.id, blocks = blocks.len(), "Captured document");
        *self.pending.write().await = blocks;
    }
}
