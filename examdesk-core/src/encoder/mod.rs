//! Encoder: the editor's native document to portable blocks
//!
//! The block tree is rebuilt from scratch on every edit; nothing is
//! mutated incrementally.

mod document;
mod inline;

pub use document::DocEncoder;

use crate::types::{Block, NativeNode};

/// Encode a document with the default encoder settings
pub fn encode_document(doc: &NativeNode) -> Vec<Block> {
    DocEncoder::new().encode(doc)
}
