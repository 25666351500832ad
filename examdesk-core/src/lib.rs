//! Examdesk Core Library
//!
//! This crate provides the rich-content model used for exam problems,
//! explanations and answers, and the conversions around it. Content is stored
//! as portable blocks that do not depend on any editor library:
//!
//! - the [`encoder`] builds blocks from the editor's native document,
//! - the [`decoder`] turns blocks back into markup to start an editing session,
//! - the [`render`] module displays blocks read-only, without markup.

pub mod decoder;
pub mod editor;
pub mod encoder;
pub mod error;
pub mod form;
pub mod markup;
pub mod render;
pub mod storage;
pub mod types;

pub use decoder::{decode_blocks, MarkupDecoder};
pub use encoder::{encode_document, DocEncoder};
pub use error::{
    EditorError, ExamdeskError, FormError, ParseError, Result, StorageError, UploadError,
};
pub use markup::parse_markup;
pub use render::{render_blocks, BlockRenderer, RenderedDocument};
pub use types::{
    Align, Block, ImageBlock, ListBlock, ListItemBlock, ListingKind, NativeNode, TextBlock,
    TextSpan, TextTag,
};
