//! Decoder: portable blocks to editor markup
//!
//! Only used to initialize an editing session. Display goes through
//! [`crate::render`] instead.

mod html;
mod inline;

pub use html::{decode_blocks, MarkupDecoder, EMPTY_DOCUMENT};
