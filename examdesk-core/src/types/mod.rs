//! Core types: portable blocks, the editor's native document and stored records

mod block;
mod native;
mod record;
mod stored;

pub use block::{
    blocks_from_str, blocks_from_value, canonicalize_src, normalize_spans, Align, Block,
    ImageBlock, ListBlock, ListItemBlock, ListingKind, TextBlock, TextSpan, TextTag,
    DEFAULT_HIGHLIGHT,
};
pub use native::{ColorAttrs, ImageAttrs, Mark, NativeNode, NodeAttrs};
pub use record::{Answer, Choice, Problem, ProblemSaveRequest, DEFAULT_CHOICE_COUNT};
pub use stored::{deserialize_content, StoredContent};
