//! Toolbar and keyboard commands understood by an editing engine

use crate::types::{Align, Mark};

/// Boolean formatting marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strike,
}

impl MarkKind {
    pub fn to_mark(self) -> Mark {
        match self {
            MarkKind::Bold => Mark::Bold,
            MarkKind::Italic => Mark::Italic,
            MarkKind::Underline => Mark::Underline,
            MarkKind::Strike => Mark::Strike,
        }
    }
}

/// Block-level node type for [`EditorCommand::SetBlockType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Heading(u8),
    Blockquote,
}

/// An editing action applied at the cursor
///
/// The cursor addresses one top-level block. Formatting commands apply to
/// all text of that block and to text typed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Move the cursor to a top-level block
    SetCursor(usize),
    InsertText(String),
    /// Forced line break inside the current block
    HardBreak,
    /// New empty paragraph after the current block
    SplitBlock,
    ToggleMark(MarkKind),
    /// Text color; `None` removes it
    SetColor(Option<String>),
    /// Highlight color; `None` removes the highlight
    SetHighlight(Option<String>),
    /// Change the block type, toggling back to a paragraph if already set
    SetBlockType(BlockType),
    ToggleList { ordered: bool },
    SetAlign(Option<Align>),
}
