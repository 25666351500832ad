//! Editing engine abstraction and an in-memory implementation

use super::command::{BlockType, EditorCommand};
use crate::error::EditorError;
use crate::markup::parse_markup;
use crate::types::{Align, ColorAttrs, ImageAttrs, Mark, NativeNode, NodeAttrs};

/// The rich-text engine behind an editing session
pub trait EditorEngine: Send + Sync {
    /// Replace the whole document with parsed markup
    fn load_markup(&mut self, markup: &str) -> Result<(), EditorError>;

    /// Snapshot of the current native document
    fn document(&self) -> NativeNode;

    /// Apply an editing command at the cursor
    fn apply(&mut self, command: &EditorCommand) -> Result<(), EditorError>;

    /// Insert an image node at the cursor
    fn insert_image(&mut self, attrs: ImageAttrs) -> Result<(), EditorError>;
}

/// In-memory engine over a native document
///
/// The cursor sits on one top-level block. A document is never empty: it
/// holds at least one (possibly blank) paragraph.
#[derive(Debug, Clone)]
pub struct DocumentEngine {
    blocks: Vec<NativeNode>,
    cursor: usize,
    /// Marks applied to text typed next
    stored_marks: Vec<Mark>,
}

impl DocumentEngine {
    /// An engine holding one blank paragraph
    pub fn new() -> Self {
        Self {
            blocks: vec![NativeNode::paragraph(Vec::new())],
            cursor: 0,
            stored_marks: Vec::new(),
        }
    }

    /// An engine over an existing document, cursor on its last block
    pub fn from_document(doc: NativeNode) -> Self {
        let mut engine = Self::new();
        engine.replace_blocks(match doc {
            NativeNode::Doc { content } => content,
            other => vec![other],
        });
        engine
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn replace_blocks(&mut self, blocks: Vec<NativeNode>) {
        self.blocks = blocks;
        if self.blocks.is_empty() {
            self.blocks.push(NativeNode::paragraph(Vec::new()));
        }
        self.cursor = self.blocks.len() - 1;
        self.stored_marks.clear();
    }

    fn current_mut(&mut self) -> &mut NativeNode {
        let index = self.cursor.min(self.blocks.len() - 1);
        &mut self.blocks[index]
    }

    fn current_textblock(&mut self) -> Result<&mut Vec<NativeNode>, EditorError> {
        last_textblock(self.current_mut())
            .ok_or_else(|| rejected("the current block holds no text"))
    }

    /// Set or clear one kind of mark on the current block and the stored marks
    fn set_mark(&mut self, probe: &Mark, value: Option<&Mark>) {
        visit_marks(self.current_mut(), &mut |marks: &mut Vec<Mark>| {
            replace_mark(marks, probe, value)
        });
        replace_mark(&mut self.stored_marks, probe, value);
    }

    fn toggle_mark(&mut self, mark: &Mark) {
        let mut any = false;
        let mut all = true;
        visit_marks(self.current_mut(), &mut |marks: &mut Vec<Mark>| {
            any = true;
            all &= marks.contains(mark);
        });
        let enable = if any {
            !all
        } else {
            !self.stored_marks.contains(mark)
        };
        self.set_mark(mark, enable.then_some(mark));
    }

    fn set_block_type(&mut self, target: BlockType) -> Result<(), EditorError> {
        let index = self.cursor;
        let node = std::mem::replace(&mut self.blocks[index], NativeNode::Unknown);
        match retype(node, target) {
            Ok(replacement) => {
                self.splice_current(replacement);
                Ok(())
            }
            Err(node) => {
                let kind = node.kind();
                self.blocks[index] = node;
                Err(rejected(format!("cannot change the type of a {kind}")))
            }
        }
    }

    fn toggle_list(&mut self, ordered: bool) -> Result<(), EditorError> {
        let index = self.cursor;
        let node = std::mem::replace(&mut self.blocks[index], NativeNode::Unknown);
        let replacement = match node {
            NativeNode::Paragraph { attrs, content } | NativeNode::Heading { attrs, content } => {
                let item = NativeNode::list_item(vec![NativeNode::Paragraph {
                    attrs: NodeAttrs {
                        text_align: attrs.text_align,
                        ..NodeAttrs::default()
                    },
                    content,
                }]);
                vec![make_list(ordered, vec![item])]
            }
            NativeNode::BulletList { content } if !ordered => unwrap_items(content),
            NativeNode::OrderedList { content, .. } if ordered => unwrap_items(content),
            NativeNode::BulletList { content } | NativeNode::OrderedList { content, .. } => {
                vec![make_list(ordered, content)]
            }
            other => {
                let kind = other.kind();
                self.blocks[index] = other;
                return Err(rejected(format!("cannot make a list from a {kind}")));
            }
        };
        self.splice_current(replacement);
        Ok(())
    }

    /// Replace the current block with zero or more blocks
    fn splice_current(&mut self, replacement: Vec<NativeNode>) {
        let index = self.cursor;
        self.blocks.splice(index..=index, replacement);
        if self.blocks.is_empty() {
            self.blocks.push(NativeNode::paragraph(Vec::new()));
        }
        self.cursor = index.min(self.blocks.len() - 1);
    }
}

impl Default for DocumentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorEngine for DocumentEngine {
    fn load_markup(&mut self, markup: &str) -> Result<(), EditorError> {
        let blocks = match parse_markup(markup) {
            NativeNode::Doc { content } => content,
            other => vec![other],
        };
        tracing::debug!(blocks = blocks.len(), "Loaded markup into document engine");
        self.replace_blocks(blocks);
        Ok(())
    }

    fn document(&self) -> NativeNode {
        NativeNode::doc(self.blocks.clone())
    }

    fn apply(&mut self, command: &EditorCommand) -> Result<(), EditorError> {
        match command {
            EditorCommand::SetCursor(index) => {
                if *index >= self.blocks.len() {
                    return Err(rejected(format!(
                        "cursor {index} is outside a document of {} blocks",
                        self.blocks.len()
                    )));
                }
                self.cursor = *index;
            }
            EditorCommand::InsertText(text) => {
                if !text.is_empty() {
                    let marks = self.stored_marks.clone();
                    self.current_textblock()?
                        .push(NativeNode::marked_text(text.as_str(), marks));
                }
            }
            EditorCommand::HardBreak => self.current_textblock()?.push(NativeNode::hard_break()),
            EditorCommand::SplitBlock => {
                self.cursor += 1;
                self.blocks
                    .insert(self.cursor, NativeNode::paragraph(Vec::new()));
            }
            EditorCommand::ToggleMark(kind) => self.toggle_mark(&kind.to_mark()),
            EditorCommand::SetColor(color) => {
                let value = color.as_deref().map(Mark::color);
                self.set_mark(&Mark::color(""), value.as_ref());
            }
            EditorCommand::SetHighlight(color) => {
                let value = color.as_deref().map(Mark::highlight);
                let probe = Mark::Highlight {
                    attrs: ColorAttrs::default(),
                };
                self.set_mark(&probe, value.as_ref());
            }
            EditorCommand::SetBlockType(target) => self.set_block_type(*target)?,
            EditorCommand::ToggleList { ordered } => self.toggle_list(*ordered)?,
            EditorCommand::SetAlign(align) => set_align(self.current_mut(), *align),
        }
        Ok(())
    }

    fn insert_image(&mut self, attrs: ImageAttrs) -> Result<(), EditorError> {
        if attrs.src.as_deref().map_or(true, str::is_empty) {
            return Err(rejected("image has no source"));
        }
        let image = NativeNode::image(attrs);
        let current = self.current_mut();
        let blank = matches!(&*current, NativeNode::Paragraph { content, .. } if content.is_empty());
        if blank {
            *current = image;
        } else {
            self.cursor += 1;
            self.blocks.insert(self.cursor, image);
        }
        Ok(())
    }
}

fn rejected(reason: impl Into<String>) -> EditorError {
    EditorError::CommandRejected(reason.into())
}

/// Inline content of the last paragraph or heading inside `node`
fn last_textblock(node: &mut NativeNode) -> Option<&mut Vec<NativeNode>> {
    match node {
        NativeNode::Paragraph { content, .. } | NativeNode::Heading { content, .. } => {
            Some(content)
        }
        other => other
            .content_mut()?
            .iter_mut()
            .rev()
            .find_map(last_textblock),
    }
}

/// Call `f` with the marks of every text leaf under `node`
fn visit_marks(node: &mut NativeNode, f: &mut dyn FnMut(&mut Vec<Mark>)) {
    match node {
        NativeNode::Text { marks, .. } => f(marks),
        other => {
            if let Some(content) = other.content_mut() {
                for child in content {
                    visit_marks(child, f);
                }
            }
        }
    }
}

/// Drop marks of the probe's kind, then add `value` if given
fn replace_mark(marks: &mut Vec<Mark>, probe: &Mark, value: Option<&Mark>) {
    marks.retain(|mark| !mark.same_kind(probe));
    if let Some(value) = value {
        marks.push(value.clone());
    }
}

fn set_align(node: &mut NativeNode, align: Option<Align>) {
    let value = align.map(|a| a.as_str().to_string());
    match node {
        NativeNode::Paragraph { attrs, .. } | NativeNode::Heading { attrs, .. } => {
            attrs.text_align = value
        }
        NativeNode::Image { attrs } => attrs.text_align = value,
        other => {
            if let Some(content) = other.content_mut() {
                for child in content {
                    set_align(child, align);
                }
            }
        }
    }
}

fn make_list(ordered: bool, items: Vec<NativeNode>) -> NativeNode {
    if ordered {
        NativeNode::ordered_list(items)
    } else {
        NativeNode::bullet_list(items)
    }
}

fn unwrap_items(items: Vec<NativeNode>) -> Vec<NativeNode> {
    items
        .into_iter()
        .flat_map(|item| match item {
            NativeNode::ListItem { content } => content,
            other => vec![other],
        })
        .collect()
}

fn textblock(target: BlockType, align: Option<String>, content: Vec<NativeNode>) -> NativeNode {
    let attrs = NodeAttrs {
        text_align: align,
        ..NodeAttrs::default()
    };
    match target {
        BlockType::Heading(level) => NativeNode::Heading {
            attrs: NodeAttrs {
                level: Some(level),
                ..attrs
            },
            content,
        },
        BlockType::Paragraph | BlockType::Blockquote => NativeNode::Paragraph { attrs, content },
    }
}

/// Convert a top-level node to another block type; `Err` hands the node back
fn retype(node: NativeNode, target: BlockType) -> Result<Vec<NativeNode>, NativeNode> {
    match node {
        NativeNode::Heading { attrs, content }
            if matches!(target, BlockType::Heading(level) if attrs.level == Some(level)) =>
        {
            Ok(vec![textblock(BlockType::Paragraph, attrs.text_align, content)])
        }
        NativeNode::Paragraph { attrs, content } | NativeNode::Heading { attrs, content } => {
            let block = textblock(target, attrs.text_align, content);
            Ok(vec![match target {
                BlockType::Blockquote => NativeNode::blockquote(vec![block]),
                _ => block,
            }])
        }
        NativeNode::Blockquote { content } => Ok(match target {
            BlockType::Heading(_) => content
                .into_iter()
                .map(|child| match child {
                    NativeNode::Paragraph { attrs, content }
                    | NativeNode::Heading { attrs, content } => {
                        textblock(target, attrs.text_align, content)
                    }
                    other => other,
                })
                .collect(),
            BlockType::Paragraph | BlockType::Blockquote => content,
        }),
        other => Err(other),
    }
}
