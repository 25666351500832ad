//! Read-only renderer: portable blocks to a display tree
//!
//! Rendering never goes through editor markup. Legacy flat lists
//! (`listing`-flagged text blocks) are grouped first so both list encodings
//! share one rendering path.

mod html;
mod lightbox;
mod view;

pub use lightbox::{Lightbox, LightboxOverlay, CLOSE_HINT};
pub use view::{DisplayNode, ImageView, ItemView, ListView, Run, TextView};

use crate::error::ParseError;
use crate::types::{blocks_from_value, Block, ImageBlock, ListBlock, ListingKind, TextBlock};

/// A rendered document, optionally with an open image preview
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedDocument {
    pub nodes: Vec<DisplayNode>,
    pub overlay: Option<LightboxOverlay>,
}

impl RenderedDocument {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach the overlay of an open preview
    pub fn with_lightbox(mut self, lightbox: &Lightbox) -> Self {
        self.overlay = lightbox.overlay();
        self
    }

    /// Every image in document order, including those inside lists
    pub fn images(&self) -> Vec<&ImageView> {
        let mut images = Vec::new();
        collect_images(&self.nodes, &mut images);
        images
    }
}

fn collect_images<'a>(nodes: &'a [DisplayNode], out: &mut Vec<&'a ImageView>) {
    for node in nodes {
        match node {
            DisplayNode::Image(image) => out.push(image),
            DisplayNode::List(list) => {
                for item in &list.items {
                    collect_images(&item.children, out);
                }
            }
            DisplayNode::Text(_) => {}
        }
    }
}

/// A top-level rendering unit after legacy grouping
#[derive(Debug, PartialEq)]
enum Group<'a> {
    /// Consecutive text blocks flagged with the same legacy list kind
    Legacy(ListingKind, Vec<&'a TextBlock>),
    Single(&'a Block),
}

/// Group runs of legacy list items; everything else stays a singleton
fn group_legacy_blocks(blocks: &[Block]) -> Vec<Group<'_>> {
    let mut groups = Vec::new();
    let mut current: Option<(ListingKind, Vec<&TextBlock>)> = None;

    for block in blocks {
        match (block, block.listing()) {
            (Block::Text(text), Some(kind)) => {
                if let Some((open, items)) = current.as_mut() {
                    if *open == kind {
                        items.push(text);
                        continue;
                    }
                }
                if let Some((open, items)) = current.take() {
                    groups.push(Group::Legacy(open, items));
                }
                current = Some((kind, vec![text]));
            }
            _ => {
                if let Some((open, items)) = current.take() {
                    groups.push(Group::Legacy(open, items));
                }
                groups.push(Group::Single(block));
            }
        }
    }

    if let Some((open, items)) = current {
        groups.push(Group::Legacy(open, items));
    }
    groups
}

/// Renderer from portable blocks to a display tree
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRenderer;

impl BlockRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, blocks: &[Block]) -> RenderedDocument {
        RenderedDocument {
            nodes: self.render_sequence(blocks),
            overlay: None,
        }
    }

    /// Render a stored JSON value, skipping blocks that cannot be read
    pub fn render_value(&self, value: serde_json::Value) -> Result<RenderedDocument, ParseError> {
        let blocks = blocks_from_value(value)?;
        Ok(self.render(&blocks))
    }

    fn render_sequence(&self, blocks: &[Block]) -> Vec<DisplayNode> {
        let mut nodes = Vec::new();
        for group in group_legacy_blocks(blocks) {
            match group {
                Group::Legacy(kind, items) => nodes.push(DisplayNode::List(ListView {
                    ordered: kind.is_ordered(),
                    items: items
                        .into_iter()
                        .map(|text| ItemView {
                            children: vec![DisplayNode::Text(text_view(text))],
                        })
                        .collect(),
                })),
                Group::Single(block) => self.render_block(block, &mut nodes),
            }
        }
        nodes
    }

    fn render_block(&self, block: &Block, out: &mut Vec<DisplayNode>) {
        match block {
            Block::Text(text) => out.push(DisplayNode::Text(text_view(text))),
            Block::Image(image) => out.push(DisplayNode::Image(image_view(image))),
            Block::List(list) => out.push(DisplayNode::List(self.list_view(list))),
            // An item outside a list shows its content in place
            Block::ListItem(item) => out.extend(self.render_sequence(&item.children)),
        }
    }

    fn list_view(&self, list: &ListBlock) -> ListView {
        ListView {
            ordered: list.ordered,
            items: list
                .children
                .iter()
                .map(|item| ItemView {
                    children: self.render_sequence(&item.children),
                })
                .collect(),
        }
    }
}

fn text_view(text: &TextBlock) -> TextView {
    TextView {
        tag: text.tag_or_default(),
        align: text.align,
        runs: Run::from_spans(&text.effective_spans()),
    }
}

fn image_view(image: &ImageBlock) -> ImageView {
    ImageView {
        src: image.src.clone(),
        alt: image.alt.clone().unwrap_or_default(),
        align: image.align,
    }
}

/// Render blocks with the default renderer
pub fn render_blocks(blocks: &[Block]) -> RenderedDocument {
    BlockRenderer::new().render(blocks)
}

/// Whitespace-normalized text of a document, for previews in list views
pub fn plain_text(blocks: &[Block]) -> String {
    let mut raw = String::new();
    collect_text(blocks, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`plain_text`] cut to at most `max_chars` characters, marked with an ellipsis
pub fn excerpt(blocks: &[Block], max_chars: usize) -> String {
    let text = plain_text(blocks);
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

fn collect_text(blocks: &[Block], out: &mut String) {
    for block in blocks {
        match block {
            Block::Text(text) => {
                out.push_str(&text.plain_text());
                out.push(' ');
            }
            Block::List(list) => {
                for item in &list.children {
                    collect_text(&item.children, out);
                }
            }
            Block::ListItem(item) => collect_text(&item.children, out),
            Block::Image(_) => {}
        }
    }
}
