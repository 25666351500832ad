//! Document encoder implementation

use super::inline::SpanBuilder;
use crate::error::ParseError;
use crate::types::{
    Align, Block, ImageAttrs, ImageBlock, ListBlock, ListItemBlock, NativeNode, TextBlock, TextTag,
    DEFAULT_HIGHLIGHT,
};

/// Encoder from the editor's native document to portable blocks
///
/// Walks the tree depth-first and preserves document order. Empty
/// paragraphs are kept as blank text blocks wherever they appear.
#[derive(Debug, Clone)]
pub struct DocEncoder {
    /// Color recorded for highlight marks that carry none
    default_highlight: String,
}

impl DocEncoder {
    pub fn new() -> Self {
        Self {
            default_highlight: DEFAULT_HIGHLIGHT.to_string(),
        }
    }

    /// Set the color used for highlights without an explicit color
    pub fn with_default_highlight(mut self, color: impl Into<String>) -> Self {
        self.default_highlight = color.into();
        self
    }

    /// Encode a document (or a single node) to blocks
    pub fn encode(&self, doc: &NativeNode) -> Vec<Block> {
        let mut blocks = Vec::new();
        match doc {
            NativeNode::Doc { content } => {
                for node in content {
                    self.encode_node(node, &mut blocks);
                }
            }
            other => self.encode_node(other, &mut blocks),
        }
        blocks
    }

    /// Encode the editor's JSON document; `null` encodes to no blocks
    pub fn encode_json(&self, value: serde_json::Value) -> Result<Vec<Block>, ParseError> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        let doc: NativeNode = serde_json::from_value(value)?;
        Ok(self.encode(&doc))
    }

    /// Encode one block-level node, appending to `out`
    fn encode_node(&self, node: &NativeNode, out: &mut Vec<Block>) {
        match node {
            NativeNode::Doc { content } => {
                for child in content {
                    self.encode_node(child, out);
                }
            }
            NativeNode::Paragraph { attrs, content } => {
                self.encode_textblock(TextTag::P, attrs.align(), content, out)
            }
            NativeNode::Heading { attrs, content } => {
                let tag = TextTag::heading(attrs.level.unwrap_or(1));
                self.encode_textblock(tag, attrs.align(), content, out)
            }
            NativeNode::Image { attrs } => {
                if let Some(image) = self.encode_image(attrs, None) {
                    out.push(image);
                }
            }
            NativeNode::BulletList { content } => out.push(self.encode_list(false, content)),
            NativeNode::OrderedList { content, .. } => out.push(self.encode_list(true, content)),
            NativeNode::ListItem { content } => {
                out.push(Block::ListItem(self.encode_list_item(content)))
            }
            NativeNode::Blockquote { content } => out.push(self.encode_blockquote(content)),
            NativeNode::Text { .. } | NativeNode::HardBreak => {
                self.encode_textblock(TextTag::P, None, std::slice::from_ref(node), out)
            }
            NativeNode::Unknown => {
                tracing::debug!("Skipping unsupported node");
            }
        }
    }

    /// Encode a paragraph or heading
    ///
    /// Inline images split the text: runs before the image, the image, then
    /// runs after it. A paragraph holding only images yields only images.
    fn encode_textblock(
        &self,
        tag: TextTag,
        align: Option<Align>,
        content: &[NativeNode],
        out: &mut Vec<Block>,
    ) {
        let mut spans = SpanBuilder::new();
        let mut emitted_image = false;

        for inline in content {
            match inline {
                NativeNode::Text { text, marks } => {
                    spans.push_text(text, marks, &self.default_highlight)
                }
                NativeNode::HardBreak => spans.push_break(),
                NativeNode::Image { attrs } => {
                    if !spans.is_empty() {
                        out.push(Block::Text(
                            TextBlock::new(tag, spans.take()).with_align(align),
                        ));
                    }
                    if let Some(image) = self.encode_image(attrs, align) {
                        out.push(image);
                        emitted_image = true;
                    }
                }
                other => {
                    tracing::debug!(kind = other.kind(), "Skipping block node inside text block");
                }
            }
        }

        if !spans.is_empty() || !emitted_image {
            out.push(Block::Text(
                TextBlock::new(tag, spans.take()).with_align(align),
            ));
        }
    }

    /// Encode an image, inheriting `fallback_align` when it has none
    fn encode_image(&self, attrs: &ImageAttrs, fallback_align: Option<Align>) -> Option<Block> {
        let Some(src) = attrs.src.as_deref().filter(|s| !s.is_empty()) else {
            tracing::debug!("Skipping image without src");
            return None;
        };
        let image = ImageBlock::new(src)
            .with_alt(attrs.alt.clone().unwrap_or_default())
            .with_align(attrs.align().or(fallback_align));
        Some(Block::Image(image))
    }

    fn encode_list(&self, ordered: bool, content: &[NativeNode]) -> Block {
        let items = content
            .iter()
            .filter_map(|child| match child {
                NativeNode::ListItem { content } => Some(self.encode_list_item(content)),
                other => {
                    tracing::debug!(kind = other.kind(), "Skipping non-item child of list");
                    None
                }
            })
            .collect();
        Block::List(ListBlock::new(ordered, items))
    }

    fn encode_list_item(&self, content: &[NativeNode]) -> ListItemBlock {
        let mut children = Vec::new();
        for child in content {
            self.encode_node(child, &mut children);
        }
        ListItemBlock::new(children)
    }

    /// Flatten a blockquote's paragraphs into one quote block
    ///
    /// Paragraphs are joined with a forced break. Images and lists inside a
    /// quote are not supported and are dropped.
    fn encode_blockquote(&self, content: &[NativeNode]) -> Block {
        let mut spans = SpanBuilder::new();
        let mut align = None;
        let mut paragraphs = 0;

        for child in content {
            match child {
                NativeNode::Paragraph { attrs, content } | NativeNode::Heading { attrs, content } => {
                    if paragraphs > 0 {
                        spans.push_break();
                    }
                    paragraphs += 1;
                    align = align.or(attrs.align());
                    for inline in content {
                        match inline {
                            NativeNode::Text { text, marks } => {
                                spans.push_text(text, marks, &self.default_highlight)
                            }
                            NativeNode::HardBreak => spans.push_break(),
                            other => {
                                tracing::debug!(kind = other.kind(), "Dropping node inside blockquote");
                            }
                        }
                    }
                }
                other => {
                    tracing::debug!(kind = other.kind(), "Dropping node inside blockquote");
                }
            }
        }

        Block::Text(TextBlock::new(TextTag::Blockquote, spans.take()).with_align(align))
    }
}

impl Default for DocEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mark, TextSpan};
    use serde_json::json;

    fn text_block(block: &Block) -> &TextBlock {
        match block {
            Block::Text(text) => text,
            other => panic!("Expected text block, got {other:?}"),
        }
    }

    #[test]
    fn test_paragraph_and_heading() {
        let doc = NativeNode::doc(vec![
            NativeNode::heading(2, vec![NativeNode::text("Title")]).with_align(Some(Align::Center)),
            NativeNode::paragraph(vec![
                NativeNode::text("plain "),
                NativeNode::marked_text("bold", vec![Mark::Bold]),
                NativeNode::hard_break(),
                NativeNode::text("next line"),
            ]),
        ]);

        let blocks = DocEncoder::new().encode(&doc);
        assert_eq!(blocks.len(), 2);

        let heading = text_block(&blocks[0]);
        assert_eq!(heading.tag, Some(TextTag::H2));
        assert_eq!(heading.align, Some(Align::Center));

        let paragraph = text_block(&blocks[1]);
        assert_eq!(paragraph.tag, Some(TextTag::P));
        assert_eq!(
            paragraph.spans,
            vec![
                TextSpan::new("plain "),
                TextSpan::new("bold").bold(),
                TextSpan::line_break(),
                TextSpan::new("next line"),
            ]
        );
    }

    #[test]
    fn test_empty_paragraphs_are_preserved() {
        let doc = NativeNode::doc(vec![
            NativeNode::paragraph(vec![NativeNode::text("a")]),
            NativeNode::paragraph(Vec::new()),
            NativeNode::paragraph(vec![NativeNode::text("b")]),
            NativeNode::paragraph(Vec::new()),
        ]);
        let blocks = DocEncoder::new().encode(&doc);
        assert_eq!(blocks.len(), 4);
        assert!(text_block(&blocks[1]).is_blank());
        assert!(text_block(&blocks[3]).is_blank());
    }

    #[test]
    fn test_inline_image_splits_paragraph() {
        let doc = NativeNode::doc(vec![NativeNode::paragraph(vec![
            NativeNode::text("before"),
            NativeNode::image(ImageAttrs::new("https://cdn/a.png?sig=1").with_alt("diagram")),
            NativeNode::text("after"),
        ])
        .with_align(Some(Align::Right))]);

        let blocks = DocEncoder::new().encode(&doc);
        assert_eq!(blocks.len(), 3);
        assert_eq!(text_block(&blocks[0]).plain_text(), "before");
        assert_eq!(
            blocks[1],
            Block::Image(ImageBlock {
                src: "https://cdn/a.png".to_string(),
                alt: Some("diagram".to_string()),
                align: Some(Align::Right),
            })
        );
        assert_eq!(text_block(&blocks[2]).plain_text(), "after");
    }

    #[test]
    fn test_image_only_paragraph_has_no_text_block() {
        let doc = NativeNode::doc(vec![NativeNode::paragraph(vec![NativeNode::image(
            ImageAttrs::new("https://cdn/a.png"),
        )])]);
        let blocks = DocEncoder::new().encode(&doc);
        assert_eq!(blocks, vec![Block::image("https://cdn/a.png")]);
    }

    #[test]
    fn test_nested_list() {
        let doc = NativeNode::doc(vec![NativeNode::bullet_list(vec![NativeNode::list_item(
            vec![
                NativeNode::paragraph(vec![NativeNode::text("outer")]),
                NativeNode::ordered_list(vec![NativeNode::list_item(vec![
                    NativeNode::paragraph(vec![NativeNode::text("inner")]),
                ])]),
            ],
        )])]);

        let blocks = DocEncoder::new().encode(&doc);
        let expected = Block::list(
            false,
            vec![ListItemBlock::new(vec![
                Block::paragraph(vec![TextSpan::new("outer")]),
                Block::list(
                    true,
                    vec![ListItemBlock::new(vec![Block::paragraph(vec![
                        TextSpan::new("inner"),
                    ])])],
                ),
            ])],
        );
        assert_eq!(blocks, vec![expected]);
    }

    #[test]
    fn test_blockquote_flattens_paragraphs() {
        let doc = NativeNode::doc(vec![NativeNode::blockquote(vec![
            NativeNode::paragraph(vec![NativeNode::text("first")]),
            NativeNode::paragraph(vec![NativeNode::marked_text("second", vec![Mark::Italic])]),
            NativeNode::bullet_list(Vec::new()),
        ])]);

        let blocks = DocEncoder::new().encode(&doc);
        let quote = text_block(&blocks[0]);
        assert_eq!(quote.tag, Some(TextTag::Blockquote));
        assert_eq!(
            quote.spans,
            vec![
                TextSpan::new("first"),
                TextSpan::line_break(),
                TextSpan::new("second").italic(),
            ]
        );
    }

    #[test]
    fn test_unknown_nodes_are_skipped() {
        let blocks = DocEncoder::new()
            .encode_json(json!({
                "type": "doc",
                "content": [
                    {"type": "codeBlock", "content": [{"type": "text", "text": "x"}]},
                    {"type": "paragraph", "content": [{"type": "text", "text": "kept"}]},
                    {"type": "image", "attrs": {"src": null}}
                ]
            }))
            .unwrap();
        assert_eq!(blocks, vec![Block::paragraph(vec![TextSpan::new("kept")])]);
    }

    #[test]
    fn test_null_document_encodes_to_nothing() {
        assert!(DocEncoder::new().encode_json(json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_custom_default_highlight() {
        let doc = NativeNode::doc(vec![NativeNode::paragraph(vec![NativeNode::marked_text(
            "x",
            vec![Mark::Highlight {
                attrs: Default::default(),
            }],
        )])]);
        let blocks = DocEncoder::new().with_default_highlight("#bbf7d0").encode(&doc);
        assert_eq!(
            text_block(&blocks[0]).spans,
            vec![TextSpan::new("x").highlight("#bbf7d0")]
        );
    }
}
