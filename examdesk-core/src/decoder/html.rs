//! Block to editor markup decoder

use super::inline::spans_to_markup;
use crate::error::ParseError;
use crate::markup::escape_html;
use crate::types::{
    blocks_from_value, Align, Block, ImageBlock, ListBlock, ListItemBlock, ListingKind, TextBlock,
    TextTag,
};

/// Markup for a document with no blocks; the editor always gets an insertion point
pub const EMPTY_DOCUMENT: &str = "<p></p>";

/// Decoder from portable blocks to markup the editor can load
///
/// Reads both list encodings: nested `list`/`listItem` blocks and runs of
/// legacy `listing`-flagged text blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupDecoder;

impl MarkupDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode blocks to markup; an empty sequence yields [`EMPTY_DOCUMENT`]
    pub fn decode(&self, blocks: &[Block]) -> String {
        let html = self.blocks_to_markup(blocks);
        if html.is_empty() {
            EMPTY_DOCUMENT.to_string()
        } else {
            html
        }
    }

    /// Decode a stored JSON value; `null` is an empty document
    pub fn decode_value(&self, value: serde_json::Value) -> Result<String, ParseError> {
        let blocks = blocks_from_value(value)?;
        Ok(self.decode(&blocks))
    }

    /// Decode a sequence, tracking the currently open legacy list
    fn blocks_to_markup(&self, blocks: &[Block]) -> String {
        let mut html = String::new();
        let mut open_list: Option<ListingKind> = None;

        for block in blocks {
            match (block, block.listing()) {
                (Block::Text(text), Some(kind)) => {
                    if open_list != Some(kind) {
                        if let Some(open) = open_list {
                            html.push_str(close_tag(open));
                        }
                        html.push_str(open_tag(kind));
                        open_list = Some(kind);
                    }
                    html.push_str(&self.legacy_item_to_markup(text));
                }
                _ => {
                    if let Some(open) = open_list.take() {
                        html.push_str(close_tag(open));
                    }
                    html.push_str(&self.block_to_markup(block));
                }
            }
        }

        if let Some(open) = open_list {
            html.push_str(close_tag(open));
        }
        html
    }

    fn block_to_markup(&self, block: &Block) -> String {
        match block {
            Block::Text(text) => self.text_to_markup(text),
            Block::Image(image) => self.image_to_markup(image),
            Block::List(list) => self.list_to_markup(list),
            Block::ListItem(item) => self.item_to_markup(item),
        }
    }

    fn text_to_markup(&self, text: &TextBlock) -> String {
        let style = align_style(text.align);
        let content = spans_to_markup(&text.effective_spans());
        match text.tag_or_default() {
            // The editor's blockquote only holds block content
            TextTag::Blockquote => format!("<blockquote><p{style}>{content}</p></blockquote>"),
            tag => {
                let tag = tag.as_str();
                format!("<{tag}{style}>{content}</{tag}>")
            }
        }
    }

    /// A legacy flat-list item; alignment needs a paragraph inside the `<li>`
    /// and headings or quotes keep their own element there
    fn legacy_item_to_markup(&self, text: &TextBlock) -> String {
        if text.tag_or_default() != TextTag::P {
            return format!("<li>{}</li>", self.text_to_markup(text));
        }
        let content = spans_to_markup(&text.effective_spans());
        match text.align {
            Some(_) => format!("<li><p{}>{content}</p></li>", align_style(text.align)),
            None => format!("<li>{content}</li>"),
        }
    }

    fn image_to_markup(&self, image: &ImageBlock) -> String {
        let alt = image
            .alt
            .as_deref()
            .map(|alt| format!(" alt=\"{}\"", escape_html(alt)))
            .unwrap_or_default();
        let img = format!("<img src=\"{}\"{alt}>", escape_html(&image.src));
        match image.align {
            Some(_) => format!("<div{}>{img}</div>", align_style(image.align)),
            None => img,
        }
    }

    fn list_to_markup(&self, list: &ListBlock) -> String {
        let tag = if list.ordered { "ol" } else { "ul" };
        let items: String = list
            .children
            .iter()
            .map(|item| self.item_to_markup(item))
            .collect();
        format!("<{tag}>{items}</{tag}>")
    }

    fn item_to_markup(&self, item: &ListItemBlock) -> String {
        format!("<li>{}</li>", self.blocks_to_markup(&item.children))
    }
}

/// Decode blocks with the default decoder
pub fn decode_blocks(blocks: &[Block]) -> String {
    MarkupDecoder::new().decode(blocks)
}

fn align_style(align: Option<Align>) -> String {
    align
        .map(|a| format!(" style=\"text-align: {}\"", a.as_str()))
        .unwrap_or_default()
}

fn open_tag(kind: ListingKind) -> &'static str {
    if kind.is_ordered() {
        "<ol>"
    } else {
        "<ul>"
    }
}

fn close_tag(kind: ListingKind) -> &'static str {
    if kind.is_ordered() {
        "</ol>"
    } else {
        "</ul>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextSpan;
    use serde_json::json;

    fn legacy(text: &str, kind: ListingKind) -> Block {
        Block::Text(TextBlock::new(TextTag::P, vec![TextSpan::new(text)]).with_listing(kind))
    }

    #[test]
    fn test_empty_document_has_placeholder() {
        let decoder = MarkupDecoder::new();
        assert_eq!(decoder.decode(&[]), "<p></p>");
        assert_eq!(decoder.decode_value(json!(null)).unwrap(), "<p></p>");
    }

    #[test]
    fn test_text_blocks_with_alignment() {
        let blocks = vec![
            Block::Text(
                TextBlock::new(TextTag::H2, vec![TextSpan::new("Title")])
                    .with_align(Some(Align::Center)),
            ),
            Block::paragraph(vec![TextSpan::new("body")]),
            Block::Text(TextBlock::blank()),
        ];
        assert_eq!(
            decode_blocks(&blocks),
            "<h2 style=\"text-align: center\">Title</h2><p>body</p><p></p>"
        );
    }

    #[test]
    fn test_blockquote_wraps_paragraph() {
        let quote = Block::Text(TextBlock::new(
            TextTag::Blockquote,
            vec![TextSpan::new("a"), TextSpan::line_break(), TextSpan::new("b")],
        ));
        assert_eq!(
            decode_blocks(&[quote]),
            "<blockquote><p>a<br>b</p></blockquote>"
        );
    }

    #[test]
    fn test_images() {
        let blocks = vec![
            Block::Image(ImageBlock::new("https://host/a.png").with_alt("A \"quoted\" alt")),
            Block::Image(ImageBlock::new("https://host/b.png").with_align(Some(Align::Right))),
        ];
        assert_eq!(
            decode_blocks(&blocks),
            "<img src=\"https://host/a.png\" alt=\"A &quot;quoted&quot; alt\"><div style=\"text-align: right\"><img src=\"https://host/b.png\"></div>"
        );
    }

    #[test]
    fn test_nested_lists() {
        let block = Block::list(
            true,
            vec![ListItemBlock::new(vec![
                Block::paragraph(vec![TextSpan::new("one")]),
                Block::list(
                    false,
                    vec![ListItemBlock::new(vec![Block::paragraph(vec![
                        TextSpan::new("inner"),
                    ])])],
                ),
            ])],
        );
        assert_eq!(
            decode_blocks(&[block]),
            "<ol><li><p>one</p><ul><li><p>inner</p></li></ul></li></ol>"
        );
    }

    #[test]
    fn test_legacy_listing_runs() {
        let blocks = vec![
            legacy("a", ListingKind::Bullet),
            legacy("b", ListingKind::Bullet),
            legacy("one", ListingKind::Ordered),
            Block::paragraph(vec![TextSpan::new("after")]),
            Block::Text(
                TextBlock::new(TextTag::P, vec![TextSpan::new("c")])
                    .with_align(Some(Align::Center))
                    .with_listing(ListingKind::Bullet),
            ),
        ];
        assert_eq!(
            decode_blocks(&blocks),
            "<ul><li>a</li><li>b</li></ul><ol><li>one</li></ol><p>after</p><ul><li><p style=\"text-align: center\">c</p></li></ul>"
        );
    }

    #[test]
    fn test_legacy_items_keep_heading_and_quote() {
        let blocks = vec![
            Block::Text(
                TextBlock::new(TextTag::H2, vec![TextSpan::new("Title")])
                    .with_listing(ListingKind::Bullet),
            ),
            Block::Text(
                TextBlock::new(TextTag::Blockquote, vec![TextSpan::new("q")])
                    .with_listing(ListingKind::Bullet),
            ),
        ];
        assert_eq!(
            decode_blocks(&blocks),
            "<ul><li><h2>Title</h2></li><li><blockquote><p>q</p></blockquote></li></ul>"
        );
    }

    #[test]
    fn test_unknown_block_is_skipped() {
        let html = MarkupDecoder::new()
            .decode_value(json!([
                {"type": "text", "spans": [{"text": "kept"}]},
                {"type": "unsupported"}
            ]))
            .unwrap();
        assert_eq!(html, "<p>kept</p>");
    }

    #[test]
    fn test_legacy_flat_text() {
        let html = MarkupDecoder::new()
            .decode_value(json!([{"type": "text", "text": "old & plain"}]))
            .unwrap();
        assert_eq!(html, "<p>old &amp; plain</p>");
    }
}
