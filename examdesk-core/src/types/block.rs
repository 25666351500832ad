//! Portable rich-content blocks
//!
//! This is the storage format for problem statements, explanations and
//! answers. It is independent of any editor library: the encoder builds it
//! from the editor's native document, the decoder and renderer read it back.

use crate::error::ParseError;
use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Highlight color used when the editor's highlight mark carries none
pub const DEFAULT_HIGHLIGHT: &str = "#fde047";

/// Horizontal alignment of a text or image block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }

    /// Parse a CSS `text-align` value, ignoring case and surrounding space
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" => Some(Align::Right),
            "justify" => Some(Align::Justify),
            _ => None,
        }
    }
}

/// Element kind of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTag {
    #[default]
    P,
    H1,
    H2,
    H3,
    Blockquote,
}

impl TextTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TextTag::P => "p",
            TextTag::H1 => "h1",
            TextTag::H2 => "h2",
            TextTag::H3 => "h3",
            TextTag::Blockquote => "blockquote",
        }
    }

    /// Heading tag for an editor heading level; levels above 3 clamp to `h3`
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => TextTag::H1,
            2 => TextTag::H2,
            _ => TextTag::H3,
        }
    }

    /// Heading level, if this is a heading
    pub fn heading_level(self) -> Option<u8> {
        match self {
            TextTag::H1 => Some(1),
            TextTag::H2 => Some(2),
            TextTag::H3 => Some(3),
            TextTag::P | TextTag::Blockquote => None,
        }
    }
}

/// List flavor of a legacy flat-list text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Bullet,
    Ordered,
}

impl ListingKind {
    pub fn is_ordered(self) -> bool {
        matches!(self, ListingKind::Ordered)
    }
}

/// A run of text sharing one set of formatting marks
///
/// A literal `\n` inside `text` is a forced line break within the same
/// paragraph. A span whose text is exactly `"\n"` encodes a standalone break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub text: String,

    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "lenient_flag")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "lenient_flag")]
    pub italic: bool,

    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "lenient_flag")]
    pub underline: bool,

    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "lenient_flag")]
    pub strikethrough: bool,

    /// CSS text color
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub color: Option<String>,

    /// CSS highlight color
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub background_color: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TextSpan {
    /// Create an unformatted span
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The explicit forced-break span
    pub fn line_break() -> Self {
        Self::new("\n")
    }

    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn highlight(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Whether any formatting mark is set
    pub fn has_marks(&self) -> bool {
        self.bold
            || self.italic
            || self.underline
            || self.strikethrough
            || self.color.is_some()
            || self.background_color.is_some()
    }

    /// Whether both spans carry the same formatting marks
    pub fn same_marks(&self, other: &TextSpan) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
            && self.color == other.color
            && self.background_color == other.background_color
    }

    /// Copy of this span's marks around different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strikethrough: self.strikethrough,
            color: self.color.clone(),
            background_color: self.background_color.clone(),
        }
    }
}

/// Paragraph, heading or quote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub tag: Option<TextTag>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub align: Option<Align>,

    #[serde(default, deserialize_with = "lenient_spans")]
    pub spans: Vec<TextSpan>,

    /// Flat text written by the earliest block format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Marks this block as an item of a legacy flat list
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub listing: Option<ListingKind>,
}

impl TextBlock {
    pub fn new(tag: TextTag, spans: Vec<TextSpan>) -> Self {
        Self {
            tag: Some(tag),
            spans,
            ..Self::default()
        }
    }

    /// A blank paragraph
    pub fn blank() -> Self {
        Self::new(TextTag::P, Vec::new())
    }

    pub fn with_align(mut self, align: Option<Align>) -> Self {
        self.align = align;
        self
    }

    pub fn with_listing(mut self, listing: ListingKind) -> Self {
        self.listing = Some(listing);
        self
    }

    /// The block's tag, `p` when absent
    pub fn tag_or_default(&self) -> TextTag {
        self.tag.unwrap_or_default()
    }

    /// Spans to display, falling back to the legacy flat `text`
    pub fn effective_spans(&self) -> Cow<'_, [TextSpan]> {
        if !self.spans.is_empty() {
            return Cow::Borrowed(&self.spans);
        }
        match &self.text {
            Some(text) if !text.is_empty() => Cow::Owned(vec![TextSpan::new(text.as_str())]),
            _ => Cow::Borrowed(&[]),
        }
    }

    /// True when the block holds no text at all (not even a forced break)
    pub fn is_blank(&self) -> bool {
        self.effective_spans().iter().all(|span| span.text.is_empty())
    }

    /// Concatenated text of all spans
    pub fn plain_text(&self) -> String {
        self.effective_spans()
            .iter()
            .map(|span| span.text.as_str())
            .collect()
    }
}

/// An embedded image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Canonical URL without any query-string signature
    pub src: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub align: Option<Align>,
}

impl ImageBlock {
    /// Create an image block, canonicalizing the source URL
    pub fn new(src: &str) -> Self {
        Self {
            src: canonicalize_src(src).to_string(),
            alt: None,
            align: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        let alt = alt.into();
        self.alt = (!alt.is_empty()).then_some(alt);
        self
    }

    pub fn with_align(mut self, align: Option<Align>) -> Self {
        self.align = align;
        self
    }
}

/// Ordered or unordered list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    #[serde(default)]
    pub ordered: bool,

    #[serde(
        default,
        serialize_with = "serialize_list_items",
        deserialize_with = "lenient_list_items"
    )]
    pub children: Vec<ListItemBlock>,
}

impl ListBlock {
    pub fn new(ordered: bool, children: Vec<ListItemBlock>) -> Self {
        Self { ordered, children }
    }
}

/// One item of a list; may hold text, images and nested lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItemBlock {
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub children: Vec<Block>,
}

impl ListItemBlock {
    pub fn new(children: Vec<Block>) -> Self {
        Self { children }
    }
}

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    /// Paragraph, heading or quote
    Text(TextBlock),

    /// Image
    Image(ImageBlock),

    /// Ordered or unordered list
    List(ListBlock),

    /// List item
    ListItem(ListItemBlock),
}

impl Block {
    /// Create a paragraph from spans
    pub fn paragraph(spans: Vec<TextSpan>) -> Self {
        Block::Text(TextBlock::new(TextTag::P, spans))
    }

    /// Create a heading; levels above 3 clamp to `h3`
    pub fn heading(level: u8, spans: Vec<TextSpan>) -> Self {
        Block::Text(TextBlock::new(TextTag::heading(level), spans))
    }

    /// Create an image block
    pub fn image(src: &str) -> Self {
        Block::Image(ImageBlock::new(src))
    }

    /// Create a list block
    pub fn list(ordered: bool, items: Vec<ListItemBlock>) -> Self {
        Block::List(ListBlock::new(ordered, items))
    }

    /// The `type` tag of this block
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Text(_) => "text",
            Block::Image(_) => "image",
            Block::List(_) => "list",
            Block::ListItem(_) => "listItem",
        }
    }

    /// The legacy list flag, for text blocks that carry one
    pub fn listing(&self) -> Option<ListingKind> {
        match self {
            Block::Text(text) => text.listing,
            _ => None,
        }
    }
}

/// Strip a transient query-string signature from an image URL
///
/// Everything from the first `?` on is removed. Idempotent.
pub fn canonicalize_src(src: &str) -> &str {
    match src.find('?') {
        Some(index) => &src[..index],
        None => src,
    }
}

/// Canonical run form of a span sequence
///
/// Literal newlines become standalone unmarked break spans, empty runs are
/// dropped and adjacent runs with identical marks are merged. Two span
/// sequences display the same text with the same marks exactly when their
/// normalized forms are equal.
pub fn normalize_spans(spans: &[TextSpan]) -> Vec<TextSpan> {
    let mut runs: Vec<TextSpan> = Vec::new();
    for span in spans {
        for (index, piece) in span.text.split('\n').enumerate() {
            if index > 0 {
                runs.push(TextSpan::line_break());
            }
            if piece.is_empty() {
                continue;
            }
            match runs.last_mut() {
                Some(last) if !last.is_line_break() && last.same_marks(span) => {
                    last.text.push_str(piece)
                }
                _ => runs.push(span.with_text(piece)),
            }
        }
    }
    runs
}

/// Read a stored block array, skipping elements that are not valid blocks
///
/// `null` reads as an empty document. Any other non-array value is an error.
pub fn blocks_from_value(value: serde_json::Value) -> Result<Vec<Block>, ParseError> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(items) => Ok(collect_blocks(items)),
        other => Err(ParseError::NotAnArray(json_kind(&other))),
    }
}

/// Read a stored block array from JSON text
pub fn blocks_from_str(json: &str) -> Result<Vec<Block>, ParseError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    blocks_from_value(value)
}

pub(crate) fn collect_blocks(items: Vec<serde_json::Value>) -> Vec<Block> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Block>(item) {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unrecognized block");
                None
            }
        })
        .collect()
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Deserialize an optional value, reading anything unrecognized as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Read a mark flag; `null` or any non-boolean leaves the mark unset
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(serde_json::Value::Bool(true))))
}

fn lenient_spans<'de, D>(deserializer: D) -> Result<Vec<TextSpan>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

fn lenient_blocks<'de, D>(deserializer: D) -> Result<Vec<Block>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(collect_blocks(values.unwrap_or_default()))
}

fn lenient_list_items<'de, D>(deserializer: D) -> Result<Vec<ListItemBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let blocks = lenient_blocks(deserializer)?;
    Ok(blocks
        .into_iter()
        .filter_map(|block| match block {
            Block::ListItem(item) => Some(item),
            other => {
                tracing::warn!(kind = other.kind(), "Skipping non-item child of list block");
                None
            }
        })
        .collect())
}

/// List items serialize with their `listItem` tag so stored lists stay self-describing
#[allow(clippy::ptr_arg)]
fn serialize_list_items<S>(items: &Vec<ListItemBlock>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(items.iter().map(TaggedListItem))
}

struct TaggedListItem<'a>(&'a ListItemBlock);

impl Serialize for TaggedListItem<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ListItemBlock", 2)?;
        state.serialize_field("type", "listItem")?;
        state.serialize_field("children", &self.0.children)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_span_serializes_only_set_marks() {
        let span = TextSpan::new("hi").bold().highlight("#fde047");
        let value = serde_json::to_value(&span).unwrap();
        assert_eq!(
            value,
            json!({"text": "hi", "bold": true, "backgroundColor": "#fde047"})
        );
    }

    #[test]
    fn test_null_marks_keep_span_text() {
        let blocks = blocks_from_str(
            r#"[{"type": "text", "spans": [
                {"text": "keep", "bold": null, "italic": "yes", "color": 7},
                {"text": " me", "underline": true}
            ]}]"#,
        )
        .unwrap();

        let Block::Text(text) = &blocks[0] else {
            panic!("expected a text block, got {:?}", blocks[0]);
        };
        assert_eq!(text.plain_text(), "keep me");
        assert_eq!(text.spans[0], TextSpan::new("keep"));
        assert!(text.spans[1].underline);
    }

    #[test]
    fn test_nested_list_json_shape() {
        let block = Block::list(
            false,
            vec![ListItemBlock::new(vec![
                Block::paragraph(vec![TextSpan::new("a")]),
                Block::list(true, vec![ListItemBlock::new(vec![])]),
            ])],
        );
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "list");
        assert_eq!(value["ordered"], false);
        assert_eq!(value["children"][0]["type"], "listItem");
        assert_eq!(value["children"][0]["children"][0]["type"], "text");
        assert_eq!(value["children"][0]["children"][1]["ordered"], true);

        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_unknown_blocks_are_skipped() {
        let blocks = blocks_from_value(json!([
            {"type": "text", "spans": [{"text": "kept"}]},
            {"type": "unsupported", "payload": 1},
            {"type": "image"},
            "garbage",
        ]))
        .unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind(), "text");
    }

    #[test]
    fn test_null_is_empty_document() {
        assert!(blocks_from_str("null").unwrap().is_empty());
        assert!(matches!(
            blocks_from_str("{\"type\": \"text\"}"),
            Err(ParseError::NotAnArray("object"))
        ));
    }

    #[test]
    fn test_unknown_enum_values_read_as_absent() {
        let blocks = blocks_from_value(json!([
            {"type": "text", "tag": "h6", "align": "start", "listing": "dashed", "spans": []}
        ]))
        .unwrap();
        match &blocks[0] {
            Block::Text(text) => {
                assert_eq!(text.tag, None);
                assert_eq!(text.align, None);
                assert_eq!(text.listing, None);
            }
            other => panic!("Expected text block, got {other:?}"),
        }
    }

    #[test]
    fn test_list_drops_non_item_children() {
        let blocks = blocks_from_value(json!([{
            "type": "list",
            "ordered": true,
            "children": [
                {"type": "listItem", "children": [{"type": "text", "spans": [{"text": "one"}]}]},
                {"type": "text", "spans": [{"text": "stray"}]},
                {"type": "listItem", "children": [{"type": "mystery"}]}
            ]
        }]))
        .unwrap();
        match &blocks[0] {
            Block::List(list) => {
                assert!(list.ordered);
                assert_eq!(list.children.len(), 2);
                assert!(list.children[1].children.is_empty());
            }
            other => panic!("Expected list block, got {other:?}"),
        }
    }

    #[test]
    fn test_effective_spans_falls_back_to_legacy_text() {
        let legacy: TextBlock =
            serde_json::from_value(json!({"text": "old style", "listing": "bullet"})).unwrap();
        assert_eq!(&*legacy.effective_spans(), &[TextSpan::new("old style")]);
        assert_eq!(legacy.listing, Some(ListingKind::Bullet));
        assert!(TextBlock::blank().is_blank());
        assert!(!TextBlock::new(TextTag::P, vec![TextSpan::line_break()]).is_blank());
    }

    #[test]
    fn test_canonicalize_src() {
        assert_eq!(
            canonicalize_src("https://host/img.png?sig=abc123"),
            "https://host/img.png"
        );
        assert_eq!(canonicalize_src("https://host/img.png"), "https://host/img.png");
        assert_eq!(canonicalize_src("?only"), "");
    }

    #[test]
    fn test_normalize_spans_splits_and_merges() {
        let spans = vec![
            TextSpan::new("a\nb").bold(),
            TextSpan::new("c").bold(),
            TextSpan::new(""),
            TextSpan::line_break(),
            TextSpan::new("d"),
        ];
        assert_eq!(
            normalize_spans(&spans),
            vec![
                TextSpan::new("a").bold(),
                TextSpan::line_break(),
                TextSpan::new("bc").bold(),
                TextSpan::line_break(),
                TextSpan::new("d"),
            ]
        );
    }

    #[test]
    fn test_heading_levels_clamp() {
        assert_eq!(TextTag::heading(1), TextTag::H1);
        assert_eq!(TextTag::heading(5), TextTag::H3);
        assert_eq!(TextTag::H2.heading_level(), Some(2));
        assert_eq!(TextTag::Blockquote.heading_level(), None);
    }
}
