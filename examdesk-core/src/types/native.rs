//! Typed mirror of the rich-text editor's JSON document
//!
//! Node and mark kinds the encoder does not understand deserialize to
//! `Unknown` so that documents from newer editor configurations still load.

use super::block::Align;
use serde::{Deserialize, Serialize};

/// Block-level attributes (`textAlign`, `level`, `start`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,

    /// Heading level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,

    /// First number of an ordered list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
}

impl NodeAttrs {
    pub fn is_empty(&self) -> bool {
        self.text_align.is_none() && self.level.is_none() && self.start.is_none()
    }

    /// Parsed alignment, if it is one the block model supports
    pub fn align(&self) -> Option<Align> {
        self.text_align.as_deref().and_then(Align::parse)
    }
}

/// Image node attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
}

impl ImageAttrs {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_align(mut self, align: Option<Align>) -> Self {
        self.text_align = align.map(|a| a.as_str().to_string());
        self
    }

    pub fn align(&self) -> Option<Align> {
        self.text_align.as_deref().and_then(Align::parse)
    }
}

/// Color attribute of `textStyle` and `highlight` marks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Inline formatting mark on a text leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Strike,
    Underline,
    TextStyle {
        #[serde(default)]
        attrs: ColorAttrs,
    },
    Highlight {
        #[serde(default)]
        attrs: ColorAttrs,
    },
    #[serde(other)]
    Unknown,
}

impl Mark {
    /// Text color mark
    pub fn color(color: impl Into<String>) -> Self {
        Mark::TextStyle {
            attrs: ColorAttrs {
                color: Some(color.into()),
            },
        }
    }

    /// Highlight mark with an explicit color
    pub fn highlight(color: impl Into<String>) -> Self {
        Mark::Highlight {
            attrs: ColorAttrs {
                color: Some(color.into()),
            },
        }
    }

    /// Whether two marks are of the same kind, ignoring attributes
    pub fn same_kind(&self, other: &Mark) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A node of the editor's native document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NativeNode {
    Doc {
        #[serde(default)]
        content: Vec<NativeNode>,
    },
    Paragraph {
        #[serde(default, skip_serializing_if = "NodeAttrs::is_empty")]
        attrs: NodeAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<NativeNode>,
    },
    Heading {
        #[serde(default)]
        attrs: NodeAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<NativeNode>,
    },
    Blockquote {
        #[serde(default)]
        content: Vec<NativeNode>,
    },
    BulletList {
        #[serde(default)]
        content: Vec<NativeNode>,
    },
    OrderedList {
        #[serde(default, skip_serializing_if = "NodeAttrs::is_empty")]
        attrs: NodeAttrs,
        #[serde(default)]
        content: Vec<NativeNode>,
    },
    ListItem {
        #[serde(default)]
        content: Vec<NativeNode>,
    },
    Image {
        #[serde(default)]
        attrs: ImageAttrs,
    },
    Text {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    HardBreak,
    #[serde(other)]
    Unknown,
}

impl NativeNode {
    pub fn doc(content: Vec<NativeNode>) -> Self {
        NativeNode::Doc { content }
    }

    /// An empty document
    pub fn empty_doc() -> Self {
        NativeNode::Doc {
            content: vec![NativeNode::paragraph(Vec::new())],
        }
    }

    pub fn paragraph(content: Vec<NativeNode>) -> Self {
        NativeNode::Paragraph {
            attrs: NodeAttrs::default(),
            content,
        }
    }

    pub fn heading(level: u8, content: Vec<NativeNode>) -> Self {
        NativeNode::Heading {
            attrs: NodeAttrs {
                level: Some(level),
                ..NodeAttrs::default()
            },
            content,
        }
    }

    pub fn blockquote(content: Vec<NativeNode>) -> Self {
        NativeNode::Blockquote { content }
    }

    pub fn bullet_list(items: Vec<NativeNode>) -> Self {
        NativeNode::BulletList { content: items }
    }

    pub fn ordered_list(items: Vec<NativeNode>) -> Self {
        NativeNode::OrderedList {
            attrs: NodeAttrs::default(),
            content: items,
        }
    }

    pub fn list_item(content: Vec<NativeNode>) -> Self {
        NativeNode::ListItem { content }
    }

    pub fn image(attrs: ImageAttrs) -> Self {
        NativeNode::Image { attrs }
    }

    /// Unformatted text leaf
    pub fn text(text: impl Into<String>) -> Self {
        NativeNode::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Text leaf with marks
    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        NativeNode::Text {
            text: text.into(),
            marks,
        }
    }

    pub fn hard_break() -> Self {
        NativeNode::HardBreak
    }

    /// Set the alignment attribute on nodes that carry one
    pub fn with_align(mut self, align: Option<Align>) -> Self {
        let value = align.map(|a| a.as_str().to_string());
        match &mut self {
            NativeNode::Paragraph { attrs, .. } | NativeNode::Heading { attrs, .. } => {
                attrs.text_align = value
            }
            NativeNode::Image { attrs } => attrs.text_align = value,
            _ => {}
        }
        self
    }

    /// Node kind as the editor names it
    pub fn kind(&self) -> &'static str {
        match self {
            NativeNode::Doc { .. } => "doc",
            NativeNode::Paragraph { .. } => "paragraph",
            NativeNode::Heading { .. } => "heading",
            NativeNode::Blockquote { .. } => "blockquote",
            NativeNode::BulletList { .. } => "bulletList",
            NativeNode::OrderedList { .. } => "orderedList",
            NativeNode::ListItem { .. } => "listItem",
            NativeNode::Image { .. } => "image",
            NativeNode::Text { .. } => "text",
            NativeNode::HardBreak => "hardBreak",
            NativeNode::Unknown => "unknown",
        }
    }

    /// Child nodes, empty for leaves
    pub fn content(&self) -> &[NativeNode] {
        match self {
            NativeNode::Doc { content }
            | NativeNode::Paragraph { content, .. }
            | NativeNode::Heading { content, .. }
            | NativeNode::Blockquote { content }
            | NativeNode::BulletList { content }
            | NativeNode::OrderedList { content, .. }
            | NativeNode::ListItem { content } => content,
            NativeNode::Image { .. }
            | NativeNode::Text { .. }
            | NativeNode::HardBreak
            | NativeNode::Unknown => &[],
        }
    }

    /// Mutable child nodes, `None` for leaves
    pub fn content_mut(&mut self) -> Option<&mut Vec<NativeNode>> {
        match self {
            NativeNode::Doc { content }
            | NativeNode::Paragraph { content, .. }
            | NativeNode::Heading { content, .. }
            | NativeNode::Blockquote { content }
            | NativeNode::BulletList { content }
            | NativeNode::OrderedList { content, .. }
            | NativeNode::ListItem { content } => Some(content),
            NativeNode::Image { .. }
            | NativeNode::Text { .. }
            | NativeNode::HardBreak
            | NativeNode::Unknown => None,
        }
    }

    /// Whether this node holds inline content (text, breaks, inline images)
    pub fn is_textblock(&self) -> bool {
        matches!(
            self,
            NativeNode::Paragraph { .. } | NativeNode::Heading { .. }
        )
    }
}
