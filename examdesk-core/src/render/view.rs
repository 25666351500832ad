//! Display tree produced by the read-only renderer

use crate::types::{Align, TextSpan, TextTag};

/// One rendered block
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Text(TextView),
    Image(ImageView),
    List(ListView),
}

/// A paragraph, heading or quote
#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    pub tag: TextTag,
    pub align: Option<Align>,
    pub runs: Vec<Run>,
}

impl TextView {
    /// True when nothing but the block's own height is displayed
    pub fn is_blank(&self) -> bool {
        self.runs.is_empty()
    }

    /// Displayed text, with line breaks as `\n`
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|run| match run {
                Run::Styled(span) => span.text.as_str(),
                Run::LineBreak => "\n",
            })
            .collect()
    }
}

/// Inline content of a text view
#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    /// Text without line breaks, carrying its marks
    Styled(TextSpan),
    LineBreak,
}

impl Run {
    /// Split spans into runs; every literal newline becomes a [`Run::LineBreak`]
    pub fn from_spans(spans: &[TextSpan]) -> Vec<Run> {
        let mut runs = Vec::new();
        for span in spans {
            for (index, piece) in span.text.split('\n').enumerate() {
                if index > 0 {
                    runs.push(Run::LineBreak);
                }
                if !piece.is_empty() {
                    runs.push(Run::Styled(span.with_text(piece)));
                }
            }
        }
        runs
    }
}

/// An image with a click-to-zoom affordance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub align: Option<Align>,
}

/// An ordered or unordered list
///
/// Legacy flat lists and nested list blocks produce the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub ordered: bool,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub children: Vec<DisplayNode>,
}
