//! Inline run extraction for the document encoder

use crate::types::{Mark, TextSpan};

/// Accumulates the spans of one text block
///
/// Adjacent text leaves with identical marks are merged into one span.
/// Forced breaks are always kept as standalone `"\n"` spans.
#[derive(Debug, Default)]
pub(super) struct SpanBuilder {
    spans: Vec<TextSpan>,
}

impl SpanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text leaf carrying the given marks
    pub fn push_text(&mut self, text: &str, marks: &[Mark], default_highlight: &str) {
        if text.is_empty() {
            return;
        }
        let span = span_with_marks(text, marks, default_highlight);
        match self.spans.last_mut() {
            Some(last) if !last.is_line_break() && last.same_marks(&span) => {
                last.text.push_str(text)
            }
            _ => self.spans.push(span),
        }
    }

    pub fn push_break(&mut self) {
        self.spans.push(TextSpan::line_break());
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Take the collected spans, leaving the builder empty
    pub fn take(&mut self) -> Vec<TextSpan> {
        std::mem::take(&mut self.spans)
    }
}

/// Translate editor marks onto a span
fn span_with_marks(text: &str, marks: &[Mark], default_highlight: &str) -> TextSpan {
    let mut span = TextSpan::new(text);
    for mark in marks {
        match mark {
            Mark::Bold => span.bold = true,
            Mark::Italic => span.italic = true,
            Mark::Strike => span.strikethrough = true,
            Mark::Underline => span.underline = true,
            Mark::TextStyle { attrs } => {
                if let Some(color) = attrs.color.as_deref().filter(|c| !c.is_empty()) {
                    span.color = Some(color.to_string());
                }
            }
            Mark::Highlight { attrs } => {
                let color = attrs
                    .color
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .unwrap_or(default_highlight);
                span.background_color = Some(color.to_string());
            }
            Mark::Unknown => {}
        }
    }
    span
}
