//! Span to inline markup

use crate::markup::escape_html;
use crate::types::TextSpan;

/// Render a span sequence as inline markup
///
/// Every literal `\n` becomes a `<br>`; the text around it is wrapped
/// separately so breaks never carry marks.
pub(super) fn spans_to_markup(spans: &[TextSpan]) -> String {
    let mut html = String::new();
    for span in spans {
        for (index, piece) in span.text.split('\n').enumerate() {
            if index > 0 {
                html.push_str("<br>");
            }
            if !piece.is_empty() {
                html.push_str(&wrap_marks(&escape_html(piece), span));
            }
        }
    }
    html
}

/// Wrap escaped text in the span's marks
///
/// Innermost to outermost: highlight, color, bold, italic, underline,
/// strikethrough.
fn wrap_marks(escaped: &str, span: &TextSpan) -> String {
    let mut html = escaped.to_string();
    if let Some(background) = span.background_color.as_deref() {
        let background = escape_html(background);
        html = format!(
            "<mark data-color=\"{background}\" style=\"background-color: {background}; color: inherit\">{html}</mark>"
        );
    }
    if let Some(color) = span.color.as_deref() {
        html = format!("<span style=\"color: {}\">{html}</span>", escape_html(color));
    }
    if span.bold {
        html = format!("<strong>{html}</strong>");
    }
    if span.italic {
        html = format!("<em>{html}</em>");
    }
    if span.underline {
        html = format!("<u>{html}</u>");
    }
    if span.strikethrough {
        html = format!("<s>{html}</s>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_order_is_fixed() {
        let span = TextSpan::new("x")
            .bold()
            .italic()
            .underline()
            .strikethrough()
            .color("#ff0000")
            .highlight("#fde047");
        assert_eq!(
            spans_to_markup(&[span]),
            "<s><u><em><strong><span style=\"color: #ff0000\"><mark data-color=\"#fde047\" style=\"background-color: #fde047; color: inherit\">x</mark></span></strong></em></u></s>"
        );
    }

    #[test]
    fn test_newlines_become_unmarked_breaks() {
        let spans = [TextSpan::new("a\nb").bold(), TextSpan::line_break()];
        assert_eq!(
            spans_to_markup(&spans),
            "<strong>a</strong><br><strong>b</strong><br>"
        );
    }

    #[test]
    fn test_text_and_attribute_values_are_escaped() {
        let span = TextSpan::new("<b>&'\"").color("red\"><script>");
        assert_eq!(
            spans_to_markup(&[span]),
            "<span style=\"color: red&quot;&gt;&lt;script&gt;\">&lt;b&gt;&amp;&#039;&quot;</span>"
        );
    }
}
