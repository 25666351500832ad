//! Editor markup helpers
//!
//! The decoder writes markup for the editor to load; [`parse_markup`] reads
//! that markup (and older raw-HTML content) back into a native document the
//! way the editor's own HTML parser does.

mod reader;

pub use reader::parse_markup;

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Look up one property of an inline `style` attribute
///
/// Property names compare case-insensitively; the value is trimmed.
pub fn style_property<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .find(|(property, _)| property.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_style_property() {
        let style = "color: #ff0000; Background-Color:rgb(1, 2, 3) ;text-align: center";
        assert_eq!(style_property(style, "color"), Some("#ff0000"));
        assert_eq!(style_property(style, "background-color"), Some("rgb(1, 2, 3)"));
        assert_eq!(style_property(style, "text-align"), Some("center"));
        assert_eq!(style_property(style, "font-size"), None);
        assert_eq!(style_property("color:", "color"), None);
    }
}
