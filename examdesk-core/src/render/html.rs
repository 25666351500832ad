//! Static HTML output for rendered documents

use super::lightbox::LightboxOverlay;
use super::view::{DisplayNode, ImageView, ListView, Run, TextView};
use super::RenderedDocument;
use crate::markup::escape_html;
use crate::types::{Align, TextSpan, TextTag};
use std::fmt;

const DOCUMENT_CLASS: &str = "space-y-1 text-gray-900 text-[15px] leading-7";
const TEXT_CLASS: &str = "min-h-[1.5em] break-words leading-relaxed";
const IMAGE_CLASS: &str = "max-w-sm w-full h-auto object-contain rounded-lg shadow-sm border border-gray-100 cursor-zoom-in hover:opacity-95 transition";

fn tag_class(tag: TextTag) -> &'static str {
    match tag {
        TextTag::P => "",
        TextTag::H1 => " text-2xl font-bold mt-4 mb-2",
        TextTag::H2 => " text-xl font-bold mt-3 mb-2",
        TextTag::H3 => " text-lg font-bold mt-2 mb-1",
        TextTag::Blockquote => {
            " border-l-4 border-gray-300 pl-4 py-1 italic bg-gray-50 text-gray-700 my-2"
        }
    }
}

fn align_value(align: Option<Align>) -> &'static str {
    align.unwrap_or(Align::Left).as_str()
}

impl fmt::Display for RenderedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.nodes.is_empty() {
            write!(f, "<div class=\"{DOCUMENT_CLASS}\">")?;
            for node in &self.nodes {
                write!(f, "{node}")?;
            }
            f.write_str("</div>")?;
        }
        if let Some(overlay) = &self.overlay {
            write!(f, "{overlay}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DisplayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayNode::Text(text) => write!(f, "{text}"),
            DisplayNode::Image(image) => write!(f, "{image}"),
            DisplayNode::List(list) => write!(f, "{list}"),
        }
    }
}

impl fmt::Display for TextView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag.as_str();
        write!(
            f,
            "<{tag} class=\"{TEXT_CLASS}{}\" style=\"text-align: {}\">",
            tag_class(self.tag),
            align_value(self.align)
        )?;
        for run in &self.runs {
            match run {
                Run::Styled(span) => write_span(f, span)?,
                Run::LineBreak => f.write_str("<br>")?,
            }
        }
        write!(f, "</{tag}>")
    }
}

fn write_span(f: &mut fmt::Formatter<'_>, span: &TextSpan) -> fmt::Result {
    let classes: Vec<&str> = [
        (span.bold, "font-bold"),
        (span.italic, "italic"),
        (span.underline, "underline"),
        (span.strikethrough, "line-through"),
    ]
    .into_iter()
    .filter_map(|(on, class)| on.then_some(class))
    .collect();

    let mut styles = Vec::new();
    if let Some(color) = &span.color {
        styles.push(format!("color: {}", escape_html(color)));
    }
    if let Some(background) = &span.background_color {
        styles.push(format!("background-color: {}", escape_html(background)));
    }

    f.write_str("<span")?;
    if !classes.is_empty() {
        write!(f, " class=\"{}\"", classes.join(" "))?;
    }
    if !styles.is_empty() {
        write!(f, " style=\"{}\"", styles.join("; "))?;
    }
    write!(f, ">{}</span>", escape_html(&span.text))
}

impl fmt::Display for ImageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<div class=\"my-4 relative group block\" style=\"text-align: {}\"><div class=\"inline-block relative\"><img src=\"{src}\" alt=\"{}\" class=\"{IMAGE_CLASS}\" data-zoom-src=\"{src}\"></div></div>",
            align_value(self.align),
            escape_html(&self.alt),
            src = escape_html(&self.src),
        )
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, style) = if self.ordered {
            ("ol", "list-decimal")
        } else {
            ("ul", "list-disc")
        };
        write!(f, "<{tag} class=\"pl-6 my-2 space-y-1 {style}\">")?;
        for item in &self.items {
            f.write_str("<li class=\"pl-1\">")?;
            for child in &item.children {
                write!(f, "<div>{child}</div>")?;
            }
            f.write_str("</li>")?;
        }
        write!(f, "</{tag}>")
    }
}

impl fmt::Display for LightboxOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<div class=\"fixed inset-0 z-50 bg-black/80 flex items-center justify-center p-4 cursor-pointer\" data-dismiss=\"lightbox\"><div class=\"relative max-w-[90vw] max-h-[90vh]\"><img src=\"{}\" alt=\"{}\" class=\"max-w-full max-h-[90vh] object-contain rounded-md\"><button type=\"button\" class=\"absolute -top-10 right-0 text-white hover:text-gray-300\" aria-label=\"Close\" data-dismiss=\"lightbox\">&times;</button><p class=\"text-white/70 text-center mt-2 text-sm\">{}</p></div></div>",
            escape_html(&self.src),
            escape_html(&self.alt),
            escape_html(self.hint),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_markup() {
        let view = TextView {
            tag: TextTag::H1,
            align: Some(Align::Center),
            runs: Run::from_spans(&[
                TextSpan::new("<hi>").bold().underline().color("red"),
                TextSpan::line_break(),
                TextSpan::new("plain"),
            ]),
        };
        assert_eq!(
            view.to_string(),
            "<h1 class=\"min-h-[1.5em] break-words leading-relaxed text-2xl font-bold mt-4 mb-2\" style=\"text-align: center\"><span class=\"font-bold underline\" style=\"color: red\">&lt;hi&gt;</span><br><span>plain</span></h1>"
        );
    }

    #[test]
    fn test_image_markup_defaults_to_left() {
        let image = ImageView {
            src: "https://host/a.png".to_string(),
            alt: String::new(),
            align: None,
        };
        let html = image.to_string();
        assert!(html.starts_with("<div class=\"my-4 relative group block\" style=\"text-align: left\">"));
        assert!(html.contains("data-zoom-src=\"https://host/a.png\""));
        assert!(html.contains("cursor-zoom-in"));
    }

    #[test]
    fn test_empty_document_renders_nothing() {
        assert_eq!(RenderedDocument::default().to_string(), "");
    }
}
