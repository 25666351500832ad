//! HTML to native document reader
//!
//! Mirrors how the editor parses HTML handed to it: block elements become
//! block nodes, stray inline content is wrapped in paragraphs, formatting
//! elements and inline styles become marks, and collapsible whitespace is
//! collapsed.

use super::style_property;
use crate::types::{Align, ColorAttrs, ImageAttrs, Mark, NativeNode, NodeAttrs};
use ego_tree::NodeRef;
use scraper::{node::Element, Html, Node};

/// Parse HTML markup into a native document
pub fn parse_markup(markup: &str) -> NativeNode {
    let fragment = Html::parse_fragment(markup);
    let content = read_blocks(*fragment.root_element());
    tracing::trace!(blocks = content.len(), "Parsed markup");
    NativeNode::doc(content)
}

/// Elements that open a block in the editor's schema or act as block containers
fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "p" | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "blockquote"
            | "ul"
            | "ol"
            | "li"
            | "img"
            | "div"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "main"
            | "aside"
            | "nav"
            | "figure"
            | "figcaption"
            | "pre"
            | "table"
            | "thead"
            | "tbody"
            | "tfoot"
            | "tr"
            | "td"
            | "th"
            | "hr"
    )
}

/// Read the children of a block container
fn read_blocks(parent: NodeRef<'_, Node>) -> Vec<NativeNode> {
    let mut blocks = Vec::new();
    let mut pending = Vec::new();

    for child in parent.children() {
        match child.value() {
            Node::Element(el) if is_block_element(el.name()) => {
                flush_inline(&mut pending, &mut blocks);
                read_block(child, el, &mut blocks);
            }
            Node::Element(_) | Node::Text(_) => read_inline(child, &[], &mut pending),
            _ => {}
        }
    }
    flush_inline(&mut pending, &mut blocks);
    blocks
}

/// Wrap collected stray inline content in a paragraph
fn flush_inline(pending: &mut Vec<NativeNode>, blocks: &mut Vec<NativeNode>) {
    if pending.is_empty() {
        return;
    }
    let mut content = std::mem::take(pending);
    normalize_whitespace(&mut content);
    if !content.is_empty() {
        blocks.push(NativeNode::paragraph(content));
    }
}

fn read_block(node: NodeRef<'_, Node>, el: &Element, out: &mut Vec<NativeNode>) {
    let name = el.name();
    match name {
        "p" | "pre" => out.push(NativeNode::Paragraph {
            attrs: NodeAttrs {
                text_align: element_align(el).map(|a| a.as_str().to_string()),
                ..NodeAttrs::default()
            },
            content: read_textblock(node),
        }),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name[1..].parse().unwrap_or(1);
            out.push(
                NativeNode::heading(level, read_textblock(node)).with_align(element_align(el)),
            );
        }
        "blockquote" => out.push(NativeNode::blockquote(read_blocks(node))),
        "ul" => out.push(NativeNode::bullet_list(read_list_items(node))),
        "ol" => out.push(NativeNode::OrderedList {
            attrs: NodeAttrs {
                start: el.attr("start").and_then(|s| s.trim().parse().ok()),
                ..NodeAttrs::default()
            },
            content: read_list_items(node),
        }),
        // An item outside any list keeps its content
        "li" => out.extend(read_blocks(node)),
        "img" => {
            if let Some(image) = read_image(el) {
                out.push(image);
            }
        }
        "hr" => {}
        _ => {
            let mut children = read_blocks(node);
            if let Some(align) = element_align(el) {
                children.iter_mut().for_each(|child| inherit_align(child, align));
            }
            out.extend(children);
        }
    }
}

/// Give an alignment to a block that has none of its own
fn inherit_align(node: &mut NativeNode, align: Align) {
    let value = align.as_str().to_string();
    match node {
        NativeNode::Paragraph { attrs, .. } | NativeNode::Heading { attrs, .. } => {
            attrs.text_align.get_or_insert(value);
        }
        NativeNode::Image { attrs } => {
            attrs.text_align.get_or_insert(value);
        }
        _ => {}
    }
}

fn read_list_items(list: NodeRef<'_, Node>) -> Vec<NativeNode> {
    list.children()
        .filter_map(|child| match child.value() {
            Node::Element(el) if el.name() == "li" => {
                Some(NativeNode::list_item(read_blocks(child)))
            }
            Node::Element(el) => {
                tracing::debug!(element = el.name(), "Skipping non-item list child");
                None
            }
            _ => None,
        })
        .collect()
}

/// Inline content of a paragraph or heading
fn read_textblock(node: NodeRef<'_, Node>) -> Vec<NativeNode> {
    let mut content = Vec::new();
    for child in node.children() {
        read_inline(child, &[], &mut content);
    }
    normalize_whitespace(&mut content);
    content
}

fn read_inline(node: NodeRef<'_, Node>, marks: &[Mark], out: &mut Vec<NativeNode>) {
    match node.value() {
        Node::Text(text) => {
            if !text.is_empty() {
                out.push(NativeNode::marked_text(&**text, marks.to_vec()));
            }
        }
        Node::Element(el) => match el.name() {
            "br" => out.push(NativeNode::hard_break()),
            "img" => {
                if let Some(image) = read_image(el) {
                    out.push(image);
                }
            }
            name => {
                let marks = element_marks(name, el, marks);
                for child in node.children() {
                    read_inline(child, &marks, out);
                }
            }
        },
        _ => {}
    }
}

/// Marks in effect inside an inline element
fn element_marks(name: &str, el: &Element, outer: &[Mark]) -> Vec<Mark> {
    let mut marks = outer.to_vec();
    match name {
        "strong" | "b" => add_mark(&mut marks, Mark::Bold),
        "em" | "i" => add_mark(&mut marks, Mark::Italic),
        "u" => add_mark(&mut marks, Mark::Underline),
        "s" | "strike" | "del" => add_mark(&mut marks, Mark::Strike),
        "mark" => {
            let color = el
                .attr("data-color")
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .or_else(|| {
                    el.attr("style")
                        .and_then(|style| style_property(style, "background-color"))
                });
            add_mark(
                &mut marks,
                Mark::Highlight {
                    attrs: ColorAttrs {
                        color: color.map(str::to_string),
                    },
                },
            );
        }
        "span" => {
            if let Some(style) = el.attr("style") {
                if let Some(color) = style_property(style, "color") {
                    add_mark(&mut marks, Mark::color(color));
                }
                if let Some(background) = style_property(style, "background-color") {
                    add_mark(&mut marks, Mark::highlight(background));
                }
            }
        }
        _ => {}
    }
    marks
}

/// Add a mark, replacing an outer mark of the same kind
fn add_mark(marks: &mut Vec<Mark>, mark: Mark) {
    marks.retain(|existing| !existing.same_kind(&mark));
    marks.push(mark);
}

fn read_image(el: &Element) -> Option<NativeNode> {
    let src = el.attr("src").map(str::trim).filter(|s| !s.is_empty());
    let Some(src) = src else {
        tracing::debug!("Skipping image without a source");
        return None;
    };
    let mut attrs = ImageAttrs::new(src).with_align(element_align(el));
    attrs.alt = el.attr("alt").map(str::to_string);
    attrs.title = el.attr("title").map(str::to_string);
    Some(NativeNode::image(attrs))
}

/// Alignment from a `text-align` style or a legacy `align` attribute
fn element_align(el: &Element) -> Option<Align> {
    el.attr("style")
        .and_then(|style| style_property(style, "text-align"))
        .and_then(Align::parse)
        .or_else(|| el.attr("align").and_then(Align::parse))
}

fn is_collapsible(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{000c}')
}

/// Collapse whitespace the way the editor does for non-preformatted content
///
/// Runs of whitespace become one space, a space is dropped at the start of
/// the block or after another space, trailing space at the end of the block
/// is removed, and text leaves left empty are dropped.
fn normalize_whitespace(content: &mut Vec<NativeNode>) {
    let mut after_space = true;
    for node in content.iter_mut() {
        match node {
            NativeNode::Text { text, .. } => {
                let mut collapsed = String::with_capacity(text.len());
                for c in text.chars() {
                    if is_collapsible(c) {
                        if !after_space {
                            collapsed.push(' ');
                            after_space = true;
                        }
                    } else {
                        collapsed.push(c);
                        after_space = false;
                    }
                }
                *text = collapsed;
            }
            _ => after_space = false,
        }
    }

    // Trailing space of the block
    for node in content.iter_mut().rev() {
        match node {
            NativeNode::Text { text, .. } if text.is_empty() => continue,
            NativeNode::Text { text, .. } => {
                let trimmed = text.trim_end_matches(' ').len();
                text.truncate(trimmed);
                if !text.is_empty() {
                    break;
                }
            }
            _ => break,
        }
    }

    content.retain(|node| !matches!(node, NativeNode::Text { text, .. } if text.is_empty()));
}
