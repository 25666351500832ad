//! Info command implementation

use super::read_stored;
use anyhow::Result;
use examdesk_core::render::excerpt;
use examdesk_core::types::Block;
use serde::Serialize;
use std::path::Path;

/// Document info output
#[derive(Serialize, Default)]
struct DocumentInfo {
    blocks: usize,
    text_blocks: usize,
    images: usize,
    lists: usize,
    legacy_list_items: usize,
    excerpt: String,
}

fn count(blocks: &[Block], info: &mut DocumentInfo) {
    for block in blocks {
        match block {
            Block::Text(text) => {
                info.text_blocks += 1;
                if text.listing.is_some() {
                    info.legacy_list_items += 1;
                }
            }
            Block::Image(_) => info.images += 1,
            Block::List(list) => {
                info.lists += 1;
                for item in &list.children {
                    count(&item.children, info);
                }
            }
            Block::ListItem(item) => count(&item.children, info),
        }
    }
}

/// Display information about a stored content document
pub fn info(input: &str, json: bool) -> Result<()> {
    let blocks = read_stored(Path::new(input))?;

    let mut info = DocumentInfo {
        blocks: blocks.len(),
        excerpt: excerpt(&blocks, 80),
        ..Default::default()
    };
    count(&blocks, &mut info);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Blocks:      {}", info.blocks);
        println!("Text blocks: {}", info.text_blocks);
        println!("Images:      {}", info.images);
        println!("Lists:       {}", info.lists);
        if info.legacy_list_items > 0 {
            println!("Legacy list items: {}", info.legacy_list_items);
        }
        if !info.excerpt.is_empty() {
            println!("Excerpt:     {}", info.excerpt);
        }
    }

    Ok(())
}
