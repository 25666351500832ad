//! Convert command implementation

use anyhow::{bail, Context, Result};
use examdesk_core::render::plain_text;
use examdesk_core::types::{Block, StoredContent};
use examdesk_core::{decode_blocks, parse_markup, render_blocks, DocEncoder};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Convert a content document from one representation to another
pub fn convert(input: &str, output: Option<&str>, from: &str, to: &str) -> Result<()> {
    let input_path = Path::new(input);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading input file...");
    let text = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to open input file: {}", input))?;

    pb.set_message(format!("Reading {} input...", from));
    let blocks = read_blocks(&text, from).with_context(|| format!("Failed to read {}", input))?;
    tracing::info!("Read {} blocks from {}", blocks.len(), input);

    pb.set_message(format!("Writing {}...", to));
    let rendered = write_blocks(&blocks, to)?;

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            pb.finish_with_message(format!("Converted {} blocks to {} -> {}", blocks.len(), to, path));
        }
        None => {
            pb.finish_and_clear();
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Parse input text in the named representation
fn read_blocks(text: &str, from: &str) -> Result<Vec<Block>> {
    match from {
        "blocks" => {
            let content: StoredContent =
                serde_json::from_str(text).context("Expected a stored content document")?;
            Ok(content.into_blocks())
        }
        "native" => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            Ok(DocEncoder::new().encode_json(value)?)
        }
        "html" => Ok(DocEncoder::new().encode(&parse_markup(text))),
        other => bail!("No reader available for {} input", other),
    }
}

/// Produce output text in the named representation
fn write_blocks(blocks: &[Block], to: &str) -> Result<String> {
    match to {
        "blocks" => Ok(serde_json::to_string_pretty(blocks)?),
        "markup" => Ok(decode_blocks(blocks)),
        "html" => Ok(render_blocks(blocks).to_string()),
        "text" => Ok(plain_text(blocks)),
        other => bail!("No writer available for {} output", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_html_input() {
        let blocks = read_blocks("<p><strong>bold</strong></p>", "html").unwrap();
        assert_eq!(write_blocks(&blocks, "text").unwrap(), "bold");
    }

    #[test]
    fn test_unknown_representations() {
        assert!(read_blocks("[]", "pdf").is_err());
        assert!(write_blocks(&[], "pdf").is_err());
    }
}
