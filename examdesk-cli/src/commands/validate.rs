//! Validate command implementation

use anyhow::{bail, Context, Result};
use examdesk_core::types::blocks_from_value;
use std::fs;

/// Validate a stored content document
///
/// Unrecognized blocks are dropped by every reader, so they only fail the
/// document in strict mode. Strict mode also rejects the legacy flat list
/// format, which `batch` migrates.
pub fn validate(input: &str, strict: bool) -> Result<()> {
    let text =
        fs::read_to_string(input).with_context(|| format!("Failed to open input file: {}", input))?;
    let value: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Invalid document: {}", e);
            bail!("Validation failed for {}", input);
        }
    };

    if value.is_string() {
        println!("Valid raw HTML document");
        if strict {
            bail!("Validation failed for {}: raw HTML needs migration", input);
        }
        return Ok(());
    }

    let raw_len = value.as_array().map_or(0, Vec::len);
    let blocks = match blocks_from_value(value) {
        Ok(blocks) => blocks,
        Err(e) => {
            eprintln!("Invalid document: {}", e);
            bail!("Validation failed for {}", input);
        }
    };

    let dropped = raw_len - blocks.len();
    let legacy = blocks.iter().filter(|b| b.listing().is_some()).count();

    println!("Valid block document");
    println!("  Blocks: {}", blocks.len());
    if dropped > 0 {
        println!("  Unrecognized blocks: {}", dropped);
    }
    if legacy > 0 {
        println!("  Legacy list items: {}", legacy);
    }

    if strict && (dropped > 0 || legacy > 0) {
        bail!("Validation failed for {}", input);
    }
    Ok(())
}
