//! CLI command implementations

mod batch;
mod convert;
mod info;
mod show;
mod upload;
mod validate;

pub use batch::batch;
pub use convert::convert;
pub use info::info;
pub use show::show;
pub use upload::upload;
pub use validate::validate;

use anyhow::{Context, Result};
use examdesk_core::types::{Block, StoredContent};
use std::path::Path;

/// Read a stored document of any generation as blocks
pub(crate) fn read_stored(path: &Path) -> Result<Vec<Block>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let content: StoredContent = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a stored content document", path.display()))?;
    Ok(content.into_blocks())
}
