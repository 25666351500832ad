//! Reader for every on-disk content generation

use super::block::{collect_blocks, Block};
use crate::encoder::DocEncoder;
use crate::markup::parse_markup;
use serde::{Deserialize, Deserializer};

/// Content as found in storage
///
/// Early records hold a raw HTML string, later ones a block array (flat,
/// legacy-listing or nested). Everything reaches readers as `Vec<Block>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredContent {
    Blocks(Vec<serde_json::Value>),
    Html(String),
    Empty,
}

impl StoredContent {
    /// Convert to blocks; raw HTML goes through the markup reader and encoder
    pub fn into_blocks(self) -> Vec<Block> {
        match self {
            StoredContent::Blocks(values) => collect_blocks(values),
            StoredContent::Html(html) if html.trim().is_empty() => Vec::new(),
            StoredContent::Html(html) => {
                tracing::debug!(len = html.len(), "Importing raw HTML content");
                DocEncoder::new().encode(&parse_markup(&html))
            }
            StoredContent::Empty => Vec::new(),
        }
    }
}

/// `deserialize_with` adapter for record fields holding stored content
pub fn deserialize_content<'de, D>(deserializer: D) -> Result<Vec<Block>, D::Error>
where
    D: Deserializer<'de>,
{
    StoredContent::deserialize(deserializer).map(StoredContent::into_blocks)
}
