//! Batch migration command implementation

use super::read_stored;
use anyhow::{bail, Context, Result};
use examdesk_core::types::Block;
use examdesk_core::{decode_blocks, encode_document, parse_markup};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Batch migrate stored documents to the current block format
pub fn batch(input_dir: &str, output_dir: &str, jobs: usize) -> Result<()> {
    let input_path = Path::new(input_dir);
    let output_path = Path::new(output_dir);

    fs::create_dir_all(output_path)?;

    let files: Vec<_> = fs::read_dir(input_path)
        .with_context(|| format!("Failed to read directory: {}", input_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();

    if files.is_empty() {
        println!("No stored documents found in {}", input_dir);
        return Ok(());
    }

    println!("Found {} documents to migrate", files.len());

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    // Configure thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .ok(); // Ignore if already configured

    files.par_iter().for_each(|file_path| {
        match process_file(file_path, output_path) {
            Ok(_) => {
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Failed to migrate {:?}: {}", file_path, e);
            }
        }

        overall_pb.inc(1);
    });

    overall_pb.finish();

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    println!("\nBatch migration complete:");
    println!("  Success: {}", success);
    println!("  Errors:  {}", errors);

    if errors > 0 {
        bail!("Batch migration completed with {} errors", errors);
    }

    Ok(())
}

/// Rewrite a document the way an editing session would save it
///
/// Legacy flat list items become nested lists and raw HTML becomes blocks.
pub(crate) fn migrate(blocks: &[Block]) -> Vec<Block> {
    encode_document(&parse_markup(&decode_blocks(blocks)))
}

fn process_file(input_path: &Path, output_dir: &Path) -> Result<()> {
    let blocks = read_stored(input_path)?;
    let migrated = migrate(&blocks);

    let name = input_path
        .file_name()
        .context("Could not determine output filename from input")?;
    let output_file = output_dir.join(name);
    fs::write(&output_file, serde_json::to_string_pretty(&migrated)?)?;

    tracing::info!("Migrated {:?} -> {:?}", input_path, output_file);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use examdesk_core::types::{ListingKind, TextBlock, TextSpan, TextTag};

    #[test]
    fn test_migrate_groups_legacy_items() {
        let item = |text: &str| {
            Block::Text(
                TextBlock::new(TextTag::P, vec![TextSpan::new(text)])
                    .with_listing(ListingKind::Ordered),
            )
        };
        let migrated = migrate(&[item("one"), item("two")]);
        assert_eq!(migrated.len(), 1);
        match &migrated[0] {
            Block::List(list) => {
                assert!(list.ordered);
                assert_eq!(list.children.len(), 2);
            }
            other => panic!("expected a list, got {:?}", other),
        }
    }
}
