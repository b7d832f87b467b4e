//! `stamp collect`: copy a static tree, then fingerprint it in place.
//!
//! Phases:
//! - **Discover** - walk SOURCE for regular files
//! - **Copy** - originals land in DEST under their logical names
//! - **Post-process** - hashed copies and rewritten references in DEST

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;

use stamp::{
    FileSystemStore, HashedStorage, PostProcessStats, SourceAsset, StampConfig, debug, log, logger,
};

/// Files never published.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

pub fn collect(config: StampConfig, source: &Path, output: &Path, dry_run: bool) -> Result<()> {
    let files = discover(source)
        .with_context(|| format!("failed to read source directory {}", source.display()))?;
    log!("stamp"; "found {}", plural_count(files.len(), "file"));

    if dry_run {
        for name in files.keys() {
            log!("stamp"; "would collect '{}'", name);
        }
        return Ok(());
    }

    for (name, path) in &files {
        copy_original(path, &output.join(name))?;
    }
    debug!("stamp"; "copied originals into {}", output.display());

    let source_store = FileSystemStore::new(source, &config.base_url);
    let assets: BTreeMap<String, SourceAsset<'_>> = files
        .keys()
        .map(|name| (name.clone(), SourceAsset::new(&source_store, name.clone())))
        .collect();

    let dest = FileSystemStore::new(output, &config.base_url);
    let mut storage = HashedStorage::new(dest, config)?;
    let results = storage
        .post_process(&assets, false, |asset| {
            if asset.processed {
                log!("stamp"; "post-processed '{}' as '{}'", asset.name, asset.hashed_name);
            }
        })
        .context("post-processing failed")?;

    let stats = PostProcessStats::from_results(&results);
    logger::success(&format!(
        "{} post-processed, {} unmodified",
        plural_count(stats.processed.len(), "file"),
        stats.unmodified.len()
    ));
    Ok(())
}

/// Logical name (slash separated, relative to `root`) → physical path.
fn discover(root: &Path) -> Result<BTreeMap<String, PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("not a directory");
    }

    let files = WalkDir::new(root)
        .sort(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .filter_map(|e| {
            let path = e.path();
            let name = logical_name(root, &path)?;
            Some((name, path))
        })
        .collect();
    Ok(files)
}

fn logical_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

fn copy_original(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::copy(from, to).with_context(|| format!("failed to copy {}", from.display()))?;
    Ok(())
}

fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}
