//! Command-line interface module.

mod args;
pub mod collect;

pub use args::{Cli, Commands};

use anyhow::{Context, Result};
use std::{fs, io, path::Path};

use stamp::{FileSystemStore, HashedStorage, StampConfig, log};

/// `stamp url`: cache-or-compute lookup for one name.
pub fn print_url(config: StampConfig, name: &str, root: &Path, force: bool) -> Result<()> {
    let store = FileSystemStore::new(root, &config.base_url);
    let mut storage = HashedStorage::new(store, config)?;
    let url = storage
        .url(name, force)
        .with_context(|| format!("failed to resolve `{name}`"))?;
    println!("{url}");
    Ok(())
}

/// `stamp clear-cache`: remove the cache document.
pub fn clear_cache(config: &StampConfig) -> Result<()> {
    let path = &config.cache_file;
    match fs::remove_file(path) {
        Ok(()) => log!("cache"; "removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log!("cache"; "nothing to remove at {}", path.display())
        }
        Err(e) => return Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
    Ok(())
}
