//! Post-processing pipeline: fingerprint every asset and rewrite references.
//!
//! # Flow
//!
//! ```text
//! post_process(assets)
//!   ├── clear in-memory cache, build processor set
//!   ├── for each asset (deepest directories first):
//!   │     ├── hash original bytes          → own hashed name
//!   │     ├── processor matches?           → rewrite, replace destination file
//!   │     └── otherwise                    → copy unless already present
//!   └── persist { name → hashed name } in one write
//! ```
//!
//! An asset's own fingerprint is always taken from its original bytes, so
//! rewriting never changes it, and references to assets not visited yet are
//! hashed on demand. Visiting order is therefore only a scheduling choice.

use std::collections::BTreeMap;
use std::io::{self, Read};

use crate::cache::cache_key;
use crate::debug;
use crate::error::{Result, StampError};
use crate::processor::ProcessorSet;
use crate::storage::{AssetStore, HashedStorage};


/// Where the original bytes of one logical name come from.
pub struct SourceAsset<'a> {
    pub store: &'a dyn AssetStore,
    /// Physical path inside `store`; processors are selected by it.
    pub path: String,
}

impl<'a> SourceAsset<'a> {
    pub fn new(store: &'a dyn AssetStore, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }
}

/// Outcome for one asset of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedAsset {
    pub name: String,
    pub hashed_name: String,
    /// `false` when nothing was written (unprocessed and already present).
    pub processed: bool,
}

/// Names grouped by outcome.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostProcessStats {
    pub processed: Vec<String>,
    pub unmodified: Vec<String>,
}

impl PostProcessStats {
    pub fn from_results(results: &[ProcessedAsset]) -> Self {
        let (processed, unmodified): (Vec<_>, Vec<_>) =
            results.iter().partition(|asset| asset.processed);
        Self {
            processed: processed.into_iter().map(|a| a.name.clone()).collect(),
            unmodified: unmodified.into_iter().map(|a| a.name.clone()).collect(),
        }
    }
}

impl<S: AssetStore> HashedStorage<S> {
    /// Fingerprint and publish every asset in `assets` (logical name → source).
    ///
    /// `on_asset` sees each result as soon as that asset is done. A dry run
    /// does nothing. On failure the cache document is left as it was.
    pub fn post_process(
        &mut self,
        assets: &BTreeMap<String, SourceAsset<'_>>,
        dry_run: bool,
        mut on_asset: impl FnMut(&ProcessedAsset),
    ) -> Result<Vec<ProcessedAsset>> {
        if dry_run {
            return Ok(Vec::new());
        }

        self.cache.clear();
        let processors = ProcessorSet::from_config(&self.config)?;

        self.defer_cache_writes = true;
        let outcome = visit_order(assets)
            .into_iter()
            .map(|(name, source)| {
                let asset = self.process_asset(name, source, &processors)?;
                debug!("stamp"; "{} -> {}", asset.name, asset.hashed_name);
                on_asset(&asset);
                Ok(asset)
            })
            .collect::<Result<Vec<_>>>();
        self.defer_cache_writes = false;
        let results = outcome?;

        self.cache.set_many(
            results
                .iter()
                .map(|asset| (cache_key(&asset.name), asset.hashed_name.clone())),
        )?;
        Ok(results)
    }

    fn process_asset(
        &mut self,
        name: &str,
        source: &SourceAsset<'_>,
        processors: &ProcessorSet,
    ) -> Result<ProcessedAsset> {
        let original = read_source(source)?;

        // Own fingerprint comes from the unprocessed bytes
        let mut hashed_name = self.hashed_name(name, Some(&mut original.as_slice()))?;
        let hashed_exists = self.store.exists(&hashed_name);
        let mut processed = false;

        if let Some(processor) = processors.select(&source.path) {
            let content = String::from_utf8(original)
                .map_err(|e| StampError::io(&source.path, io::Error::new(io::ErrorKind::InvalidData, e)))?;
            let content = processor.rewrite(self, name, &content)?;

            if hashed_exists {
                self.store
                    .delete(&hashed_name)
                    .map_err(|e| StampError::io(&hashed_name, e))?;
            }
            hashed_name = self.save(&hashed_name, content.as_bytes())?;
            processed = true;
        } else if !hashed_exists {
            hashed_name = self.save(&hashed_name, &original)?;
            processed = true;
        }

        Ok(ProcessedAsset {
            name: name.to_string(),
            hashed_name,
            processed,
        })
    }

    fn save(&self, name: &str, mut content: &[u8]) -> Result<String> {
        let saved = self
            .store
            .save(name, &mut content)
            .map_err(|e| StampError::io(name, e))?;
        Ok(saved.replace('\\', "/"))
    }
}

/// Deepest directories first, then by name.
fn visit_order<'m, 'a>(
    assets: &'m BTreeMap<String, SourceAsset<'a>>,
) -> Vec<(&'m str, &'m SourceAsset<'a>)> {
    let mut ordered: Vec<_> = assets.iter().map(|(k, v)| (k.as_str(), v)).collect();
    ordered.sort_by_key(|(name, _)| std::cmp::Reverse(name.split('/').count()));
    ordered
}

/// Read a source fully; the handle is closed before returning.
fn read_source(source: &SourceAsset<'_>) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    source
        .store
        .open(&source.path)
        .and_then(|mut reader| reader.read_to_end(&mut bytes))
        .map_err(|e| StampError::io(&source.path, e))?;
    Ok(bytes)
}
