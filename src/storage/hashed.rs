//! Fingerprinting store: hashed names and cache-or-compute URL lookups.
//!
//! # Resolution
//!
//! ```text
//! url("css/a.css#x")
//!   ├── split fragment        → "css/a.css", "x"
//!   ├── cache hit?            → "css/a.<fp>.css"
//!   ├── miss: hashed_name()   → fingerprint content, write back to cache
//!   ├── base url              → "/static/css/a.<fp>.css"
//!   └── re-append fragment    → "/static/css/a.<fp>.css#x"
//! ```

use std::io::Read;

use crate::cache::{PersistentCache, cache_key};
use crate::config::StampConfig;
use crate::error::{Result, StampError};
use crate::hash::{Fingerprint, splice_fingerprint};
use crate::utils::url::{UrlParts, decode, split_fragment};

use super::AssetStore;

/// CSS "bulletproof @font-face" marker, as in `font.eot?#iefix`.
const EMPTY_QUERY_HACK: &str = "?#";

/// Asset store wrapper that serves every name under its fingerprinted form.
#[derive(Debug)]
pub struct HashedStorage<S> {
    pub(crate) store: S,
    pub(crate) cache: PersistentCache,
    pub(crate) config: StampConfig,
    /// Inside a pipeline run, cache misses stay in memory until the final bulk write.
    pub(crate) defer_cache_writes: bool,
    resolving: ResolutionStack,
}

impl<S: AssetStore> HashedStorage<S> {
    /// Wrap `store`, loading the cache document named by `config`.
    ///
    /// Fails with [`StampError::Config`] when `config` does not validate.
    pub fn new(store: S, config: StampConfig) -> Result<Self> {
        config.validate()?;
        let cache = PersistentCache::open(&config.cache_file);
        Ok(Self::from_parts(store, config, cache))
    }

    /// Like [`HashedStorage::new`], with an already opened cache.
    pub fn with_cache(store: S, config: StampConfig, cache: PersistentCache) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(store, config, cache))
    }

    fn from_parts(store: S, config: StampConfig, cache: PersistentCache) -> Self {
        Self {
            store,
            cache,
            config,
            defer_cache_writes: false,
            resolving: ResolutionStack::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    pub fn cache(&self) -> &PersistentCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut PersistentCache {
        &mut self.cache
    }

    /// Derive the fingerprinted name for `name`.
    ///
    /// Without `content`, the bytes are read from the store: a name the store
    /// does not know fails with [`StampError::ReferenceNotFound`], while a
    /// name that exists but cannot be opened (a directory) comes back as is.
    /// Query and fragment are carried through untouched.
    pub fn hashed_name(&self, name: &str, content: Option<&mut dyn Read>) -> Result<String> {
        let parsed = UrlParts::split(&decode(name));
        let clean_name = parsed.path.trim();

        let fingerprint = match content {
            Some(reader) => Fingerprint::from_reader(reader),
            None => {
                if !self.store.exists(clean_name) {
                    return Err(StampError::not_found(clean_name));
                }
                let Ok(reader) = self.store.open(clean_name) else {
                    return Ok(name.to_string());
                };
                Fingerprint::from_reader(reader)
            }
        }
        .map_err(|e| StampError::io(clean_name, e))?;

        let mut hashed = UrlParts {
            path: splice_fingerprint(
                clean_name,
                &fingerprint.short(self.config.fingerprint_len),
            ),
            ..parsed
        };
        if name.contains(EMPTY_QUERY_HACK) && hashed.query.is_empty() {
            hashed.path.push('?');
        }
        Ok(hashed.join())
    }

    /// Served URL for `name`, fingerprinted unless in debug passthrough.
    ///
    /// `force` resolves even in debug mode. Cache misses are computed and
    /// written back, so lookups self-heal after a cache clear.
    pub fn url(&mut self, name: &str, force: bool) -> Result<String> {
        let (hashed_name, fragment) = if self.config.debug && !force {
            (name.to_string(), None)
        } else {
            let (clean_name, fragment) = split_fragment(name);
            let hashed_name = if UrlParts::split(clean_name).path.ends_with('/') {
                // Directories are never hashed
                name.to_string()
            } else {
                self.cached_or_hashed(clean_name)?
            };
            (hashed_name, fragment)
        };

        let mut final_url = self.store.url(&hashed_name);

        let empty_query = name.contains(EMPTY_QUERY_HACK);
        if fragment.is_some() || empty_query {
            let mut parts = UrlParts::split(&final_url);
            if let Some(fragment) = fragment
                && parts.fragment.is_empty()
            {
                parts.fragment = fragment.to_string();
            }
            if empty_query && parts.query.is_empty() {
                parts.path.push('?');
            }
            final_url = parts.join();
        }

        Ok(decode(&final_url))
    }

    fn cached_or_hashed(&mut self, clean_name: &str) -> Result<String> {
        let key = cache_key(clean_name);
        if let Some(hashed) = self.cache.get(&key) {
            return Ok(hashed.to_string());
        }

        self.resolving.enter(clean_name)?;
        let hashed = self.hashed_name(clean_name, None);
        self.resolving.leave();

        let hashed = hashed?.replace('\\', "/");
        if self.defer_cache_writes {
            self.cache.insert(key, hashed.clone());
        } else {
            self.cache.set(key, hashed.clone())?;
        }
        Ok(hashed)
    }
}

/// Names whose resolution is in progress, outermost first.
///
/// Hashing reads raw bytes and never resolves references, so mutually
/// referencing assets do not re-enter and the stack holds at most one name
/// today. Re-entry only becomes possible if hashing ever depends on
/// rewritten content.
#[derive(Debug, Default)]
struct ResolutionStack(Vec<String>);

impl ResolutionStack {
    fn enter(&mut self, name: &str) -> Result<()> {
        if self.0.iter().any(|n| n == name) {
            let mut chain = self.0.clone();
            chain.push(name.to_string());
            return Err(StampError::CyclicReference { chain });
        }
        self.0.push(name.to_string());
        Ok(())
    }

    fn leave(&mut self) {
        self.0.pop();
    }
}
