//! Stamp - content-hash fingerprinting for static assets.
//!
//! Every asset is published under a name carrying a digest of its bytes
//! (`css/window.css` -> `css/window.0f1e2d3c4b5a.css`), and references
//! inside CSS and JavaScript are rewritten to point at those names.
//!
//! ```no_run
//! use stamp::{FileSystemStore, HashedStorage, StampConfig};
//!
//! let config = StampConfig::default();
//! let store = FileSystemStore::new("public/static", &config.base_url);
//! let mut storage = HashedStorage::new(store, config)?;
//! let url = storage.url("css/window.css", false)?;
//! # Ok::<(), stamp::StampError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod hash;
pub mod logger;
pub mod pipeline;
pub mod processor;
pub mod storage;
pub mod utils;

pub use cache::{PersistentCache, cache_key};
pub use config::StampConfig;
pub use error::{Result, StampError};
pub use pipeline::{PostProcessStats, ProcessedAsset, SourceAsset};
pub use storage::{AssetStore, FileSystemStore, HashedStorage};
