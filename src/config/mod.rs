//! Configuration for `stamp.toml`.
//!
//! Every component receives its settings from one [`StampConfig`] value at
//! construction; nothing reads configuration from globals.
//!
//! # Example
//!
//! ```toml
//! fingerprint_len = 12
//! cache_file = "static.json"
//! processors = ["js", "css"]
//! base_url = "/static/"
//! css_files = "*.css"
//! js_files = "*.js"
//! debug = false
//! js_pattern = '''STATIC\.url\(\s*['"](?P<content>[^'"]*?)['"]\s*\)'''
//! ```

mod error;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use util::find_config_file;

use regex::Regex;

use crate::processor::Glob;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default JS reference pattern: `STATIC.url('path')` or `STATIC.url("path")`.
///
/// Custom patterns must capture the referenced URL in a group named `content`.
pub const DEFAULT_JS_PATTERN: &str = r#"STATIC\.url\(\s*['"](?P<content>[^'"]*?)['"]\s*\)"#;

/// Files the CSS rewriter handles by default.
pub const DEFAULT_CSS_FILES: &str = "*.css";

/// Files the JavaScript rewriter handles by default.
pub const DEFAULT_JS_FILES: &str = "*.js";

/// Hex digits of a full blake3 digest.
const MAX_FINGERPRINT_LEN: usize = 64;

/// Content rewriters that can be enabled by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorKind {
    Js,
    Css,
}

/// Root configuration structure representing stamp.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    /// Number of hex characters of the content digest placed in file names.
    pub fingerprint_len: usize,

    /// JSON document persisting `cache key -> hashed name`.
    pub cache_file: PathBuf,

    /// Enabled content rewriters.
    pub processors: Vec<ProcessorKind>,

    /// Regex locating asset references inside JavaScript.
    pub js_pattern: String,

    /// Shell-style pattern (`*`, `?`, `[...]`) selecting stylesheets by path.
    pub css_files: String,

    /// Shell-style pattern selecting scripts by path.
    pub js_files: String,

    /// Serving prefix prepended to every resolved name.
    pub base_url: String,

    /// Debug passthrough: `url()` returns names unhashed unless forced.
    pub debug: bool,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            fingerprint_len: 12,
            cache_file: PathBuf::from("static.json"),
            processors: vec![ProcessorKind::Js, ProcessorKind::Css],
            js_pattern: DEFAULT_JS_PATTERN.to_string(),
            css_files: DEFAULT_CSS_FILES.to_string(),
            js_files: DEFAULT_JS_FILES.to_string(),
            base_url: "/static/".to_string(),
            debug: false,
        }
    }
}

impl StampConfig {
    /// Parse and validate configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path.
    ///
    /// Relative `cache_file` paths are resolved against the config file's directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;

        if config.cache_file.is_relative()
            && let Some(root) = path.parent()
        {
            config.cache_file = root.join(&config.cache_file);
        }
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_path(path),
            _ => Ok(Self::default()),
        }
    }

    /// Check every field, collecting all problems before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if !(1..=MAX_FINGERPRINT_LEN).contains(&self.fingerprint_len) {
            diag.error(
                "fingerprint_len",
                format!(
                    "must be between 1 and {MAX_FINGERPRINT_LEN}, got {}",
                    self.fingerprint_len
                ),
            );
        }

        if self.cache_file.as_os_str().is_empty() {
            diag.error("cache_file", "must not be empty");
        }

        match Regex::new(&self.js_pattern) {
            Ok(re) if re.capture_names().flatten().any(|n| n == "content") => {}
            Ok(_) => diag.error("js_pattern", "must define a capture group named `content`"),
            Err(err) => diag.error("js_pattern", format!("invalid regex: {err}")),
        }

        for (field, pattern) in [("css_files", &self.css_files), ("js_files", &self.js_files)] {
            if let Err(err) = Glob::new(pattern) {
                diag.error(field, err.to_string());
            }
        }

        if !self.base_url.ends_with('/') {
            diag.error("base_url", "must end with a slash");
        } else if self.base_url.contains("://")
            && let Err(err) = url::Url::parse(&self.base_url)
        {
            diag.error("base_url", format!("invalid URL: {err}"));
        }

        diag.into_result()
    }
}
