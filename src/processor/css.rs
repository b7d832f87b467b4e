//! CSS rewriting: `url(...)` tokens, then `@import "..."` tokens.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::storage::{AssetStore, HashedStorage};

use super::{Glob, relative::resolve_reference, try_replace_all};

#[derive(Debug, Clone)]
pub struct CssProcessor {
    pub(super) glob: Glob,
}

impl CssProcessor {
    /// `files` selects the stylesheets this processor handles.
    pub fn new(files: &str) -> Result<Self> {
        Ok(Self {
            glob: Glob::new(files)?,
        })
    }

    /// Rewrite both reference forms, re-emitting each in double-quoted form.
    pub fn rewrite<S: AssetStore>(
        &self,
        storage: &mut HashedStorage<S>,
        name: &str,
        content: &str,
    ) -> Result<String> {
        let content = try_replace_all(url_pattern(), content, |caps| {
            let url = resolve_reference(storage, name, caps["url"].trim())?;
            Ok(format!("url(\"{url}\")"))
        })?;

        try_replace_all(import_pattern(), &content, |caps| {
            let url = resolve_reference(storage, name, caps["url"].trim())?;
            Ok(format!("@import \"{url}\""))
        })
    }
}

/// `url(x)`, `url('x')`, `url("x")`
fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"url\(['"]?\s*(?P<url>.*?)["']?\)"#).unwrap())
}

/// `@import "x"`, `@import 'x'`
fn import_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"@import\s*["']\s*(?P<url>.*?)["']"#).unwrap())
}
