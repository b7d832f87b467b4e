//! JavaScript rewriting through a configurable call pattern.

use regex::Regex;

use crate::error::{Result, StampError};
use crate::storage::{AssetStore, HashedStorage};

use super::{Glob, relative::resolve_reference, try_replace_all};

#[derive(Debug, Clone)]
pub struct JsProcessor {
    pub(super) glob: Glob,
    pattern: Regex,
}

impl JsProcessor {
    /// `files` selects the scripts to rewrite; `pattern` must capture the
    /// referenced URL in a group named `content`.
    pub fn new(files: &str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| StampError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            glob: Glob::new(files)?,
            pattern: regex,
        })
    }

    /// Replace each captured URL with its hashed form.
    ///
    /// A URL the pattern matched inside a pair of quotes is re-emitted
    /// double-quoted; any other delimiter is left untouched.
    pub fn rewrite<S: AssetStore>(
        &self,
        storage: &mut HashedStorage<S>,
        name: &str,
        content: &str,
    ) -> Result<String> {
        try_replace_all(&self.pattern, content, |caps| {
            let (Some(whole), Some(url)) = (caps.get(0), caps.name("content")) else {
                return Ok(caps[0].to_string());
            };
            let before = &content[whole.start()..url.start()];
            let after = &content[url.end()..whole.end()];
            let resolved = resolve_reference(storage, name, url.as_str())?;

            match (before.strip_suffix(is_quote), after.strip_prefix(is_quote)) {
                (Some(before), Some(after)) => Ok(format!("{before}\"{resolved}\"{after}")),
                _ => Ok(format!("{before}{resolved}{after}")),
            }
        })
    }
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}
