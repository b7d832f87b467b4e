//! Content rewriters that point asset references at fingerprinted names.
//!
//! # Module Structure
//!
//! ```text
//! processor/
//! ├── css       # url(...) and @import "..."
//! ├── js        # configurable call pattern, STATIC.url('...') by default
//! ├── glob      # filename patterns selecting a processor
//! └── relative  # reference -> hashed URL resolution
//! ```

mod css;
mod glob;
mod js;
mod relative;

pub use css::CssProcessor;
pub use glob::Glob;
pub use js::JsProcessor;
pub use relative::resolve_reference;

use regex::{Captures, Regex};

use crate::config::{ProcessorKind, StampConfig};
use crate::error::Result;
use crate::storage::{AssetStore, HashedStorage};

/// A content rewriter bound to a filename pattern.
#[derive(Debug, Clone)]
pub enum Processor {
    Js(JsProcessor),
    Css(CssProcessor),
}

impl Processor {
    pub fn new(kind: ProcessorKind, config: &StampConfig) -> Result<Self> {
        Ok(match kind {
            ProcessorKind::Js => Self::Js(JsProcessor::new(&config.js_files, &config.js_pattern)?),
            ProcessorKind::Css => Self::Css(CssProcessor::new(&config.css_files)?),
        })
    }

    pub fn glob(&self) -> &Glob {
        match self {
            Self::Js(p) => &p.glob,
            Self::Css(p) => &p.glob,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.glob().is_match(path)
    }

    /// Rewrite every reference in `content`, which belongs to the asset `name`.
    pub fn rewrite<S: AssetStore>(
        &self,
        storage: &mut HashedStorage<S>,
        name: &str,
        content: &str,
    ) -> Result<String> {
        match self {
            Self::Js(p) => p.rewrite(storage, name, content),
            Self::Css(p) => p.rewrite(storage, name, content),
        }
    }
}

/// Enabled processors, most specific pattern first.
#[derive(Debug, Clone, Default)]
pub struct ProcessorSet(Vec<Processor>);

impl ProcessorSet {
    pub fn from_config(config: &StampConfig) -> Result<Self> {
        let mut processors = config
            .processors
            .iter()
            .map(|&kind| Processor::new(kind, config))
            .collect::<Result<Vec<_>>>()?;
        // Longer pattern = more specific; stable sort keeps config order on ties
        processors.sort_by_key(|p| std::cmp::Reverse(p.glob().as_str().len()));
        Ok(Self(processors))
    }

    /// First processor whose pattern matches the physical `path`.
    pub fn select(&self, path: &str) -> Option<&Processor> {
        self.0.iter().find(|p| p.matches(path))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `Regex::replace_all` with a replacer that may fail.
fn try_replace_all(
    re: &Regex,
    text: &str,
    mut replace: impl FnMut(&Captures<'_>) -> Result<String>,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replace(&caps)?);
        last = whole.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_selects_by_extension() {
        let set = ProcessorSet::from_config(&StampConfig::default()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(matches!(set.select("/srv/static/css/window.css"), Some(Processor::Css(_))));
        assert!(matches!(set.select("app.js"), Some(Processor::Js(_))));
        assert!(set.select("img/window.png").is_none());
    }

    #[test]
    fn test_more_specific_pattern_first() {
        let config = StampConfig {
            processors: vec![ProcessorKind::Js, ProcessorKind::Css],
            ..StampConfig::default()
        };
        let set = ProcessorSet::from_config(&config).unwrap();
        // "*.css" is longer than "*.js"
        assert!(matches!(set.0[0], Processor::Css(_)));
    }

    #[test]
    fn test_configured_file_patterns() {
        let config = StampConfig {
            css_files: "[!_]*.css".into(),
            js_files: "js/app?.js".into(),
            ..StampConfig::default()
        };
        let set = ProcessorSet::from_config(&config).unwrap();
        // "js/app?.js" is now the longer pattern
        assert!(matches!(set.0[0], Processor::Js(_)));

        assert!(matches!(set.select("site.css"), Some(Processor::Css(_))));
        assert!(set.select("_partial.css").is_none());
        assert!(matches!(set.select("js/app1.js"), Some(Processor::Js(_))));
        assert!(set.select("js/app.js").is_none());
        assert!(set.select("vendor/lib.js").is_none());
    }

    #[test]
    fn test_empty_set() {
        let config = StampConfig {
            processors: vec![],
            ..StampConfig::default()
        };
        let set = ProcessorSet::from_config(&config).unwrap();
        assert!(set.is_empty());
        assert!(set.select("a.css").is_none());
    }

    #[test]
    fn test_try_replace_all() {
        let re = Regex::new(r"\d+").unwrap();
        let out = try_replace_all(&re, "a1b22c", |caps| Ok(format!("<{}>", &caps[0]))).unwrap();
        assert_eq!(out, "a<1>b<22>c");

        let err = try_replace_all(&re, "a1", |_| {
            Err(crate::error::StampError::not_found("x"))
        });
        assert!(err.is_err());
    }
}
