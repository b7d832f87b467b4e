//! Shell-style filename patterns (`*.css`, `vendor/*.js`, `img/?.png`).

use regex::Regex;

use crate::error::{Result, StampError};

/// A compiled filename glob.
///
/// `*` matches any run of characters (including `/`), `?` one character,
/// `[...]` a character class with `!` for negation.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&translate(pattern)).map_err(|source| StampError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Translate a glob into an anchored regex.
fn translate(pattern: &str) -> String {
    let mut out = String::from("(?s)^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let class: String = chars.by_ref().take_while(|&c| c != ']').collect();
                match class.strip_prefix('!') {
                    Some(negated) => out.push_str(&format!("[^{}]", escape_class(negated))),
                    None => out.push_str(&format!("[{}]", escape_class(&class))),
                }
            }
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    out.push('$');
    out
}

/// Escape regex metacharacters inside a class, keeping `-` ranges.
fn escape_class(class: &str) -> String {
    class
        .chars()
        .map(|c| match c {
            '\\' | '[' | ']' | '^' | '&' | '~' => format!("\\{c}"),
            _ => c.to_string(),
        })
        .collect()
}
