//! URL-like reference handling.
//!
//! References found in asset content are relative URLs, so only the
//! `path[?query][#fragment]` shape matters here; scheme and host are never
//! split off. Internally every string is kept decoded (human-readable).

use percent_encoding::percent_decode_str;

/// A reference split into path, query and fragment.
///
/// An empty `query`/`fragment` is omitted when joining, so `a.css?#x`
/// round-trips to `a.css#x`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlParts {
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl UrlParts {
    /// Split at the first `#`, then at the first `?` before it.
    pub fn split(url: &str) -> Self {
        let (rest, fragment) = split_fragment(url);
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self {
            path: path.to_string(),
            query: query.to_string(),
            fragment: fragment.unwrap_or_default().to_string(),
        }
    }

    pub fn join(&self) -> String {
        let mut url = self.path.clone();
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            url.push('#');
            url.push_str(&self.fragment);
        }
        url
    }
}

/// Split a URL into the part before the first `#` and the fragment after it.
///
/// # Examples
/// ```
/// use stamp::utils::url::split_fragment;
/// assert_eq!(split_fragment("a.css#eggs"), ("a.css", Some("eggs")));
/// assert_eq!(split_fragment("a.css"), ("a.css", None));
/// ```
#[inline]
pub fn split_fragment(url: &str) -> (&str, Option<&str>) {
    match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    }
}

/// Index where the path of `url` ends (first `?` or `#`).
#[inline]
pub fn path_end(url: &str) -> usize {
    url.find(['?', '#']).unwrap_or(url.len())
}

/// Decode percent-escapes, keeping the input when it is not valid UTF-8.
pub fn decode(s: &str) -> String {
    percent_decode_str(s)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// Path component of a base URL.
///
/// Uses the `url` crate, so auth info, ports and queries never leak into the
/// prefix. A bare path such as `/static/` does not parse and is returned as is.
///
/// # Examples
/// ```
/// use stamp::utils::url::base_path;
/// assert_eq!(base_path("https://cdn.example.com:8080/static/"), "/static/");
/// assert_eq!(base_path("/static/"), "/static/");
/// ```
pub fn base_path(base_url: &str) -> String {
    match url::Url::parse(base_url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => base_url.to_string(),
    }
}

/// Normalize a slash path the POSIX way.
///
/// Collapses `.`, duplicate slashes and `..` (where a parent exists). Leading
/// `..` segments of relative paths are kept; `..` above the root is dropped.
/// An empty result is `.`.
///
/// # Examples
/// ```
/// use stamp::utils::url::normalize_posix;
/// assert_eq!(normalize_posix("..///styles.css"), "../styles.css");
/// assert_eq!(normalize_posix("./img/../x.png"), "x.png");
/// assert_eq!(normalize_posix("/a/../../b"), "/b");
/// ```
pub fn normalize_posix(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                None if absolute => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
