//! Content fingerprints using blake3.
//!
//! A fingerprint is the leading hex digits of a full-content digest. It exists
//! for cache busting only and makes no integrity promise.

use std::io::{self, BufReader, Read};

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hash an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Hash everything a reader yields (streaming, for large files).
    pub fn from_reader(reader: impl Read) -> io::Result<Self> {
        let mut reader = BufReader::with_capacity(64 * 1024, reader);
        let mut hasher = blake3::Hasher::new();
        let mut buffer = [0u8; 64 * 1024];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(Self(*hasher.finalize().as_bytes()))
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// First `len` hex characters of the digest.
    pub fn short(self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len);
        hex
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short(12))
    }
}

/// Insert a fingerprint between a path's stem and extension.
///
/// `css/img/window.png` + `acae32e4532b` -> `css/img/window.acae32e4532b.png`.
/// Leading dots belong to the stem, so `.hidden` becomes `.hidden.<fp>`.
pub fn splice_fingerprint(path: &str, fingerprint: &str) -> String {
    let (dir, file) = match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    };

    let stem_start = file.len() - file.trim_start_matches('.').len();
    let (stem, ext) = match file[stem_start..].rfind('.') {
        Some(idx) => file.split_at(stem_start + idx),
        None => (file, ""),
    };

    format!("{dir}{stem}.{fingerprint}{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_bytes_same_fingerprint() {
        let a = Fingerprint::from_bytes(b"body { color: red; }");
        let b = Fingerprint::from_reader(&b"body { color: red; }"[..]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_byte_change_changes_fingerprint() {
        let a = Fingerprint::from_bytes(b"body { color: red; }");
        let b = Fingerprint::from_bytes(b"body { color: red; } ");
        assert_ne!(a.short(12), b.short(12));
    }

    #[test]
    fn test_short_length() {
        let fp = Fingerprint::from_bytes(b"");
        assert_eq!(fp.short(12).len(), 12);
        assert_eq!(fp.short(64), fp.to_hex());
        assert_eq!(format!("{fp}"), fp.short(12));
        assert!(fp.short(12).chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_large_input_streams() {
        let data = vec![7u8; 200 * 1024];
        let streamed = Fingerprint::from_reader(&data[..]).unwrap();
        assert_eq!(streamed, Fingerprint::from_bytes(&data));
    }

    #[test]
    fn test_splice_fingerprint() {
        assert_eq!(splice_fingerprint("styles.css", "abc"), "styles.abc.css");
        assert_eq!(
            splice_fingerprint("css/img/window.png", "acae32e4532b"),
            "css/img/window.acae32e4532b.png"
        );
        assert_eq!(splice_fingerprint("LICENSE", "abc"), "LICENSE.abc");
        assert_eq!(splice_fingerprint("a/.hidden", "abc"), "a/.hidden.abc");
        assert_eq!(splice_fingerprint("lib.min.js", "abc"), "lib.min.abc.js");
        assert_eq!(splice_fingerprint("v1.2/app", "abc"), "v1.2/app.abc");
    }
}
