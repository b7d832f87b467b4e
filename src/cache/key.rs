//! Cache keys derived from logical names.

/// Prefix marking entries written by this crate.
const KEY_PREFIX: &str = "stamp:";

/// Hex digits of the name digest kept in a key.
const KEY_DIGEST_LEN: usize = 32;

/// Compute the cache key for a logical name.
///
/// The key depends on the name only (never on content), has a fixed length
/// and is plain ASCII, so it fits any external key-length or charset limit.
pub fn cache_key(name: &str) -> String {
    let digest = blake3::hash(name.as_bytes());
    format!("{KEY_PREFIX}{}", &digest.to_hex()[..KEY_DIGEST_LEN])
}
