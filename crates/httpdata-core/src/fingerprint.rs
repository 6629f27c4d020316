//! Content fingerprint of a response: SHA-1 over the body, then over each
//! joined header value in transport order. Rendered as lowercase hex.
//!
//! This is a convenience identifier for identical content, not a cache key.

use sha1::{Digest, Sha1};

/// Compute the fingerprint of `body` followed by `header_values`.
///
/// Each item of `header_values` is the `", "`-joined value string of one
/// header name; names themselves are not hashed.
pub fn content_id<'a>(body: &[u8], header_values: impl IntoIterator<Item = &'a [u8]>) -> String {
    let mut hasher = Sha1::new();
    hasher.update(body);
    for value in header_values {
        hasher.update(value);
    }
    hex::encode(hasher.finalize())
}
