//! Image deduplication by content key.
//!
//! The key is an MD5 digest over the first [`KEY_PREFIX_LEN`] bytes of
//! the encoded payload — a cheap fingerprint, not a full-file hash and
//! not a perceptual hash. Re-encoded near-duplicates hash differently
//! and are kept; two distinct images sharing a byte prefix collide and
//! are merged. Both are accepted trade-offs for speed.

use std::collections::HashSet;

use md5::{Digest, Md5};

use crate::model::{ContentKey, ImageAsset};

/// Number of leading payload bytes fed into the content key.
pub const KEY_PREFIX_LEN: usize = 1000;

/// Compute the content key for an encoded image payload.
pub fn content_key(data: &[u8]) -> ContentKey {
    let prefix_len = data.len().min(KEY_PREFIX_LEN);
    let mut hasher = Md5::new();
    hasher.update(&data[..prefix_len]);
    hasher.finalize().into()
}

/// Remove duplicate assets, preserving first-seen order.
///
/// An asset is kept only when its content key has not been seen earlier
/// in this conversion.
pub fn dedup(assets: Vec<ImageAsset>) -> Vec<ImageAsset> {
    let mut seen: HashSet<ContentKey> = HashSet::with_capacity(assets.len());
    assets
        .into_iter()
        .filter(|asset| seen.insert(asset.content_key))
        .collect()
}
