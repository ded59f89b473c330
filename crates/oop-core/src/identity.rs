//! Document identity: content hash of the normalized text.
//!
//! A 128-bit BLAKE3 output rendered as 32 lowercase hex characters. Used as
//! a correlation key across the artifacts of one run, not as a security
//! primitive.
use crate::metadata::Metadata;

/// Metadata key the identity is stored under.
pub const DOC_ID_KEY: &str = "DocIDAnnotation";

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 16;

pub fn identity(text: &str) -> String {
    let mut digest = [0u8; DIGEST_LEN];
    let mut hasher = blake3::Hasher::new();
    hasher.update(text.as_bytes());
    hasher.finalize_xof().fill(&mut digest);
    hex::encode(digest)
}

/// Compute the identity of `text` and record it in `metadata`.
pub fn stamp(text: &str, metadata: &mut Metadata) -> String {
    let id = identity(text);
    metadata.set(DOC_ID_KEY, id.clone());
    id
}
