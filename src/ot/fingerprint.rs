//! Content fingerprints
//!
//! Insert identities embed a fingerprint of the inserted text rather than the
//! text itself. The hashing primitive sits behind [`ContentHasher`] so peers
//! that fingerprint differently can plug in their own.

/// Produces a deterministic digest of a text payload
pub trait ContentHasher {
    /// Fingerprint `text`. Must be a pure function of its input.
    fn fingerprint(&self, text: &str) -> String;
}

/// Default hasher: lowercase hex blake3 digest of the UTF-8 bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl ContentHasher for Blake3Hasher {
    fn fingerprint(&self, text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }
}
