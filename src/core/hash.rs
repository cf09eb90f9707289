//! Hashing Primitives
//!
//! SHA-256 wrappers used for:
//! - Whitelist leaves and Merkle nodes
//! - Commit-reveal digests
//! - Sale state hashing for replay comparison

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes).
pub type Digest32 = [u8; 32];

/// The all-zero digest. Never a valid Merkle root.
pub const ZERO_DIGEST: Digest32 = [0u8; 32];

/// Incremental hasher with a domain separator.
///
/// Wraps SHA-256 with helpers for the integer widths used in the sale.
/// Order of updates is part of the digest, callers must keep it fixed.
pub struct DigestHasher {
    hasher: Sha256,
}

impl DigestHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for sale state snapshots.
    pub fn for_sale_state() -> Self {
        Self::new(b"MINT_GATE_STATE_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u64 value (big-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_be_bytes());
    }

    /// Update with a u128 value (big-endian).
    #[inline]
    pub fn update_u128(&mut self, value: u128) {
        self.hasher.update(value.to_be_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> Digest32 {
        self.hasher.finalize().into()
    }
}

/// Compute hash with domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

/// Short hex prefix of a digest, for log lines.
pub fn short_hex(digest: &Digest32) -> String {
    hex::encode(&digest[..4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_state_domain_is_distinct() {
        let domain_only = DigestHasher::for_sale_state().finalize();
        assert_eq!(domain_only, hash_with_domain(b"MINT_GATE_STATE_V1", &[]));
        assert_ne!(domain_only, hash_with_domain(b"MINT_GATE_WHITELIST_EMPTY_V1", &[]));
    }

    #[test]
    fn test_integer_width_is_hashed() {
        // A u64 and a u128 with the same value must not collide
        let narrow = {
            let mut h = DigestHasher::for_sale_state();
            h.update_u64(7);
            h.finalize()
        };
        let wide = {
            let mut h = DigestHasher::for_sale_state();
            h.update_u128(7);
            h.finalize()
        };
        assert_ne!(narrow, wide);
    }

    #[test]
    fn test_bool_matches_byte_encoding() {
        let mut a = DigestHasher::for_sale_state();
        a.update_bool(true);
        let mut b = DigestHasher::for_sale_state();
        b.update_u8(1);
        assert_eq!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_short_hex() {
        let mut digest = ZERO_DIGEST;
        digest[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(short_hex(&digest), "deadbeef");
    }
}
