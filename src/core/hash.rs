//! Hashing Primitives
//!
//! Provides the digests the predicates are built from:
//! - SHA-256 and double SHA-256 (txids, signing hashes)
//! - HASH160 = RIPEMD-160(SHA-256(x)) for key hashes and commitments
//! - A domain-separated incremental hasher for signing hashes

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// 256-bit digest.
pub type Hash256 = [u8; 32];

/// 160-bit composite digest (RIPEMD-160 over SHA-256).
pub type Hash160 = [u8; 20];

/// Deterministic incremental hasher.
///
/// Wraps SHA-256 with fixed-width integer helpers.
/// Order of updates is part of the digest.
pub struct DigestWriter {
    hasher: Sha256,
}

impl DigestWriter {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for transaction signing hashes.
    pub fn for_signing_hash() -> Self {
        Self::new(b"PREDICATES_SIGHASH_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with length-prefixed bytes.
    ///
    /// Prevents two adjacent variable-length fields from colliding.
    #[inline]
    pub fn update_var_bytes(&mut self, bytes: &[u8]) {
        self.update_u64(bytes.len() as u64);
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Finalize with a second SHA-256 pass.
    pub fn finalize_double(self) -> Hash256 {
        let first = self.hasher.finalize();
        Sha256::digest(first).into()
    }
}

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> Hash256 {
    Sha256::digest(data).into()
}

/// SHA-256 applied twice.
pub fn sha256d(data: &[u8]) -> Hash256 {
    sha256(&sha256(data))
}

/// HASH160 = RIPEMD160(SHA256(data)).
pub fn hash160(data: &[u8]) -> Hash160 {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash160_known_vector() {
        // HASH160 of the empty string.
        assert_eq!(
            hex::encode(hash160(b"")),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_writer_order_matters() {
        let hash1 = {
            let mut h = DigestWriter::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize_double()
        };

        let hash2 = {
            let mut h = DigestWriter::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize_double()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_var_bytes_prevent_boundary_shift() {
        let hash1 = {
            let mut h = DigestWriter::for_signing_hash();
            h.update_var_bytes(b"ab");
            h.update_var_bytes(b"c");
            h.finalize_double()
        };

        let hash2 = {
            let mut h = DigestWriter::for_signing_hash();
            h.update_var_bytes(b"a");
            h.update_var_bytes(b"bc");
            h.finalize_double()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let mut a = DigestWriter::new(b"DOMAIN_A");
        a.update_bytes(&[1, 2, 3, 4]);
        let mut b = DigestWriter::new(b"DOMAIN_B");
        b.update_bytes(&[1, 2, 3, 4]);

        assert_ne!(a.finalize_double(), b.finalize_double());
    }
}
