//! Cryptographic hashing utilities for the ledger
//!
//! Provides the SHA-256 digest used for payload hashes and the
//! proof hash / difficulty predicate used by proof of work.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Computes the proof hash for a payload hash and nonce.
///
/// The nonce is appended in its decimal form to the hex text of the
/// payload hash, and the resulting string is hashed.
pub fn proof_hash(payload_hash: &str, nonce: u64) -> String {
    sha256_hex(format!("{}{}", payload_hash, nonce).as_bytes())
}

/// Builds the target string: `prefix` repeated `difficulty` times
pub fn target(prefix: char, difficulty: usize) -> String {
    prefix.to_string().repeat(difficulty)
}

/// Checks if a hex hash meets the difficulty target
pub fn meets_target(hash: &str, target: &str) -> bool {
    hash.starts_with(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let data = b"hello world";
        let hash = sha256(data);
        assert_eq!(hash.len(), 32);
        assert_eq!(
            sha256_hex(data),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_sha256_hex_is_lowercase() {
        let hash = sha256_hex(b"");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(hash, hash.to_lowercase());
    }

    #[test]
    fn test_proof_hash_uses_decimal_nonce() {
        let payload_hash = sha256_hex(b"payload");
        assert_eq!(
            proof_hash(&payload_hash, 42),
            sha256_hex(format!("{}42", payload_hash).as_bytes())
        );
        assert_ne!(proof_hash(&payload_hash, 1), proof_hash(&payload_hash, 10));
    }

    #[test]
    fn test_target() {
        assert_eq!(target('0', 3), "000");
        assert_eq!(target('a', 1), "a");
        assert_eq!(target('0', 0), "");
    }

    #[test]
    fn test_meets_target() {
        assert!(meets_target("000abc", "000"));
        assert!(!meets_target("00abc0", "000"));
        // Empty target accepts any hash
        assert!(meets_target("ffff", ""));
    }
}
