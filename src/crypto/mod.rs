//! Cryptographic utilities for the ledger
//!
//! This module provides:
//! - SHA-256 hashing
//! - Proof hash and difficulty target checks

pub mod hash;

pub use hash::{meets_target, proof_hash, sha256, sha256_hex, target};
