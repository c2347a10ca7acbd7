//! pow-ledger: a single-node append-only ledger secured by proof of work
//!
//! This crate provides:
//! - SHA-256 payload hashing with a canonical JSON encoding
//! - Proof-of-work mining with pluggable progress reporting
//! - A chain engine that verifies linkage and proof before every append
//! - JSON persistence of the chain
//!
//! # Example
//!
//! ```rust
//! use pow_ledger::core::Blockchain;
//! use pow_ledger::mining::{Miner, SilentReporter};
//!
//! // Create a new chain: proof hashes must start with "0"
//! let mut blockchain = Blockchain::with_difficulty('0', 1).unwrap();
//!
//! // Mine a block on top of genesis
//! let miner = Miner::from_config(blockchain.config()).with_reporter(SilentReporter);
//! let payload = blockchain.build_next_payload("hello").unwrap();
//! let (block, stats) = miner.mine(payload).unwrap();
//! println!("Mined block {} in {}ms", block.payload.sequence, stats.time_ms);
//!
//! assert!(blockchain.append(block));
//! assert_eq!(blockchain.len(), 2);
//! ```

pub mod cli;
pub mod core;
pub mod crypto;
pub mod mining;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{
    Block, BlockHeader, Blockchain, BlockchainError, ChainConfig, Payload, DEFAULT_DIFFICULTY,
    DEFAULT_PREFIX,
};
pub use mining::{LogReporter, Miner, MiningReporter, MiningStats, SilentReporter};
pub use storage::{load_from_file, save_to_file, StorageError};
