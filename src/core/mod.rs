//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Blocks (proof header + payload)
//! - Canonical payload encoding
//! - Blockchain (genesis, payload building, verified appends)

pub mod block;
pub mod blockchain;
pub mod codec;

pub use block::{now_millis, Block, BlockHeader, Payload, GENESIS_DATA};
pub use blockchain::{
    Blockchain, BlockchainError, ChainConfig, ChainStats, DEFAULT_DIFFICULTY, DEFAULT_PREFIX,
    HASH_HEX_LEN,
};
pub use codec::{decode, encode, CodecError};
