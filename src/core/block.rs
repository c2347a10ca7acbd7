//! Block implementation for the ledger
//!
//! A block pairs a proof header (nonce + payload hash) with the payload
//! that carries the block's content.

use crate::core::codec::{self, CodecError};
use crate::crypto::sha256_hex;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Content of the genesis block
pub const GENESIS_DATA: &str = "Genesis Block";

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Block header produced by mining
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Nonce used for proof of work
    pub nonce: u64,
    /// Hash of the encoded payload (the nonce is not part of it)
    pub hash: String,
}

/// Content fields of a block
///
/// Field order matters: it is the order used by the canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Position in the chain, 0 for genesis
    pub sequence: u64,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// User supplied content
    pub data: String,
    /// Header hash of the previous block, empty for genesis
    #[serde(rename = "previousHash")]
    pub previous_hash: String,
}

impl Payload {
    /// Create a payload stamped with the current time
    pub fn new(sequence: u64, data: impl Into<String>, previous_hash: impl Into<String>) -> Self {
        Self::with_timestamp(sequence, now_millis(), data, previous_hash)
    }

    pub fn with_timestamp(
        sequence: u64,
        timestamp: i64,
        data: impl Into<String>,
        previous_hash: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            timestamp,
            data: data.into(),
            previous_hash: previous_hash.into(),
        }
    }

    /// Hash of the canonical encoding of this payload
    pub fn hash(&self) -> Result<String, CodecError> {
        Ok(sha256_hex(&codec::encode(self)?))
    }

    /// Whether this payload starts a chain
    pub fn is_genesis(&self) -> bool {
        self.sequence == 0 && self.previous_hash.is_empty()
    }
}

/// A block in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub payload: Payload,
}

impl Block {
    pub fn new(header: BlockHeader, payload: Payload) -> Self {
        Self { header, payload }
    }

    /// Create the genesis block
    ///
    /// Genesis is not mined: its nonce is fixed at 0 and its header hash is
    /// the plain payload hash.
    pub fn genesis() -> Result<Self, CodecError> {
        let payload = Payload::new(0, GENESIS_DATA, "");
        let header = BlockHeader {
            nonce: 0,
            hash: payload.hash()?,
        };

        Ok(Self::new(header, payload))
    }

    pub fn sequence(&self) -> u64 {
        self.payload.sequence
    }

    pub fn hash(&self) -> &str {
        &self.header.hash
    }

    /// Verify the stored header hash against the payload
    pub fn verify_hash(&self) -> Result<bool, CodecError> {
        Ok(self.header.hash == self.payload.hash()?)
    }

    /// Short form of the header hash for display
    pub fn short_hash(&self) -> &str {
        self.header.hash.get(..12).unwrap_or(&self.header.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis().unwrap();

        assert_eq!(genesis.header.nonce, 0);
        assert_eq!(genesis.payload.sequence, 0);
        assert_eq!(genesis.payload.previous_hash, "");
        assert_eq!(genesis.payload.data, GENESIS_DATA);
        assert!(genesis.payload.is_genesis());
        assert!(genesis.verify_hash().unwrap());
    }

    #[test]
    fn test_payload_hash_is_deterministic() {
        let a = Payload::with_timestamp(1, 1_700_000_000_000, "Block 1", "abc");
        let b = a.clone();

        assert_eq!(a.hash().unwrap(), b.hash().unwrap());
        assert_eq!(a.hash().unwrap().len(), 64);
    }

    #[test]
    fn test_payload_hash_covers_every_field() {
        let base = Payload::with_timestamp(1, 1_700_000_000_000, "Block 1", "abc");
        let base_hash = base.hash().unwrap();

        let variants = [
            Payload { sequence: 2, ..base.clone() },
            Payload { timestamp: 1_700_000_000_001, ..base.clone() },
            Payload { data: "Block 2".to_string(), ..base.clone() },
            Payload { previous_hash: "abd".to_string(), ..base.clone() },
        ];

        for variant in &variants {
            assert_ne!(variant.hash().unwrap(), base_hash);
        }
    }

    #[test]
    fn test_block_equality() {
        let payload = Payload::with_timestamp(3, 42, "data", "prev");
        let header = BlockHeader {
            nonce: 7,
            hash: payload.hash().unwrap(),
        };
        let block = Block::new(header.clone(), payload.clone());

        assert_eq!(block, Block::new(header.clone(), payload.clone()));

        let other_nonce = Block::new(BlockHeader { nonce: 8, ..header }, payload);
        assert_ne!(block, other_nonce);
    }

    #[test]
    fn test_block_hash_verification() {
        let mut block = Block::genesis().unwrap();
        assert!(block.verify_hash().unwrap());

        // Tamper with the payload
        block.payload.data = "tampered".to_string();
        assert!(!block.verify_hash().unwrap());
    }

    #[test]
    fn test_serialized_field_names() {
        let block = Block::genesis().unwrap();
        let value = serde_json::to_value(&block).unwrap();

        assert!(value["header"]["nonce"].is_u64());
        assert!(value["header"]["hash"].is_string());
        assert_eq!(value["payload"]["sequence"], 0);
        assert!(value["payload"]["timestamp"].is_i64());
        assert_eq!(value["payload"]["data"], GENESIS_DATA);
        assert_eq!(value["payload"]["previousHash"], "");
    }
}
