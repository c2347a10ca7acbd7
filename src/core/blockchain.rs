//! Blockchain implementation
//!
//! The chain engine: owns the ordered sequence of blocks, seeds it with a
//! genesis block and gates every append behind linkage and proof-of-work
//! verification.

use crate::core::block::{Block, Payload};
use crate::core::codec::CodecError;
use crate::crypto::{meets_target, proof_hash, target};
use crate::mining::{Miner, MiningStats};
use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

/// Default target prefix character
pub const DEFAULT_PREFIX: char = '0';

/// Default mining difficulty (number of prefix repetitions)
pub const DEFAULT_DIFFICULTY: usize = 3;

/// Length of a hex encoded SHA-256 digest
pub const HASH_HEX_LEN: usize = 64;

/// Blockchain-related errors
#[derive(Error, Debug)]
pub enum BlockchainError {
    #[error("Chain has no blocks")]
    EmptyChain,
    #[error("Broken linkage: expected previous hash {expected}, got {found}")]
    BrokenLinkage { expected: String, found: String },
    #[error("Invalid proof of work for block {sequence}")]
    InvalidProofOfWork { sequence: u64 },
    #[error("Header hash mismatch: payload hashes to {expected}, header has {found}")]
    HeaderHashMismatch { expected: String, found: String },
    #[error("Unexpected sequence: expected {expected}, got {found}")]
    UnexpectedSequence { expected: u64, found: u64 },
    #[error("Sequence overflow: block {0} has no successor")]
    SequenceOverflow(u64),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Parameters fixed for the lifetime of a chain instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Character the proof hash must start with
    pub prefix: char,
    /// How many times `prefix` must repeat
    pub difficulty: usize,
    /// Also require the header hash to match the payload and the sequence
    /// to follow the last block
    pub strict_header_hash: bool,
}

impl ChainConfig {
    pub fn new(prefix: char, difficulty: usize) -> Self {
        Self {
            prefix,
            difficulty,
            ..Default::default()
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_header_hash = strict;
        self
    }

    /// The prefix string a proof hash must start with
    pub fn target(&self) -> String {
        target(self.prefix, self.difficulty)
    }

    /// Whether a lowercase hex digest can ever satisfy the target
    pub fn is_reachable(&self) -> bool {
        self.difficulty == 0
            || (self.difficulty <= HASH_HEX_LEN
                && matches!(self.prefix, '0'..='9' | 'a'..='f'))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX,
            difficulty: DEFAULT_DIFFICULTY,
            strict_header_hash: false,
        }
    }
}

/// The main blockchain structure
///
/// Only the block sequence is serialized; the configuration is supplied
/// again whenever a chain is restored.
#[derive(Debug, Clone, Serialize)]
pub struct Blockchain {
    /// The chain of blocks, genesis first
    chain: Vec<Block>,
    #[serde(skip)]
    config: ChainConfig,
}

impl Blockchain {
    /// Create a new blockchain seeded with a genesis block
    pub fn new(config: ChainConfig) -> Result<Self, BlockchainError> {
        let mut blockchain = Self {
            chain: Vec::new(),
            config,
        };
        let genesis = Self::create_genesis()?;
        debug!("Created genesis block {}", genesis.short_hash());
        blockchain.chain.push(genesis);
        Ok(blockchain)
    }

    /// Create a blockchain with a custom prefix and difficulty
    pub fn with_difficulty(prefix: char, difficulty: usize) -> Result<Self, BlockchainError> {
        Self::new(ChainConfig::new(prefix, difficulty))
    }

    /// Restore a blockchain from previously persisted blocks
    pub fn from_blocks(blocks: Vec<Block>, config: ChainConfig) -> Result<Self, BlockchainError> {
        if blocks.is_empty() {
            return Err(BlockchainError::EmptyChain);
        }

        Ok(Self {
            chain: blocks,
            config,
        })
    }

    /// Create the unmined genesis block
    pub fn create_genesis() -> Result<Block, BlockchainError> {
        Ok(Block::genesis()?)
    }

    /// Get the latest block
    pub fn last_block(&self) -> Result<&Block, BlockchainError> {
        self.chain.last().ok_or(BlockchainError::EmptyChain)
    }

    /// Build the payload for the block following the current last block
    pub fn build_next_payload(&self, data: &str) -> Result<Payload, BlockchainError> {
        let last = self.last_block()?;
        Ok(Payload::new(
            Self::next_sequence(last)?,
            data,
            last.header.hash.clone(),
        ))
    }

    fn next_sequence(block: &Block) -> Result<u64, BlockchainError> {
        block
            .payload
            .sequence
            .checked_add(1)
            .ok_or(BlockchainError::SequenceOverflow(block.payload.sequence))
    }

    /// Verify a block against the current tip without mutating the chain
    pub fn verify_block(&self, block: &Block) -> Result<(), BlockchainError> {
        let last = self.last_block()?;

        if block.payload.previous_hash != last.header.hash {
            return Err(BlockchainError::BrokenLinkage {
                expected: last.header.hash.clone(),
                found: block.payload.previous_hash.clone(),
            });
        }

        let payload_hash = block.payload.hash()?;
        let proof = proof_hash(&payload_hash, block.header.nonce);
        if !meets_target(&proof, &self.target()) {
            return Err(BlockchainError::InvalidProofOfWork {
                sequence: block.payload.sequence,
            });
        }

        if self.config.strict_header_hash {
            if block.header.hash != payload_hash {
                return Err(BlockchainError::HeaderHashMismatch {
                    expected: payload_hash,
                    found: block.header.hash.clone(),
                });
            }

            let expected = Self::next_sequence(last)?;
            if block.payload.sequence != expected {
                return Err(BlockchainError::UnexpectedSequence {
                    expected,
                    found: block.payload.sequence,
                });
            }
        }

        Ok(())
    }

    /// Verify and append a block, reporting why it was rejected
    pub fn try_append(&mut self, block: Block) -> Result<(), BlockchainError> {
        self.verify_block(&block)?;

        info!(
            "Pushed block {} with hash {}",
            block.payload.sequence, block.header.hash
        );
        self.chain.push(block);

        Ok(())
    }

    /// Verify and append a block
    ///
    /// Returns `false` and leaves the chain unchanged when the block is
    /// rejected.
    pub fn append(&mut self, block: Block) -> bool {
        let sequence = block.payload.sequence;
        match self.try_append(block) {
            Ok(()) => true,
            Err(e) => {
                warn!("Rejected block {}: {}", sequence, e);
                false
            }
        }
    }

    /// Build, mine and append the next block carrying `data`
    pub fn mine_next(
        &mut self,
        data: &str,
        miner: &Miner,
    ) -> Result<(Block, MiningStats), BlockchainError> {
        let payload = self.build_next_payload(data)?;
        let (block, stats) = miner.mine(payload)?;

        self.try_append(block.clone())?;

        Ok((block, stats))
    }

    /// Audit the entire chain under the current configuration
    ///
    /// Checks every link, every sequence step, every header hash and the
    /// proof of work of every non-genesis block.
    pub fn is_valid(&self) -> bool {
        let Some(genesis) = self.chain.first() else {
            return false;
        };

        if !genesis.payload.is_genesis() || !genesis.verify_hash().unwrap_or(false) {
            return false;
        }

        let target = self.target();

        self.chain.windows(2).all(|pair| {
            let (previous, current) = (&pair[0], &pair[1]);

            if current.payload.previous_hash != previous.header.hash {
                return false;
            }

            if previous.payload.sequence.checked_add(1) != Some(current.payload.sequence) {
                return false;
            }

            match current.payload.hash() {
                Ok(payload_hash) => {
                    payload_hash == current.header.hash
                        && meets_target(&proof_hash(&payload_hash, current.header.nonce), &target)
                }
                Err(_) => false,
            }
        })
    }

    /// All blocks, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn get_block(&self, sequence: u64) -> Option<&Block> {
        self.chain.get(usize::try_from(sequence).ok()?)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Sequence number of the last block
    pub fn height(&self) -> u64 {
        self.chain.last().map(|b| b.payload.sequence).unwrap_or(0)
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn prefix(&self) -> char {
        self.config.prefix
    }

    pub fn difficulty(&self) -> usize {
        self.config.difficulty
    }

    /// The prefix string a proof hash must start with
    pub fn target(&self) -> String {
        self.config.target()
    }

    /// Get chain statistics
    pub fn stats(&self) -> ChainStats {
        ChainStats {
            height: self.height(),
            total_blocks: self.chain.len() as u64,
            prefix: self.config.prefix,
            difficulty: self.config.difficulty,
            latest_hash: self
                .chain
                .last()
                .map(|b| b.header.hash.clone())
                .unwrap_or_default(),
        }
    }
}

/// Chain statistics
#[derive(Debug, Clone)]
pub struct ChainStats {
    pub height: u64,
    pub total_blocks: u64,
    pub prefix: char,
    pub difficulty: usize,
    pub latest_hash: String,
}
