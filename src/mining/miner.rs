//! Proof-of-work engine
//!
//! Searches nonces from 0 upwards until the proof hash of
//! `payload_hash ++ nonce` starts with the target prefix.

use crate::core::{Block, BlockHeader, ChainConfig, CodecError, Payload};
use crate::crypto::{meets_target, proof_hash, target};
use crate::mining::reporter::{LogReporter, MiningReporter};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Mining statistics
#[derive(Debug, Clone)]
pub struct MiningStats {
    /// Number of hash attempts
    pub hash_attempts: u64,
    /// Time taken in milliseconds
    pub time_ms: u128,
    /// Hash rate (hashes per second)
    pub hash_rate: f64,
}

impl MiningStats {
    fn new(hash_attempts: u64, start: Instant) -> Self {
        let time_ms = start.elapsed().as_millis();
        let hash_rate = if time_ms > 0 {
            (hash_attempts as f64) / (time_ms as f64 / 1000.0)
        } else {
            hash_attempts as f64
        };

        Self {
            hash_attempts,
            time_ms,
            hash_rate,
        }
    }
}

/// Miner for creating new blocks
pub struct Miner {
    prefix: char,
    difficulty: usize,
    reporter: Box<dyn MiningReporter>,
}

impl fmt::Debug for Miner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Miner")
            .field("prefix", &self.prefix)
            .field("difficulty", &self.difficulty)
            .finish_non_exhaustive()
    }
}

impl Miner {
    /// Create a new miner that reports through the `log` facade
    pub fn new(prefix: char, difficulty: usize) -> Self {
        Self {
            prefix,
            difficulty,
            reporter: Box::new(LogReporter),
        }
    }

    /// Create a miner matching a chain's target
    pub fn from_config(config: &ChainConfig) -> Self {
        Self::new(config.prefix, config.difficulty)
    }

    /// Replace the reporter
    pub fn with_reporter(mut self, reporter: impl MiningReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// The prefix string a proof hash must start with
    pub fn target(&self) -> String {
        target(self.prefix, self.difficulty)
    }

    /// Mine a block for the given payload
    ///
    /// The search has no upper bound: an unreachable target never returns.
    pub fn mine(&self, payload: Payload) -> Result<(Block, MiningStats), CodecError> {
        let start = Instant::now();
        let target = self.target();
        let payload_hash = payload.hash()?;

        self.reporter.mining_started(&payload, &target);

        let mut nonce = 0u64;
        while !meets_target(&proof_hash(&payload_hash, nonce), &target) {
            nonce += 1;
        }

        Ok(self.finish(payload, payload_hash, nonce, start))
    }

    /// Mine a block, giving up once `stop` is set
    ///
    /// The flag is checked before every attempt. Returns `None` if the
    /// search was cancelled before a qualifying nonce was found.
    pub fn mine_cancellable(
        &self,
        payload: Payload,
        stop: &AtomicBool,
    ) -> Result<Option<(Block, MiningStats)>, CodecError> {
        let start = Instant::now();
        let target = self.target();
        let payload_hash = payload.hash()?;

        self.reporter.mining_started(&payload, &target);

        let mut nonce = 0u64;
        loop {
            if stop.load(Ordering::Relaxed) {
                self.reporter.mining_cancelled(&payload, nonce);
                return Ok(None);
            }

            if meets_target(&proof_hash(&payload_hash, nonce), &target) {
                return Ok(Some(self.finish(payload, payload_hash, nonce, start)));
            }

            nonce += 1;
        }
    }

    fn finish(
        &self,
        payload: Payload,
        payload_hash: String,
        nonce: u64,
        start: Instant,
    ) -> (Block, MiningStats) {
        let stats = MiningStats::new(nonce + 1, start);
        let block = Block::new(
            BlockHeader {
                nonce,
                hash: payload_hash,
            },
            payload,
        );

        self.reporter.block_mined(&block, &stats);

        (block, stats)
    }
}
