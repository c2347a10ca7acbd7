//! Mining progress reporting
//!
//! The miner never decides on its own whether to print anything; it hands
//! its statistics to whichever reporter it was built with.

use crate::core::{Block, Payload};
use crate::mining::MiningStats;
use log::{debug, info};
use std::sync::Arc;

/// Receives mining events from a [`Miner`](crate::mining::Miner)
pub trait MiningReporter: Send + Sync {
    /// Called once before the nonce search starts
    fn mining_started(&self, _payload: &Payload, _target: &str) {}

    /// Called once a qualifying nonce has been found
    fn block_mined(&self, block: &Block, stats: &MiningStats);

    /// Called when a cancellable search was stopped early
    fn mining_cancelled(&self, _payload: &Payload, _attempts: u64) {}
}

/// One-line summary of a mined block
pub fn mined_message(block: &Block, stats: &MiningStats) -> String {
    format!(
        "Mined block {} in {}ms. Hash: {} ({} attempts)",
        block.payload.sequence,
        stats.time_ms,
        block.short_hash(),
        stats.hash_attempts
    )
}

/// Reports through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl MiningReporter for LogReporter {
    fn mining_started(&self, payload: &Payload, target: &str) {
        debug!(
            "Mining block {} with target {:?}...",
            payload.sequence, target
        );
    }

    fn block_mined(&self, block: &Block, stats: &MiningStats) {
        info!("{}", mined_message(block, stats));
    }

    fn mining_cancelled(&self, payload: &Payload, attempts: u64) {
        info!(
            "Mining of block {} cancelled after {} attempts",
            payload.sequence, attempts
        );
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl MiningReporter for SilentReporter {
    fn block_mined(&self, _block: &Block, _stats: &MiningStats) {}
}

impl<R: MiningReporter + ?Sized> MiningReporter for Arc<R> {
    fn mining_started(&self, payload: &Payload, target: &str) {
        (**self).mining_started(payload, target)
    }

    fn block_mined(&self, block: &Block, stats: &MiningStats) {
        (**self).block_mined(block, stats)
    }

    fn mining_cancelled(&self, payload: &Payload, attempts: u64) {
        (**self).mining_cancelled(payload, attempts)
    }
}
