//! Mining module: proof-of-work search and progress reporting

pub mod miner;
pub mod reporter;

pub use miner::{Miner, MiningStats};
pub use reporter::{mined_message, LogReporter, MiningReporter, SilentReporter};
