//! Command-line interface for the ledger

pub mod commands;

pub use commands::{build_miner, cmd_chain_info, cmd_create, cmd_insert, run, CliResult, RunOptions};
