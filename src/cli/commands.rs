//! CLI commands for the ledger
//!
//! Implements the create-or-extend workflow: read an input file, mine its
//! content into a new block and write the chain file back.

use crate::core::{Blockchain, ChainConfig};
use crate::mining::{LogReporter, Miner, SilentReporter};
use crate::storage::{load_from_file, save_to_file};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// File whose content becomes the new block's data
    pub input_file: PathBuf,
    /// Chain file to read and write
    pub chain_file: PathBuf,
    /// Target and verification settings
    pub config: ChainConfig,
    /// Report mining statistics
    pub verbose: bool,
}

/// Build the miner for a run
pub fn build_miner(config: &ChainConfig, verbose: bool) -> Miner {
    let miner = Miner::from_config(config);
    if verbose {
        miner.with_reporter(LogReporter)
    } else {
        miner.with_reporter(SilentReporter)
    }
}

/// Append the input file to the chain file, creating the chain if needed
pub fn run(options: &RunOptions) -> CliResult<Blockchain> {
    if !options.input_file.exists() {
        return Err(format!("{} file does not exist", options.input_file.display()).into());
    }

    if !options.config.is_reachable() {
        return Err(format!(
            "target {:?} can never be met by a hex digest",
            options.config.target()
        )
        .into());
    }

    let miner = build_miner(&options.config, options.verbose);

    let blockchain = if options.chain_file.exists() {
        cmd_insert(&options.input_file, &options.chain_file, &options.config, &miner)?
    } else {
        cmd_create(&options.input_file, &options.chain_file, &options.config, &miner)?
    };

    if options.verbose {
        cmd_chain_info(&blockchain);
    }

    Ok(blockchain)
}

/// Create a new chain holding the input file as its first block
pub fn cmd_create(
    input_file: &Path,
    chain_file: &Path,
    config: &ChainConfig,
    miner: &Miner,
) -> CliResult<Blockchain> {
    println!("🆕 Creating new chain at {}", chain_file.display());

    let mut blockchain = Blockchain::new(config.clone())?;
    append_input(&mut blockchain, input_file, miner)?;
    save_to_file(&blockchain, chain_file)?;

    Ok(blockchain)
}

/// Extend an existing chain with the input file
pub fn cmd_insert(
    input_file: &Path,
    chain_file: &Path,
    config: &ChainConfig,
    miner: &Miner,
) -> CliResult<Blockchain> {
    println!("📂 Loading chain from {}", chain_file.display());

    let mut blockchain = load_from_file(chain_file, config.clone())?;
    if !blockchain.is_valid() {
        warn!(
            "Chain in {} does not validate under the current settings",
            chain_file.display()
        );
    }

    append_input(&mut blockchain, input_file, miner)?;
    save_to_file(&blockchain, chain_file)?;

    Ok(blockchain)
}

/// Mine the input file's content on top of the chain
fn append_input(blockchain: &mut Blockchain, input_file: &Path, miner: &Miner) -> CliResult<()> {
    let content = fs::read(input_file)?;
    let data = String::from_utf8_lossy(&content);

    match blockchain.mine_next(&data, miner) {
        Ok((block, stats)) => {
            println!("✅ Block {} appended", block.payload.sequence);
            println!("   ├─ Hash: {}", block.short_hash());
            println!("   ├─ Nonce: {}", block.header.nonce);
            println!("   └─ Time: {}ms", stats.time_ms);
            Ok(())
        }
        Err(e) => {
            println!("❌ Block rejected: {}", e);
            Err(e.into())
        }
    }
}

/// Display chain info
pub fn cmd_chain_info(blockchain: &Blockchain) {
    let stats = blockchain.stats();

    println!("⛓️  Chain Info");
    println!("   ├─ Height: {}", stats.height);
    println!("   ├─ Total blocks: {}", stats.total_blocks);
    println!("   ├─ Target: {:?}", blockchain.target());
    println!("   └─ Latest hash: {}", stats.latest_hash);
}
