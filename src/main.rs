//! pow-ledger CLI Application
//!
//! Appends the content of a file to a proof-of-work secured chain file.

use clap::Parser;
use pow_ledger::cli::{self, RunOptions};
use pow_ledger::core::{ChainConfig, DEFAULT_DIFFICULTY, DEFAULT_PREFIX};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pow-ledger")]
#[command(version = "0.1.0")]
#[command(about = "Append file contents to a proof-of-work secured chain", long_about = None)]
struct Cli {
    /// The file to read and add to the chain as a new block
    #[arg(long)]
    input_file: PathBuf,

    /// The chain file to read and write; created if it does not exist
    #[arg(long)]
    chain_file: PathBuf,

    /// Show details of the chain and mining
    #[arg(short, long)]
    verbose: bool,

    /// Character the proof hash must start with
    #[arg(long, default_value_t = DEFAULT_PREFIX)]
    prefix: char,

    /// How many times the prefix must repeat
    #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: usize,

    /// Also require each block's stored hash to match its payload
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let options = RunOptions {
        input_file: cli.input_file,
        chain_file: cli.chain_file,
        config: ChainConfig::new(cli.prefix, cli.difficulty).strict(cli.strict),
        verbose: cli.verbose,
    };

    cli::run(&options)?;

    Ok(())
}
