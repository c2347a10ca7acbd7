//! Ledger persistence layer
//!
//! The chain file is a JSON document of the form
//! `{"chain": [{"header": {...}, "payload": {...}}, ...]}`. Prefix and
//! difficulty are not stored; callers supply them on every load.

use crate::core::{Block, Blockchain, BlockchainError, ChainConfig};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invalid chain: {0}")]
    Chain(#[from] BlockchainError),
}

/// On-disk shape of a chain file
#[derive(Debug, Deserialize)]
struct ChainFile {
    chain: Vec<Block>,
}

/// Serialize a blockchain to its pretty-printed JSON form
pub fn to_json(blockchain: &Blockchain) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(blockchain)?)
}

/// Restore a blockchain from its JSON form
pub fn from_json(json: &str, config: ChainConfig) -> Result<Blockchain, StorageError> {
    let file: ChainFile = serde_json::from_str(json)?;
    restore(file, config)
}

fn restore(file: ChainFile, config: ChainConfig) -> Result<Blockchain, StorageError> {
    if file.chain.is_empty() {
        return Err(StorageError::InvalidData(
            "Chain file contains no blocks".to_string(),
        ));
    }

    Ok(Blockchain::from_blocks(file.chain, config)?)
}

/// Path of the scratch file written before the final rename
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "chain".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save blockchain to a specific file path
///
/// Writes to a temporary sibling first and renames it over `path`, so a
/// failed write never leaves a truncated chain file behind.
pub fn save_to_file(blockchain: &Blockchain, path: &Path) -> Result<(), StorageError> {
    let temp_path = temp_path(path);

    if let Err(e) = write_and_rename(blockchain, &temp_path, path) {
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }
        return Err(e);
    }

    debug!("Saved {} blocks to {:?}", blockchain.len(), path);
    Ok(())
}

fn write_and_rename(
    blockchain: &Blockchain,
    temp_path: &Path,
    path: &Path,
) -> Result<(), StorageError> {
    {
        let file = fs::File::create(temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, blockchain)?;
        writer.flush()?;
    }

    // Atomic rename
    fs::rename(temp_path, path)?;
    Ok(())
}

/// Load blockchain from a specific file path
pub fn load_from_file(path: &Path, config: ChainConfig) -> Result<Blockchain, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let chain_file: ChainFile = serde_json::from_reader(reader)?;

    let blockchain = restore(chain_file, config)?;
    debug!("Loaded {} blocks from {:?}", blockchain.len(), path);
    Ok(blockchain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::{Miner, SilentReporter};

    fn populated_chain() -> Blockchain {
        let mut blockchain = Blockchain::with_difficulty('0', 1).unwrap();
        let miner = Miner::from_config(blockchain.config()).with_reporter(SilentReporter);
        blockchain.mine_next("Block 1", &miner).unwrap();
        blockchain.mine_next("<b>Block 2</b> & more\n", &miner).unwrap();
        blockchain
    }

    #[test]
    fn test_save_load_blockchain() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("chain.json");
        let blockchain = populated_chain();

        save_to_file(&blockchain, &path).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());

        let loaded = load_from_file(&path, blockchain.config().clone()).unwrap();
        assert_eq!(loaded.blocks(), blockchain.blocks());
        assert!(loaded.is_valid());
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file
        let path = temp_dir.path().join("chain.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let result = save_to_file(&populated_chain(), &path);

        assert!(matches!(result, Err(StorageError::IoError(_))));
        assert!(!temp_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_json_round_trip() {
        let blockchain = populated_chain();
        let json = to_json(&blockchain).unwrap();
        let restored = from_json(&json, ChainConfig::new('0', 1)).unwrap();

        assert_eq!(restored.blocks(), blockchain.blocks());
    }

    #[test]
    fn test_document_layout() {
        let blockchain = populated_chain();
        let value: serde_json::Value = serde_json::from_str(&to_json(&blockchain).unwrap()).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);

        let chain = object["chain"].as_array().unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[1]["payload"]["previousHash"], chain[0]["header"]["hash"]);
        assert_eq!(chain[2]["payload"]["sequence"], 2);
    }

    #[test]
    fn test_load_restores_supplied_config() {
        let blockchain = populated_chain();
        let json = to_json(&blockchain).unwrap();

        let restored = from_json(&json, ChainConfig::new('a', 4).strict(true)).unwrap();
        assert_eq!(restored.prefix(), 'a');
        assert_eq!(restored.difficulty(), 4);
        assert!(restored.config().strict_header_hash);
    }

    #[test]
    fn test_load_external_document() {
        let json = r#"{
          "chain": [
            {
              "header": { "nonce": 0, "hash": "abc" },
              "payload": {
                "sequence": 0,
                "timestamp": 1700000000000,
                "data": "Genesis Block",
                "previousHash": ""
              }
            }
          ]
        }"#;

        let blockchain = from_json(json, ChainConfig::default()).unwrap();
        let genesis = blockchain.last_block().unwrap();
        assert_eq!(genesis.header.hash, "abc");
        assert_eq!(genesis.payload.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_from_file(&temp_dir.path().join("missing.json"), ChainConfig::default());
        assert!(matches!(result, Err(StorageError::IoError(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("chain.json");
        fs::write(&path, r#"{"chain": [{"header": {"nonce": "#).unwrap();

        let result = load_from_file(&path, ChainConfig::default());
        assert!(matches!(result, Err(StorageError::SerializationError(_))));
    }

    #[test]
    fn test_load_empty_chain() {
        let result = from_json(r#"{"chain": []}"#, ChainConfig::default());
        assert!(matches!(result, Err(StorageError::InvalidData(_))));
    }
}
