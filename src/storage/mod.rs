//! Storage module for ledger persistence

pub mod persistence;

pub use persistence::{from_json, load_from_file, save_to_file, to_json, StorageError};
