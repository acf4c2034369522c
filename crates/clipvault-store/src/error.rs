//! Error types for clipvault-store

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object key already used: {0}")]
    DuplicateObjectKey(String),

    #[error("Store already exists at path: {0}")]
    StoreExists(String),

    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    #[error("Unsupported store version: {0}")]
    UnsupportedVersion(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
