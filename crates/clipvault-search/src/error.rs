//! Error types for clipvault-search

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Store error: {0}")]
    Store(#[from] clipvault_store::StoreError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
