//! Error types for clipvault-server

use clipvault_rpc::RpcError;
use clipvault_search::SearchError;
use clipvault_store::StoreError;
use thiserror::Error;

use crate::upload::UploadViolation;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Server error: {0}")]
    Server(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Failures surfaced by catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The record is absent or belongs to another owner
    ///
    /// Both cases carry the same message so callers cannot discover other
    /// owners' records.
    #[error("Record not found")]
    NotFoundOrDenied,

    #[error(transparent)]
    Validation(#[from] UploadViolation),

    #[error("No authenticated caller")]
    Unauthenticated,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<SearchError> for CatalogError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Store(e) => CatalogError::Store(e),
        }
    }
}

impl From<CatalogError> for RpcError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFoundOrDenied => RpcError::NotFound,
            CatalogError::Validation(violation) => RpcError::Validation(violation.to_string()),
            CatalogError::Unauthenticated => RpcError::Unauthenticated,
            CatalogError::Store(StoreError::DuplicateObjectKey(key)) => {
                RpcError::Validation(format!("Object key already used: {}", key))
            }
            CatalogError::Store(e) => RpcError::Internal(e.to_string()),
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use clipvault_rpc::codes;

    #[test]
    fn test_catalog_errors_map_to_rpc_codes() {
        assert_eq!(RpcError::from(CatalogError::NotFoundOrDenied).code(), codes::NOT_FOUND);
        assert_eq!(RpcError::from(CatalogError::Unauthenticated).code(), codes::UNAUTHENTICATED);

        let violation = UploadViolation::TooLarge { size: 10, limit: 5 };
        let err = RpcError::from(CatalogError::from(violation));
        assert_eq!(err.code(), codes::VALIDATION);
        assert!(err.to_string().contains("5 byte limit"));

        let dup = CatalogError::Store(StoreError::DuplicateObjectKey("k".into()));
        assert_eq!(RpcError::from(dup).code(), codes::VALIDATION);
    }
}
