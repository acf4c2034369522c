//! Error types for clipvault-rpc

use jsonrpsee::types::ErrorObjectOwned;
use thiserror::Error;

/// Error codes carried in JSON-RPC error objects
pub mod codes {
    pub const UNAUTHENTICATED: i32 = -32001;
    pub const NOT_FOUND: i32 = -32004;
    pub const VALIDATION: i32 = -32010;
    pub const INTERNAL: i32 = -32603;
}

#[derive(Error, Debug)]
pub enum RpcError {
    /// Absent record and record owned by someone else look the same
    #[error("Record not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No authenticated caller")]
    Unauthenticated,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RpcError {
    pub fn code(&self) -> i32 {
        match self {
            RpcError::NotFound => codes::NOT_FOUND,
            RpcError::Validation(_) => codes::VALIDATION,
            RpcError::Unauthenticated => codes::UNAUTHENTICATED,
            RpcError::Internal(_) => codes::INTERNAL,
        }
    }
}

impl From<RpcError> for ErrorObjectOwned {
    fn from(e: RpcError) -> Self {
        ErrorObjectOwned::owned(e.code(), e.to_string(), None::<()>)
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
