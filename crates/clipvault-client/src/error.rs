//! Error types for clipvault-client

use clipvault_rpc::codes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// The server's error code, if the server produced this error
    pub fn code(&self) -> Option<i32> {
        match self {
            ClientError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(codes::NOT_FOUND)
    }
}

impl From<jsonrpsee::core::ClientError> for ClientError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(obj) => ClientError::Rpc {
                code: obj.code(),
                message: obj.message().to_string(),
            },
            other => ClientError::Transport(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::types::ErrorObjectOwned;

    #[test]
    fn test_call_errors_keep_code() {
        let obj = ErrorObjectOwned::owned(codes::NOT_FOUND, "Record not found", None::<()>);
        let err = ClientError::from(jsonrpsee::core::ClientError::Call(obj));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "RPC error -32004: Record not found");
    }
}
