//! Error types for clipvault-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid angle: {0} (expected front, side or 45)")]
    InvalidAngle(String),

    #[error("Invalid apparatus: {0} (expected floor, rings, bar or parallettes)")]
    InvalidApparatus(String),

    #[error("Invalid owner id: {0}")]
    InvalidOwner(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
