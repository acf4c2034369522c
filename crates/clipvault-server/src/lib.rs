//! Clipvault Server - Catalog service and JSON-RPC server
//!
//! This crate provides:
//! - The catalog service enforcing ownership on every operation
//! - Caller identity resolution with an opt-in development fallback
//! - Upload validation at the object-store boundary
//! - JSON-RPC server over HTTP
//! - Environment-driven configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod identity;
pub mod server;
pub mod upload;

pub use catalog::*;
pub use config::*;
pub use error::*;
pub use handler::*;
pub use identity::*;
pub use server::*;
pub use upload::*;
