//! Clipvault Store - Durable keyed storage for clips and sessions
//!
//! This crate provides:
//! - The `ClipStore` trait consumed by the query engine and catalog
//! - An in-memory store for tests and ephemeral servers
//! - A local file-based store with write-through persistence
//! - Owner-scoped indexes ordered by creation time

pub mod clock;
pub mod error;
pub mod local;
pub mod memory;
mod records;
pub mod store;

pub use clock::*;
pub use error::*;
pub use local::*;
pub use memory::*;
pub use store::*;
