//! Clipvault Client - Client library for connecting to Clipvault servers
//!
//! This crate provides:
//! - JSON-RPC client for communicating with servers
//! - High-level API for clip, session and upload operations
//! - Errors that keep the server's error code

pub mod client;
pub mod error;

pub use client::*;
pub use error::*;
