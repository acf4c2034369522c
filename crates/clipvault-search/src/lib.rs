//! Clipvault Search - The clip catalog query engine
//!
//! This crate provides:
//! - A tokenizer normalizing free text into word-like tokens
//! - Multi-predicate filtered listings over an owner's clips
//! - Token search with bidirectional substring matching
//! - The offset cursor protocol shared by both result kinds
//!
//! Every query recomputes its candidate sequence from the store at call
//! time. There is no cached index.

pub mod cursor;
pub mod engine;
pub mod error;
pub mod filter;
pub mod search;
pub mod tokenizer;

pub use cursor::*;
pub use engine::*;
pub use error::*;
pub use filter::*;
pub use search::*;
pub use tokenizer::*;
