//! Clipvault Core - Core types for the clip catalog
//!
//! This crate defines the records shared by every other Clipvault crate:
//! - `Clip`: A catalogued media asset stored in an external object store
//! - `Session`: A named grouping of one owner's clips
//! - `ClipFilters`: The structured predicate set used by listings
//! - `Page`: One slice of a paginated result

pub mod clip;
pub mod error;
pub mod filter;
pub mod owner;
pub mod page;
pub mod session;

pub use clip::*;
pub use error::*;
pub use filter::*;
pub use owner::*;
pub use page::*;
pub use session::*;
