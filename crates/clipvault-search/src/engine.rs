//! Query engine handle

use std::sync::Arc;

use clipvault_core::{Clip, DateRange, OwnerId};
use clipvault_store::ClipStore;

use crate::error::Result;

/// Runs listings and searches against a clip store
///
/// Holds no state between calls beyond the store handle.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn ClipStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn ClipStore>) -> Self {
        Self { store }
    }

    /// Owner's clips newest first, as of now
    pub(crate) async fn owner_clips(
        &self,
        owner: &OwnerId,
        range: Option<DateRange>,
    ) -> Result<Vec<Clip>> {
        Ok(self.store.scan_clips_by_owner(owner, range).await?)
    }
}
