//! Filtered clip listings

use clipvault_core::{Clip, ClipFilters, OwnerId, Page, PageRequest};
use tracing::debug;

use crate::cursor::paginate;
use crate::engine::QueryEngine;
use crate::error::Result;

/// Check a clip against every supplied filter except the date range
///
/// The date range is applied by the store scan.
pub fn matches_filters(clip: &Clip, filters: &ClipFilters) -> bool {
    if let Some(tags) = filters.tags.as_ref().filter(|tags| !tags.is_empty()) {
        if !clip.tags.iter().any(|tag| tags.contains(tag)) {
            return false;
        }
    }

    if let Some(angle) = filters.angle {
        if clip.angle != Some(angle) {
            return false;
        }
    }

    if let Some(apparatus) = filters.apparatus {
        if clip.apparatus != Some(apparatus) {
            return false;
        }
    }

    if let Some(favorite) = filters.favorite {
        if clip.favorite != favorite {
            return false;
        }
    }

    if let Some(session_id) = filters.session_id {
        if clip.session_id != Some(session_id) {
            return false;
        }
    }

    true
}

impl QueryEngine {
    /// List an owner's clips matching every supplied filter, newest first
    ///
    /// The whole filtered sequence is recomputed on each call and the page
    /// is sliced from it by the request's cursor offset.
    pub async fn list_clips(
        &self,
        owner: &OwnerId,
        filters: &ClipFilters,
        request: &PageRequest,
    ) -> Result<Page<Clip>> {
        let candidates = self.owner_clips(owner, filters.date_range).await?;
        let scanned = candidates.len();

        let matched: Vec<Clip> = candidates
            .into_iter()
            .filter(|clip| matches_filters(clip, filters))
            .collect();

        debug!(
            "Listing clips for {}: {} of {} matched filters",
            owner,
            matched.len(),
            scanned
        );

        Ok(paginate(matched, request.cursor.as_deref(), request.page_size()))
    }
}
