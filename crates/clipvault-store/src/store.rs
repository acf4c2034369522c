//! The storage contract consumed by the query engine and catalog

use async_trait::async_trait;
use clipvault_core::{
    Clip, ClipId, ClipMetaUpdate, DateRange, NewClip, NewSession, OwnerId, Session, SessionId,
};

use crate::error::Result;

/// Keyed storage of clip and session records with owner-scoped indexes
///
/// Implementations give per-record atomicity: a reader never observes a
/// partially applied update. Scans return the owner's records ordered by
/// creation time descending, ties broken by id descending.
#[async_trait]
pub trait ClipStore: Send + Sync {
    /// Insert a clip, assigning its id and creation time
    ///
    /// Fails with `DuplicateObjectKey` when the key has ever been used,
    /// including by a clip that has since been deleted.
    async fn insert_clip(&self, clip: NewClip) -> Result<Clip>;

    async fn get_clip(&self, id: ClipId) -> Result<Option<Clip>>;

    /// Apply every field of `update` or none of them
    ///
    /// Returns the updated record, or `None` if the clip does not exist.
    async fn update_clip(&self, id: ClipId, update: &ClipMetaUpdate) -> Result<Option<Clip>>;

    /// Returns `false` if the clip did not exist
    async fn delete_clip(&self, id: ClipId) -> Result<bool>;

    /// Owner's clips newest first, optionally bounded by an inclusive creation-time range
    async fn scan_clips_by_owner(
        &self,
        owner: &OwnerId,
        range: Option<DateRange>,
    ) -> Result<Vec<Clip>>;

    async fn insert_session(&self, session: NewSession) -> Result<Session>;

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>>;

    async fn rename_session(&self, id: SessionId, name: &str) -> Result<Option<Session>>;

    /// Remove a session record only; clips that reference it are left alone
    async fn delete_session(&self, id: SessionId) -> Result<bool>;

    /// Owner's sessions newest first
    async fn scan_sessions_by_owner(&self, owner: &OwnerId) -> Result<Vec<Session>>;
}
