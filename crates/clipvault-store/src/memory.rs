//! In-memory store

use std::sync::Arc;

use async_trait::async_trait;
use clipvault_core::{
    Clip, ClipId, ClipMetaUpdate, DateRange, NewClip, NewSession, OwnerId, Session, SessionId,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::records::Records;
use crate::store::ClipStore;

/// A store that keeps every record in memory
///
/// Nothing survives the process. Used for tests and for servers started
/// without a data directory.
pub struct MemoryStore {
    records: RwLock<Records>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create an empty store stamped by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store stamped by the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(Records::default()),
            clock,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipStore for MemoryStore {
    async fn insert_clip(&self, clip: NewClip) -> Result<Clip> {
        let mut records = self.records.write().await;
        let clip = records.prepare_clip(clip, self.clock.as_ref())?;
        records.put_clip(clip.clone());
        debug!("Inserted clip {} for {}", clip.id, clip.owner);
        Ok(clip)
    }

    async fn get_clip(&self, id: ClipId) -> Result<Option<Clip>> {
        Ok(self.records.read().await.clip(id).cloned())
    }

    async fn update_clip(&self, id: ClipId, update: &ClipMetaUpdate) -> Result<Option<Clip>> {
        let mut records = self.records.write().await;
        let Some(mut clip) = records.clip(id).cloned() else {
            return Ok(None);
        };
        clip.apply(update);
        records.put_clip(clip.clone());
        Ok(Some(clip))
    }

    async fn delete_clip(&self, id: ClipId) -> Result<bool> {
        Ok(self.records.write().await.remove_clip(id).is_some())
    }

    async fn scan_clips_by_owner(
        &self,
        owner: &OwnerId,
        range: Option<DateRange>,
    ) -> Result<Vec<Clip>> {
        Ok(self.records.read().await.scan_clips(owner, range))
    }

    async fn insert_session(&self, session: NewSession) -> Result<Session> {
        let mut records = self.records.write().await;
        let session = records.prepare_session(session, self.clock.as_ref());
        records.put_session(session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>> {
        Ok(self.records.read().await.session(id).cloned())
    }

    async fn rename_session(&self, id: SessionId, name: &str) -> Result<Option<Session>> {
        let mut records = self.records.write().await;
        let Some(mut session) = records.session(id).cloned() else {
            return Ok(None);
        };
        session.name = name.to_string();
        records.put_session(session.clone());
        Ok(Some(session))
    }

    async fn delete_session(&self, id: SessionId) -> Result<bool> {
        Ok(self.records.write().await.remove_session(id).is_some())
    }

    async fn scan_sessions_by_owner(&self, owner: &OwnerId) -> Result<Vec<Session>> {
        Ok(self.records.read().await.scan_sessions(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StoreError;
    use chrono::DateTime;

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id).unwrap()
    }

    fn store_at(millis: i64) -> (MemoryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_millis(millis));
        (MemoryStore::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_scan_is_owner_scoped_and_newest_first() {
        let (store, clock) = store_at(100);
        let a = store.insert_clip(NewClip::new(owner("u1"), "a", 1)).await.unwrap();
        clock.set_millis(200);
        store.insert_clip(NewClip::new(owner("u2"), "b", 1)).await.unwrap();
        clock.set_millis(300);
        let c = store.insert_clip(NewClip::new(owner("u1"), "c", 1)).await.unwrap();

        let ids: Vec<ClipId> = store
            .scan_clips_by_owner(&owner("u1"), None)
            .await
            .unwrap()
            .into_iter()
            .map(|clip| clip.id)
            .collect();
        assert_eq!(ids, vec![c.id, a.id]);
    }

    #[tokio::test]
    async fn test_range_scan_includes_both_bounds() {
        let (store, clock) = store_at(100);
        for (millis, key) in [(100, "a"), (200, "b"), (300, "c"), (400, "d")] {
            clock.set_millis(millis);
            store.insert_clip(NewClip::new(owner("u1"), key, 1)).await.unwrap();
        }

        let range = DateRange::new(
            DateTime::from_timestamp_millis(200).unwrap(),
            DateTime::from_timestamp_millis(300).unwrap(),
        );
        let keys: Vec<String> = store
            .scan_clips_by_owner(&owner("u1"), Some(range))
            .await
            .unwrap()
            .into_iter()
            .map(|clip| clip.object_key)
            .collect();
        assert_eq!(keys, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_object_key_never_reused() {
        let store = MemoryStore::new();
        let clip = store.insert_clip(NewClip::new(owner("u1"), "k", 1)).await.unwrap();

        let err = store.insert_clip(NewClip::new(owner("u2"), "k", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateObjectKey(key) if key == "k"));

        assert!(store.delete_clip(clip.id).await.unwrap());
        let err = store.insert_clip(NewClip::new(owner("u1"), "k", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateObjectKey(_)));
    }

    #[tokio::test]
    async fn test_update_missing_clip_returns_none() {
        let store = MemoryStore::new();
        let update = ClipMetaUpdate {
            favorite: Some(true),
            ..Default::default()
        };
        assert!(store.update_clip(ClipId::new(), &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_position_in_index() {
        let (store, clock) = store_at(100);
        let a = store.insert_clip(NewClip::new(owner("u1"), "a", 1)).await.unwrap();
        clock.set_millis(200);
        let b = store.insert_clip(NewClip::new(owner("u1"), "b", 1)).await.unwrap();

        let update = ClipMetaUpdate {
            tags: Some(vec!["press".into()]),
            ..Default::default()
        };
        let updated = store.update_clip(a.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.tags, vec!["press"]);
        assert_eq!(updated.created_at, a.created_at);

        let scanned = store.scan_clips_by_owner(&owner("u1"), None).await.unwrap();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].id, b.id);
        assert_eq!(scanned[1].tags, vec!["press"]);
    }

    #[tokio::test]
    async fn test_delete_session_leaves_clips_alone() {
        let store = MemoryStore::new();
        let session = store
            .insert_session(NewSession::new(owner("u1"), "Monday"))
            .await
            .unwrap();
        let clip = store
            .insert_clip(NewClip::new(owner("u1"), "k", 1).with_session(session.id))
            .await
            .unwrap();

        assert!(store.delete_session(session.id).await.unwrap());
        assert!(!store.delete_session(session.id).await.unwrap());
        let clip = store.get_clip(clip.id).await.unwrap().unwrap();
        assert_eq!(clip.session_id, Some(session.id));
        assert!(store.scan_sessions_by_owner(&owner("u1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_session() {
        let store = MemoryStore::new();
        let session = store
            .insert_session(NewSession::new(owner("u1"), "Monday"))
            .await
            .unwrap();
        let renamed = store.rename_session(session.id, "Tuesday").await.unwrap().unwrap();
        assert_eq!(renamed.name, "Tuesday");
        assert_eq!(renamed.created_at, session.created_at);
        assert!(store.rename_session(SessionId::new(), "x").await.unwrap().is_none());
    }
}
