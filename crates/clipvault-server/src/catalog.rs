//! Catalog service - owner-scoped operations over the clip store

use std::sync::Arc;

use clipvault_core::{
    Clip, ClipFilters, ClipId, ClipMetaUpdate, NewClip, NewSession, OwnerId, Page, PageRequest,
    Session, SessionId,
};
use clipvault_search::{QueryEngine, SearchPage};
use clipvault_store::ClipStore;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::upload::{key_belongs_to, UploadPolicy, UploadTicket};

/// Every catalog operation a caller can perform
///
/// Each call takes the already-resolved caller and re-checks ownership
/// against the store. Records owned by someone else are reported exactly
/// like records that do not exist.
pub struct Catalog {
    store: Arc<dyn ClipStore>,
    engine: QueryEngine,
    uploads: UploadPolicy,
}

impl Catalog {
    pub fn new(store: Arc<dyn ClipStore>, uploads: UploadPolicy) -> Self {
        Self {
            engine: QueryEngine::new(Arc::clone(&store)),
            store,
            uploads,
        }
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.uploads
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn list_clips(
        &self,
        caller: &OwnerId,
        filters: &ClipFilters,
        request: &PageRequest,
    ) -> CatalogResult<Page<Clip>> {
        Ok(self.engine.list_clips(caller, filters, request).await?)
    }

    pub async fn search_clips(
        &self,
        caller: &OwnerId,
        query: &str,
        limit: Option<usize>,
        cursor: Option<&str>,
    ) -> CatalogResult<SearchPage> {
        Ok(self.engine.search_clips(caller, query, limit, cursor).await?)
    }

    // ========================================================================
    // Clips
    // ========================================================================

    pub async fn get_clip(&self, caller: &OwnerId, clip_id: ClipId) -> CatalogResult<Clip> {
        self.owned_clip(caller, clip_id).await
    }

    /// Apply a metadata update; every supplied field lands or none does
    pub async fn update_clip_meta(
        &self,
        caller: &OwnerId,
        clip_id: ClipId,
        update: &ClipMetaUpdate,
    ) -> CatalogResult<Clip> {
        let clip = self.owned_clip(caller, clip_id).await?;

        if let Some(Some(session_id)) = update.session_id {
            self.owned_session(caller, session_id).await?;
        }

        if update.is_empty() {
            return Ok(clip);
        }

        let updated = self
            .store
            .update_clip(clip_id, update)
            .await?
            .ok_or(CatalogError::NotFoundOrDenied)?;

        debug!("Updated metadata of clip {} for {}", clip_id, caller);
        Ok(updated)
    }

    pub async fn delete_clip(&self, caller: &OwnerId, clip_id: ClipId) -> CatalogResult<()> {
        self.owned_clip(caller, clip_id).await?;

        if !self.store.delete_clip(clip_id).await? {
            return Err(CatalogError::NotFoundOrDenied);
        }

        info!("Deleted clip {} for {}", clip_id, caller);
        Ok(())
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    pub async fn create_session(&self, caller: &OwnerId, name: &str) -> CatalogResult<Session> {
        let session = self
            .store
            .insert_session(NewSession::new(caller.clone(), name))
            .await?;

        info!("Created session {} '{}' for {}", session.id, session.name, caller);
        Ok(session)
    }

    pub async fn list_sessions(&self, caller: &OwnerId) -> CatalogResult<Vec<Session>> {
        Ok(self.store.scan_sessions_by_owner(caller).await?)
    }

    pub async fn rename_session(
        &self,
        caller: &OwnerId,
        session_id: SessionId,
        name: &str,
    ) -> CatalogResult<Session> {
        self.owned_session(caller, session_id).await?;

        self.store
            .rename_session(session_id, name)
            .await?
            .ok_or(CatalogError::NotFoundOrDenied)
    }

    /// Delete a session; clips that reference it keep the reference
    pub async fn delete_session(
        &self,
        caller: &OwnerId,
        session_id: SessionId,
    ) -> CatalogResult<()> {
        self.owned_session(caller, session_id).await?;

        if !self.store.delete_session(session_id).await? {
            return Err(CatalogError::NotFoundOrDenied);
        }

        info!("Deleted session {} for {}", session_id, caller);
        Ok(())
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    /// Validate a declared upload and reserve an object key for it
    pub fn prepare_upload(
        &self,
        caller: &OwnerId,
        content_type: &str,
        size_bytes: u64,
    ) -> CatalogResult<UploadTicket> {
        let ticket = self.uploads.issue_ticket(caller, content_type, size_bytes)?;
        debug!("Reserved object key {} for {}", ticket.object_key, caller);
        Ok(ticket)
    }

    /// Catalog an upload whose bytes are already in the object store
    ///
    /// Only the reported size is re-validated. The object key must have
    /// been minted for the caller, and any session must be the caller's.
    pub async fn finalize_upload(
        &self,
        caller: &OwnerId,
        mut clip: NewClip,
    ) -> CatalogResult<Clip> {
        if !key_belongs_to(&clip.object_key, caller) {
            return Err(CatalogError::NotFoundOrDenied);
        }
        self.uploads.check_size(clip.size_bytes)?;
        if let Some(session_id) = clip.session_id {
            self.owned_session(caller, session_id).await?;
        }

        clip.owner = caller.clone();
        let clip = self.store.insert_clip(clip).await?;

        info!(
            "Cataloged clip {} ({} bytes) for {}",
            clip.id, clip.size_bytes, caller
        );
        Ok(clip)
    }

    // Private helpers

    async fn owned_clip(&self, caller: &OwnerId, clip_id: ClipId) -> CatalogResult<Clip> {
        match self.store.get_clip(clip_id).await? {
            Some(clip) if clip.owner == *caller => Ok(clip),
            _ => Err(CatalogError::NotFoundOrDenied),
        }
    }

    async fn owned_session(
        &self,
        caller: &OwnerId,
        session_id: SessionId,
    ) -> CatalogResult<Session> {
        match self.store.get_session(session_id).await? {
            Some(session) if session.owner == *caller => Ok(session),
            _ => Err(CatalogError::NotFoundOrDenied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipvault_core::Angle;
    use clipvault_store::{ManualClock, MemoryStore};

    use crate::upload::UploadViolation;

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id).unwrap()
    }

    fn catalog() -> (Catalog, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_clock(Arc::new(ManualClock::at_millis(0))));
        (Catalog::new(store.clone(), UploadPolicy::default()), store)
    }

    async fn upload(catalog: &Catalog, who: &str, tags: &[&str]) -> Clip {
        let caller = owner(who);
        let ticket = catalog.prepare_upload(&caller, "video/mp4", 1024).unwrap();
        let clip =
            NewClip::new(caller.clone(), ticket.object_key, 1024).with_tags(tags.iter().copied());
        catalog.finalize_upload(&caller, clip).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_clip_hides_other_owners() {
        let (catalog, _) = catalog();
        let clip = upload(&catalog, "u1", &["handstand"]).await;

        assert_eq!(catalog.get_clip(&owner("u1"), clip.id).await.unwrap(), clip);

        let denied = catalog.get_clip(&owner("u2"), clip.id).await.unwrap_err();
        let missing = catalog.get_clip(&owner("u2"), ClipId::new()).await.unwrap_err();
        assert!(matches!(denied, CatalogError::NotFoundOrDenied));
        assert_eq!(denied.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn test_cross_owner_update_changes_nothing() {
        let (catalog, store) = catalog();
        let clip = upload(&catalog, "u1", &["handstand"]).await;

        let update = ClipMetaUpdate {
            tags: Some(vec!["stolen".into()]),
            favorite: Some(true),
            ..Default::default()
        };
        let err = catalog.update_clip_meta(&owner("u2"), clip.id, &update).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFoundOrDenied));

        let stored = store.get_clip(clip.id).await.unwrap().unwrap();
        assert_eq!(stored, clip);
    }

    #[tokio::test]
    async fn test_update_with_foreign_session_applies_no_fields() {
        let (catalog, store) = catalog();
        let clip = upload(&catalog, "u1", &["handstand"]).await;
        let foreign = catalog.create_session(&owner("u2"), "Theirs").await.unwrap();

        let update = ClipMetaUpdate {
            favorite: Some(true),
            angle: Some(Some(Angle::Front)),
            session_id: Some(Some(foreign.id)),
            ..Default::default()
        };
        let err = catalog.update_clip_meta(&owner("u1"), clip.id, &update).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFoundOrDenied));

        let stored = store.get_clip(clip.id).await.unwrap().unwrap();
        assert!(!stored.favorite);
        assert_eq!(stored.angle, None);
        assert_eq!(stored.session_id, None);
    }

    #[tokio::test]
    async fn test_update_applies_all_supplied_fields() {
        let (catalog, _) = catalog();
        let clip = upload(&catalog, "u1", &["handstand"]).await;
        let session = catalog.create_session(&owner("u1"), "Monday").await.unwrap();

        let update = ClipMetaUpdate {
            tags: Some(vec!["press".into(), "press".into()]),
            favorite: Some(true),
            session_id: Some(Some(session.id)),
            ..Default::default()
        };
        let updated = catalog.update_clip_meta(&owner("u1"), clip.id, &update).await.unwrap();
        assert_eq!(updated.tags, vec!["press", "press"]);
        assert!(updated.favorite);
        assert_eq!(updated.session_id, Some(session.id));

        let clear = ClipMetaUpdate {
            session_id: Some(None),
            ..Default::default()
        };
        let cleared = catalog.update_clip_meta(&owner("u1"), clip.id, &clear).await.unwrap();
        assert_eq!(cleared.session_id, None);
        assert!(cleared.favorite);
    }

    #[tokio::test]
    async fn test_delete_clip_is_owner_scoped_and_terminal() {
        let (catalog, _) = catalog();
        let clip = upload(&catalog, "u1", &[]).await;

        assert!(matches!(
            catalog.delete_clip(&owner("u2"), clip.id).await,
            Err(CatalogError::NotFoundOrDenied)
        ));
        catalog.delete_clip(&owner("u1"), clip.id).await.unwrap();
        assert!(matches!(
            catalog.get_clip(&owner("u1"), clip.id).await,
            Err(CatalogError::NotFoundOrDenied)
        ));
        assert!(matches!(
            catalog.delete_clip(&owner("u1"), clip.id).await,
            Err(CatalogError::NotFoundOrDenied)
        ));
    }

    #[tokio::test]
    async fn test_deleting_session_leaves_dangling_reference() {
        let (catalog, _) = catalog();
        let session = catalog.create_session(&owner("u1"), "Monday").await.unwrap();
        let clip = upload(&catalog, "u1", &[]).await;
        let update = ClipMetaUpdate {
            session_id: Some(Some(session.id)),
            ..Default::default()
        };
        catalog.update_clip_meta(&owner("u1"), clip.id, &update).await.unwrap();

        catalog.delete_session(&owner("u1"), session.id).await.unwrap();

        let clip = catalog.get_clip(&owner("u1"), clip.id).await.unwrap();
        assert_eq!(clip.session_id, Some(session.id));
        assert!(catalog.list_sessions(&owner("u1")).await.unwrap().is_empty());

        let listed = catalog
            .list_clips(
                &owner("u1"),
                &ClipFilters::new().with_session(session.id),
                &PageRequest::first(10),
            )
            .await
            .unwrap();
        assert_eq!(listed.page.len(), 1);
    }

    #[tokio::test]
    async fn test_session_operations_are_owner_scoped() {
        let (catalog, _) = catalog();
        let session = catalog.create_session(&owner("u1"), "Monday").await.unwrap();

        assert!(matches!(
            catalog.rename_session(&owner("u2"), session.id, "Mine").await,
            Err(CatalogError::NotFoundOrDenied)
        ));
        assert!(matches!(
            catalog.delete_session(&owner("u2"), session.id).await,
            Err(CatalogError::NotFoundOrDenied)
        ));
        assert!(catalog.list_sessions(&owner("u2")).await.unwrap().is_empty());

        let renamed = catalog.rename_session(&owner("u1"), session.id, "Tuesday").await.unwrap();
        assert_eq!(renamed.name, "Tuesday");
        let sessions = catalog.list_sessions(&owner("u1")).await.unwrap();
        assert_eq!(sessions, vec![renamed]);
    }

    #[tokio::test]
    async fn test_listing_and_search_are_owner_scoped() {
        let (catalog, _) = catalog();
        let mine = upload(&catalog, "u1", &["handstand"]).await;
        upload(&catalog, "u2", &["handstand"]).await;

        let listed = catalog
            .list_clips(&owner("u1"), &ClipFilters::new(), &PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(listed.page, vec![mine.clone()]);

        let found = catalog.search_clips(&owner("u1"), "hand", None, None).await.unwrap();
        assert_eq!(found.results, vec![mine]);
    }

    #[tokio::test]
    async fn test_prepare_upload_rejects_invalid_declarations() {
        let (catalog, _) = catalog();
        let too_big = catalog.upload_policy().max_size_bytes + 1;

        assert!(matches!(
            catalog.prepare_upload(&owner("u1"), "video/mp4", too_big),
            Err(CatalogError::Validation(UploadViolation::TooLarge { .. }))
        ));
        assert!(matches!(
            catalog.prepare_upload(&owner("u1"), "application/pdf", 10),
            Err(CatalogError::Validation(UploadViolation::DisallowedType { .. }))
        ));
    }

    #[tokio::test]
    async fn test_finalize_upload_checks_key_size_and_session() {
        let (catalog, _) = catalog();
        let caller = owner("u1");
        let ticket = catalog.prepare_upload(&caller, "video/mp4", 10).unwrap();

        // Key minted for someone else
        let foreign = catalog.prepare_upload(&owner("u2"), "video/mp4", 10).unwrap();
        assert!(matches!(
            catalog
                .finalize_upload(&caller, NewClip::new(caller.clone(), foreign.object_key, 10))
                .await,
            Err(CatalogError::NotFoundOrDenied)
        ));

        // Reported size over the limit
        let too_big = catalog.upload_policy().max_size_bytes + 1;
        assert!(matches!(
            catalog
                .finalize_upload(
                    &caller,
                    NewClip::new(caller.clone(), ticket.object_key.clone(), too_big),
                )
                .await,
            Err(CatalogError::Validation(UploadViolation::TooLarge { .. }))
        ));

        // Session owned by someone else
        let session = catalog.create_session(&owner("u2"), "Theirs").await.unwrap();
        let clip =
            NewClip::new(caller.clone(), ticket.object_key.clone(), 10).with_session(session.id);
        assert!(matches!(
            catalog.finalize_upload(&caller, clip).await,
            Err(CatalogError::NotFoundOrDenied)
        ));

        // Owner on the payload is ignored in favour of the caller
        let clip = NewClip::new(owner("u2"), ticket.object_key.clone(), 10);
        let stored = catalog.finalize_upload(&caller, clip).await.unwrap();
        assert_eq!(stored.owner, caller);
        assert!(!stored.favorite);

        // A key can only be finalized once
        assert!(matches!(
            catalog
                .finalize_upload(&caller, NewClip::new(caller.clone(), ticket.object_key, 10))
                .await,
            Err(CatalogError::Store(_))
        ));
    }
}
