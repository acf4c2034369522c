//! RPC method handlers

use std::sync::Arc;

use clipvault_core::{Clip, NewClip, OwnerId, Page};
use clipvault_rpc::{
    ClipResponse, ClipvaultApiServer, CreateSessionRequest, DeleteClipRequest,
    DeleteSessionRequest, EmptyResponse, FinalizeUploadRequest, GetClipRequest, ListClipsRequest,
    ListSessionsRequest, ListSessionsResponse, PrepareUploadRequest, PrepareUploadResponse,
    RenameSessionRequest, RpcError, SearchClipsRequest, SearchClipsResponse, SessionResponse,
    UpdateClipMetaRequest,
};
use jsonrpsee::core::async_trait;
use jsonrpsee::types::ErrorObjectOwned;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::identity::IdentityPolicy;

/// RPC handler implementation
pub struct RpcHandler {
    catalog: Arc<Catalog>,
    identity: IdentityPolicy,
}

impl RpcHandler {
    pub fn new(catalog: Arc<Catalog>, identity: IdentityPolicy) -> Self {
        Self { catalog, identity }
    }

    fn caller(&self, asserted: Option<OwnerId>) -> Result<OwnerId, ErrorObjectOwned> {
        self.identity.resolve(asserted).map_err(reject)
    }
}

fn reject(e: CatalogError) -> ErrorObjectOwned {
    RpcError::from(e).into()
}

#[async_trait]
impl ClipvaultApiServer for RpcHandler {
    async fn list_clips(&self, request: ListClipsRequest) -> Result<Page<Clip>, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        debug!("Listing clips for {} with {:?}", caller, request.filters);

        self.catalog
            .list_clips(&caller, &request.filters, &request.pagination)
            .await
            .map_err(reject)
    }

    async fn search_clips(
        &self,
        request: SearchClipsRequest,
    ) -> Result<SearchClipsResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        debug!("Searching clips for {}: '{}'", caller, request.query);

        let page = self
            .catalog
            .search_clips(&caller, &request.query, request.limit, request.cursor.as_deref())
            .await
            .map_err(reject)?;

        Ok(SearchClipsResponse {
            results: page.results,
            cursor: page.cursor,
            is_done: page.is_done,
        })
    }

    async fn get_clip(&self, request: GetClipRequest) -> Result<ClipResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        let clip = self
            .catalog
            .get_clip(&caller, request.clip_id)
            .await
            .map_err(reject)?;
        Ok(ClipResponse { clip })
    }

    async fn update_clip_meta(
        &self,
        request: UpdateClipMetaRequest,
    ) -> Result<ClipResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        info!("Updating clip {} for {}", request.clip_id, caller);

        let clip = self
            .catalog
            .update_clip_meta(&caller, request.clip_id, &request.update)
            .await
            .map_err(reject)?;
        Ok(ClipResponse { clip })
    }

    async fn delete_clip(
        &self,
        request: DeleteClipRequest,
    ) -> Result<EmptyResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        self.catalog
            .delete_clip(&caller, request.clip_id)
            .await
            .map_err(reject)?;
        Ok(EmptyResponse {})
    }

    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<SessionResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        let session = self
            .catalog
            .create_session(&caller, &request.name)
            .await
            .map_err(reject)?;
        Ok(SessionResponse { session })
    }

    async fn list_sessions(
        &self,
        request: ListSessionsRequest,
    ) -> Result<ListSessionsResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        let sessions = self.catalog.list_sessions(&caller).await.map_err(reject)?;
        Ok(ListSessionsResponse { sessions })
    }

    async fn rename_session(
        &self,
        request: RenameSessionRequest,
    ) -> Result<SessionResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        info!("Renaming session {} to '{}'", request.session_id, request.name);

        let session = self
            .catalog
            .rename_session(&caller, request.session_id, &request.name)
            .await
            .map_err(reject)?;
        Ok(SessionResponse { session })
    }

    async fn delete_session(
        &self,
        request: DeleteSessionRequest,
    ) -> Result<EmptyResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        self.catalog
            .delete_session(&caller, request.session_id)
            .await
            .map_err(reject)?;
        Ok(EmptyResponse {})
    }

    async fn prepare_upload(
        &self,
        request: PrepareUploadRequest,
    ) -> Result<PrepareUploadResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;
        let ticket = self
            .catalog
            .prepare_upload(&caller, &request.content_type, request.size_bytes)
            .map_err(reject)?;

        Ok(PrepareUploadResponse {
            object_key: ticket.object_key,
            expires_at: ticket.expires_at,
        })
    }

    async fn finalize_upload(
        &self,
        request: FinalizeUploadRequest,
    ) -> Result<ClipResponse, ErrorObjectOwned> {
        let caller = self.caller(request.caller)?;

        let new_clip = NewClip {
            owner: caller.clone(),
            object_key: request.object_key,
            size_bytes: request.size_bytes,
            duration_secs: request.duration_secs,
            width: request.width,
            height: request.height,
            tags: request.tags,
            angle: request.angle,
            apparatus: request.apparatus,
            favorite: false,
            session_id: request.session_id,
        };

        let clip = self
            .catalog
            .finalize_upload(&caller, new_clip)
            .await
            .map_err(reject)?;
        Ok(ClipResponse { clip })
    }
}
