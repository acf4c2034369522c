//! RPC client implementation

use clipvault_core::{
    Clip, ClipFilters, ClipId, ClipMetaUpdate, OwnerId, Page, PageRequest, Session, SessionId,
};
use clipvault_rpc::{
    ClipvaultApiClient, CreateSessionRequest, DeleteClipRequest, DeleteSessionRequest,
    FinalizeUploadRequest, GetClipRequest, ListClipsRequest, ListSessionsRequest,
    PrepareUploadRequest, PrepareUploadResponse, RenameSessionRequest, SearchClipsRequest,
    SearchClipsResponse, UpdateClipMetaRequest,
};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use tracing::debug;
use url::Url;

use crate::error::{ClientError, Result};

/// Client for connecting to a Clipvault server
///
/// When a caller is set, every request asserts it. Otherwise requests go
/// out anonymously and the server's identity policy decides.
pub struct ClipvaultClient {
    client: HttpClient,
    base_url: Url,
    caller: Option<OwnerId>,
}

impl ClipvaultClient {
    /// Connect to a Clipvault server
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let base_url: Url = url
            .as_ref()
            .parse()
            .map_err(|e| ClientError::Connection(format!("Invalid URL: {}", e)))?;

        let client = HttpClientBuilder::default()
            .build(&base_url)
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        debug!("Connected to Clipvault server at {}", base_url);

        Ok(Self {
            client,
            base_url,
            caller: None,
        })
    }

    /// Assert `caller` on every request
    pub fn with_caller(mut self, caller: OwnerId) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn caller(&self) -> Option<&OwnerId> {
        self.caller.as_ref()
    }

    /// Get the server URL
    pub fn url(&self) -> &Url {
        &self.base_url
    }

    // ========================================================================
    // Clip Operations
    // ========================================================================

    /// List clips matching `filters`, newest first
    pub async fn list_clips(
        &self,
        filters: ClipFilters,
        pagination: PageRequest,
    ) -> Result<Page<Clip>> {
        let request = ListClipsRequest {
            caller: self.caller.clone(),
            filters,
            pagination,
        };
        Ok(self.client.list_clips(request).await?)
    }

    /// Search clips by free text
    pub async fn search_clips(
        &self,
        query: impl Into<String>,
        limit: Option<usize>,
        cursor: Option<String>,
    ) -> Result<SearchClipsResponse> {
        let request = SearchClipsRequest {
            caller: self.caller.clone(),
            query: query.into(),
            limit,
            cursor,
        };
        Ok(self.client.search_clips(request).await?)
    }

    pub async fn get_clip(&self, clip_id: ClipId) -> Result<Clip> {
        let request = GetClipRequest {
            caller: self.caller.clone(),
            clip_id,
        };
        Ok(self.client.get_clip(request).await?.clip)
    }

    /// Update a clip's descriptive metadata
    pub async fn update_clip_meta(&self, clip_id: ClipId, update: ClipMetaUpdate) -> Result<Clip> {
        let request = UpdateClipMetaRequest {
            caller: self.caller.clone(),
            clip_id,
            update,
        };
        Ok(self.client.update_clip_meta(request).await?.clip)
    }

    pub async fn delete_clip(&self, clip_id: ClipId) -> Result<()> {
        let request = DeleteClipRequest {
            caller: self.caller.clone(),
            clip_id,
        };
        self.client.delete_clip(request).await?;
        Ok(())
    }

    // ========================================================================
    // Session Operations
    // ========================================================================

    pub async fn create_session(&self, name: impl Into<String>) -> Result<Session> {
        let request = CreateSessionRequest {
            caller: self.caller.clone(),
            name: name.into(),
        };
        Ok(self.client.create_session(request).await?.session)
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        let request = ListSessionsRequest {
            caller: self.caller.clone(),
        };
        Ok(self.client.list_sessions(request).await?.sessions)
    }

    pub async fn rename_session(
        &self,
        session_id: SessionId,
        name: impl Into<String>,
    ) -> Result<Session> {
        let request = RenameSessionRequest {
            caller: self.caller.clone(),
            session_id,
            name: name.into(),
        };
        Ok(self.client.rename_session(request).await?.session)
    }

    /// Delete a session; clips referencing it are kept
    pub async fn delete_session(&self, session_id: SessionId) -> Result<()> {
        let request = DeleteSessionRequest {
            caller: self.caller.clone(),
            session_id,
        };
        self.client.delete_session(request).await?;
        Ok(())
    }

    // ========================================================================
    // Upload Operations
    // ========================================================================

    /// Reserve an object key for an upload of `size_bytes`
    pub async fn prepare_upload(
        &self,
        content_type: impl Into<String>,
        size_bytes: u64,
    ) -> Result<PrepareUploadResponse> {
        let request = PrepareUploadRequest {
            caller: self.caller.clone(),
            content_type: content_type.into(),
            size_bytes,
        };
        Ok(self.client.prepare_upload(request).await?)
    }

    /// Catalog a stored upload. The request's `caller` is replaced by the
    /// client's own.
    pub async fn finalize_upload(&self, mut request: FinalizeUploadRequest) -> Result<Clip> {
        request.caller = self.caller.clone();
        Ok(self.client.finalize_upload(request).await?.clip)
    }
}
