//! RPC method definitions using jsonrpsee

use clipvault_core::{Clip, Page};
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::types::ErrorObjectOwned;

use crate::types::*;

/// Clipvault RPC API
///
/// This defines all available RPC methods for the Clipvault server.
#[rpc(server, client, namespace = "clipvault")]
pub trait ClipvaultApi {
    // ========================================================================
    // Clip Operations
    // ========================================================================

    /// List the caller's clips matching a set of filters, newest first
    #[method(name = "listClips")]
    async fn list_clips(&self, request: ListClipsRequest) -> Result<Page<Clip>, ErrorObjectOwned>;

    /// Search the caller's clips by free text
    #[method(name = "searchClips")]
    async fn search_clips(
        &self,
        request: SearchClipsRequest,
    ) -> Result<SearchClipsResponse, ErrorObjectOwned>;

    /// Get a single clip
    #[method(name = "getClip")]
    async fn get_clip(&self, request: GetClipRequest) -> Result<ClipResponse, ErrorObjectOwned>;

    /// Update a clip's tags, angle, apparatus, favorite flag or session
    #[method(name = "updateClipMeta")]
    async fn update_clip_meta(
        &self,
        request: UpdateClipMetaRequest,
    ) -> Result<ClipResponse, ErrorObjectOwned>;

    /// Delete a clip
    #[method(name = "deleteClip")]
    async fn delete_clip(
        &self,
        request: DeleteClipRequest,
    ) -> Result<EmptyResponse, ErrorObjectOwned>;

    // ========================================================================
    // Session Operations
    // ========================================================================

    /// Create a new session
    #[method(name = "createSession")]
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<SessionResponse, ErrorObjectOwned>;

    /// List the caller's sessions
    #[method(name = "listSessions")]
    async fn list_sessions(
        &self,
        request: ListSessionsRequest,
    ) -> Result<ListSessionsResponse, ErrorObjectOwned>;

    /// Rename a session
    #[method(name = "renameSession")]
    async fn rename_session(
        &self,
        request: RenameSessionRequest,
    ) -> Result<SessionResponse, ErrorObjectOwned>;

    /// Delete a session
    #[method(name = "deleteSession")]
    async fn delete_session(
        &self,
        request: DeleteSessionRequest,
    ) -> Result<EmptyResponse, ErrorObjectOwned>;

    // ========================================================================
    // Upload Operations
    // ========================================================================

    /// Validate an upload and reserve an object key for it
    #[method(name = "prepareUpload")]
    async fn prepare_upload(
        &self,
        request: PrepareUploadRequest,
    ) -> Result<PrepareUploadResponse, ErrorObjectOwned>;

    /// Catalog an upload once its bytes are stored
    #[method(name = "finalizeUpload")]
    async fn finalize_upload(
        &self,
        request: FinalizeUploadRequest,
    ) -> Result<ClipResponse, ErrorObjectOwned>;
}
