//! Common RPC types
//!
//! Every request carries `caller`, the identity asserted by whatever
//! authentication layer fronts the server. When it is absent the server
//! applies its configured identity policy.

use chrono::{DateTime, Utc};
use clipvault_core::{
    Angle, Apparatus, Clip, ClipFilters, ClipId, ClipMetaUpdate, OwnerId, PageRequest, Session,
    SessionId,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Clip Operations
// ============================================================================

/// Request to list clips matching a set of filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListClipsRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    #[serde(default)]
    pub filters: ClipFilters,
    #[serde(default)]
    pub pagination: PageRequest,
}

/// Request to search clips by free text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchClipsRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub query: String,
    /// Page size; absent or zero means 20
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Response with one page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchClipsResponse {
    pub results: Vec<Clip>,
    pub cursor: Option<String>,
    pub is_done: bool,
}

/// Request to get a clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetClipRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub clip_id: ClipId,
}

/// Response with a clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipResponse {
    pub clip: Clip,
}

/// Request to update a clip's descriptive metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClipMetaRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub clip_id: ClipId,
    pub update: ClipMetaUpdate,
}

/// Request to delete a clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteClipRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub clip_id: ClipId,
}

// ============================================================================
// Session Operations
// ============================================================================

/// Request to create a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub name: String,
}

/// Response with a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
}

/// Request to list the caller's sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSessionsRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
}

/// Response with sessions, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<Session>,
}

/// Request to rename a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameSessionRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub session_id: SessionId,
    pub name: String,
}

/// Request to delete a session (clips referencing it are kept)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSessionRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub session_id: SessionId,
}

// ============================================================================
// Upload Operations
// ============================================================================

/// Request to reserve an object key for an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareUploadRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub content_type: String,
    pub size_bytes: u64,
}

/// Response with the reserved object key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareUploadResponse {
    pub object_key: String,
    /// The upload must be finalized before this instant
    pub expires_at: DateTime<Utc>,
}

/// Request to catalog an upload whose bytes are in the object store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalizeUploadRequest {
    #[serde(default)]
    pub caller: Option<OwnerId>,
    pub object_key: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub angle: Option<Angle>,
    #[serde(default)]
    pub apparatus: Option<Apparatus>,
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

impl FinalizeUploadRequest {
    pub fn new(object_key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            object_key: object_key.into(),
            size_bytes,
            ..Default::default()
        }
    }
}

// ============================================================================
// Common Response Types
// ============================================================================

/// Empty success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyResponse {}
