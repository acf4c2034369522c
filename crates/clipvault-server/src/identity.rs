//! Caller identity resolution
//!
//! The `caller` on a request is trusted as asserted. Authentication happens
//! in the layer fronting this server, which must set or overwrite `caller`
//! on every request it forwards. The server must never be reachable
//! without that layer in front of it: a direct client can act as any owner.

use clipvault_core::OwnerId;
use tracing::warn;

use crate::error::{CatalogError, CatalogResult};

/// Decides who a request acts as
///
/// The policy is fixed when the server starts. With no development
/// identity configured, a request without an authenticated caller is
/// rejected; nothing falls back implicitly.
#[derive(Debug, Clone, Default)]
pub struct IdentityPolicy {
    dev_identity: Option<OwnerId>,
}

impl IdentityPolicy {
    /// Only authenticated callers are accepted
    pub fn strict() -> Self {
        Self { dev_identity: None }
    }

    /// Unauthenticated requests act as `owner`. Development use only.
    pub fn with_dev_identity(owner: OwnerId) -> Self {
        warn!(
            "Development identity enabled: unauthenticated requests act as '{}'",
            owner
        );
        Self {
            dev_identity: Some(owner),
        }
    }

    pub fn dev_identity(&self) -> Option<&OwnerId> {
        self.dev_identity.as_ref()
    }

    /// Resolve the caller for one request
    pub fn resolve(&self, asserted: Option<OwnerId>) -> CatalogResult<OwnerId> {
        asserted
            .or_else(|| self.dev_identity.clone())
            .ok_or(CatalogError::Unauthenticated)
    }
}
