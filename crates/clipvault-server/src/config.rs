//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clipvault_core::OwnerId;
use clipvault_store::{ClipStore, LocalStore, MemoryStore};
use tracing::info;

use crate::error::{Result, ServerError};
use crate::identity::IdentityPolicy;
use crate::upload::UploadPolicy;

/// Address to bind to
pub const ENV_ADDR: &str = "CLIPVAULT_ADDR";
/// Directory of the durable catalog; in-memory when unset
pub const ENV_DATA_DIR: &str = "CLIPVAULT_DATA_DIR";
/// Owner that unauthenticated requests act as. Development only.
pub const ENV_DEV_IDENTITY: &str = "CLIPVAULT_DEV_IDENTITY";
/// Maximum declared upload size in bytes
pub const ENV_MAX_UPLOAD_BYTES: &str = "CLIPVAULT_MAX_UPLOAD_BYTES";
/// Comma-separated list of accepted upload content types
pub const ENV_ALLOWED_TYPES: &str = "CLIPVAULT_ALLOWED_TYPES";

/// Configuration for the Clipvault server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Catalog directory; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    pub dev_identity: Option<OwnerId>,
    pub upload: UploadPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 9877)),
            data_dir: None,
            dev_identity: None,
            upload: UploadPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get(ENV_ADDR) {
            config.addr = addr
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("{}='{}': {}", ENV_ADDR, addr, e)))?;
        }

        config.data_dir = get(ENV_DATA_DIR).map(PathBuf::from);

        if let Some(owner) = get(ENV_DEV_IDENTITY) {
            let owner = OwnerId::new(owner.trim())
                .map_err(|e| ServerError::Config(format!("{}: {}", ENV_DEV_IDENTITY, e)))?;
            config.dev_identity = Some(owner);
        }

        if let Some(max) = get(ENV_MAX_UPLOAD_BYTES) {
            let max: u64 = max.trim().parse().map_err(|e| {
                ServerError::Config(format!("{}='{}': {}", ENV_MAX_UPLOAD_BYTES, max, e))
            })?;
            if max == 0 {
                return Err(ServerError::Config(format!(
                    "{} must be greater than zero",
                    ENV_MAX_UPLOAD_BYTES
                )));
            }
            config.upload.max_size_bytes = max;
        }

        if let Some(types) = get(ENV_ALLOWED_TYPES) {
            let types: Vec<String> = types
                .split(',')
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            if types.is_empty() {
                return Err(ServerError::Config(format!(
                    "{} lists no content types",
                    ENV_ALLOWED_TYPES
                )));
            }
            config.upload.allowed_content_types = types;
        }

        Ok(config)
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn with_dev_identity(mut self, owner: OwnerId) -> Self {
        self.dev_identity = Some(owner);
        self
    }

    /// Open the configured store
    pub async fn open_store(&self) -> Result<Arc<dyn ClipStore>> {
        match &self.data_dir {
            Some(dir) => {
                let store = LocalStore::open_or_create(dir).await?;
                info!("Using catalog at {:?}", store.path);
                Ok(Arc::new(store))
            }
            None => {
                info!("Using in-memory catalog");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    pub fn identity_policy(&self) -> IdentityPolicy {
        match &self.dev_identity {
            Some(owner) => IdentityPolicy::with_dev_identity(owner.clone()),
            None => IdentityPolicy::strict(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "127.0.0.1:9877".parse::<SocketAddr>().unwrap());
        assert!(config.data_dir.is_none());
        assert!(config.dev_identity.is_none());
        assert_eq!(config.upload, UploadPolicy::default());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_ADDR, "0.0.0.0:8000"),
            (ENV_DATA_DIR, "/var/lib/clipvault"),
            (ENV_DEV_IDENTITY, "dev-user"),
            (ENV_MAX_UPLOAD_BYTES, "1048576"),
            (ENV_ALLOWED_TYPES, "video/mp4, Video/WebM"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/clipvault")));
        assert_eq!(config.dev_identity.unwrap().as_str(), "dev-user");
        assert_eq!(config.upload.max_size_bytes, 1_048_576);
        assert_eq!(config.upload.allowed_content_types, vec!["video/mp4", "video/webm"]);
    }

    #[test]
    fn test_blank_dev_identity_keeps_strict_policy() {
        let config = ServerConfig::from_lookup(lookup(&[(ENV_DEV_IDENTITY, "   ")])).unwrap();
        assert!(config.dev_identity.is_none());
        assert!(config.identity_policy().dev_identity().is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(ENV_ADDR, "not-an-addr")])),
            Err(ServerError::Config(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(ENV_MAX_UPLOAD_BYTES, "lots")])),
            Err(ServerError::Config(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(ENV_MAX_UPLOAD_BYTES, "0")])),
            Err(ServerError::Config(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(ENV_ALLOWED_TYPES, " , ")])),
            Err(ServerError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_open_store_uses_data_dir() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("catalog");
        let config = ServerConfig::default().with_data_dir(&dir);

        let store = config.open_store().await.unwrap();
        assert!(dir.join("manifest.json").exists());
        let owner = OwnerId::new("u1").unwrap();
        assert!(store.scan_sessions_by_owner(&owner).await.unwrap().is_empty());
    }
}
