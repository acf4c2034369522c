//! Local file-based store implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clipvault_core::{
    Clip, ClipId, ClipMetaUpdate, DateRange, NewClip, NewSession, OwnerId, Session, SessionId,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StoreError};
use crate::records::Records;
use crate::store::ClipStore;

/// Catalog manifest - metadata stored in manifest.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    /// Schema version for forward compatibility
    pub version: u32,

    /// When the catalog was created
    pub created_at: DateTime<Utc>,
}

impl CatalogManifest {
    /// Current schema version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            created_at: Utc::now(),
        }
    }
}

impl Default for CatalogManifest {
    fn default() -> Self {
        Self::new()
    }
}

/// A local store backed by the filesystem
///
/// Directory structure:
/// ```text
/// catalog.clipvault/
/// ├── manifest.json      # Catalog metadata
/// ├── clips/
/// │   ├── {clip-id}.json # One file per clip
/// │   └── ...
/// ├── sessions/
/// │   └── {session-id}.json
/// └── keys.log           # Every object key ever issued, one per line
/// ```
///
/// All records are loaded into memory on open. Every mutation is written to
/// disk before it becomes visible to readers.
pub struct LocalStore {
    /// Path to the store directory
    pub path: PathBuf,

    manifest: CatalogManifest,
    records: RwLock<Records>,
    clock: Arc<dyn Clock>,
}

impl LocalStore {
    /// Subdirectory names
    const CLIPS_DIR: &'static str = "clips";
    const SESSIONS_DIR: &'static str = "sessions";
    const MANIFEST_FILE: &'static str = "manifest.json";
    const KEYS_FILE: &'static str = "keys.log";

    /// Create a new local store at the given path
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            return Err(StoreError::StoreExists(path.display().to_string()));
        }

        fs::create_dir_all(&path).await?;
        fs::create_dir(path.join(Self::CLIPS_DIR)).await?;
        fs::create_dir(path.join(Self::SESSIONS_DIR)).await?;
        fs::write(path.join(Self::KEYS_FILE), b"").await?;

        let manifest = CatalogManifest::new();
        write_json(&path.join(Self::MANIFEST_FILE), &manifest).await?;

        info!("Created local catalog at {:?}", path);
        Ok(Self {
            path,
            manifest,
            records: RwLock::new(Records::default()),
            clock: Arc::new(SystemClock),
        })
    }

    /// Open an existing local store, loading every record
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let manifest_path = path.join(Self::MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(StoreError::InvalidPath(format!(
                "No manifest found at {}",
                manifest_path.display()
            )));
        }

        let manifest: CatalogManifest = read_json(&manifest_path).await?;
        if manifest.version > CatalogManifest::CURRENT_VERSION {
            return Err(StoreError::UnsupportedVersion(manifest.version));
        }

        let mut records = Records::default();

        let clips: Vec<Clip> = load_dir(&path.join(Self::CLIPS_DIR)).await?;
        let clip_count = clips.len();
        for clip in clips {
            records.observe_timestamp(clip.created_at);
            records.put_clip(clip);
        }

        let sessions: Vec<Session> = load_dir(&path.join(Self::SESSIONS_DIR)).await?;
        let session_count = sessions.len();
        for session in sessions {
            records.observe_timestamp(session.created_at);
            records.put_session(session);
        }

        let keys_path = path.join(Self::KEYS_FILE);
        if keys_path.exists() {
            let keys = fs::read_to_string(&keys_path).await?;
            for key in keys.lines().filter(|line| !line.is_empty()) {
                records.remember_key(key);
            }
        }

        info!(
            "Opened local catalog at {:?} ({} clips, {} sessions)",
            path, clip_count, session_count
        );

        Ok(Self {
            path,
            manifest,
            records: RwLock::new(records),
            clock: Arc::new(SystemClock),
        })
    }

    /// Open the store at `path`, creating it if nothing is there yet
    pub async fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.join(Self::MANIFEST_FILE).exists() {
            Self::open(path).await
        } else {
            Self::create(path).await
        }
    }

    /// Replace the clock used to stamp new records
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the catalog manifest
    pub fn manifest(&self) -> &CatalogManifest {
        &self.manifest
    }

    // Private helpers

    fn clip_path(&self, id: ClipId) -> PathBuf {
        self.path.join(Self::CLIPS_DIR).join(format!("{}.json", id))
    }

    fn session_path(&self, id: SessionId) -> PathBuf {
        self.path.join(Self::SESSIONS_DIR).join(format!("{}.json", id))
    }

    async fn append_key(&self, key: &str) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.join(Self::KEYS_FILE))
            .await?;
        file.write_all(format!("{}\n", key).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Record file already gone: {:?}", path);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ClipStore for LocalStore {
    async fn insert_clip(&self, clip: NewClip) -> Result<Clip> {
        let mut records = self.records.write().await;
        let clip = records.prepare_clip(clip, self.clock.as_ref())?;

        // The key is reserved only once the record is durable. A clip file
        // without its keys.log line is rolled back so a retry can succeed.
        let path = self.clip_path(clip.id);
        write_json(&path, &clip).await?;
        if let Err(e) = self.append_key(&clip.object_key).await {
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!("Could not roll back clip file {:?}: {}", path, cleanup);
            }
            return Err(e);
        }
        records.put_clip(clip.clone());

        debug!("Saved clip {} to disk", clip.id);
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

        write_json(&self.clip_path(id), &clip).await?;
        records.put_clip(clip.clone());

        debug!("Updated clip {} on disk", id);
        Ok(Some(clip))
    }

    async fn delete_clip(&self, id: ClipId) -> Result<bool> {
        let mut records = self.records.write().await;
        if records.clip(id).is_none() {
            return Ok(false);
        }

        self.remove_file(&self.clip_path(id)).await?;
        records.remove_clip(id);

        debug!("Deleted clip {} from disk", id);
        Ok(true)
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

        write_json(&self.session_path(session.id), &session).await?;
        records.put_session(session.clone());

        debug!("Saved session {} to disk", session.id);
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

        write_json(&self.session_path(id), &session).await?;
        records.put_session(session.clone());
        Ok(Some(session))
    }

    async fn delete_session(&self, id: SessionId) -> Result<bool> {
        let mut records = self.records.write().await;
        if records.session(id).is_none() {
            return Ok(false);
        }

        self.remove_file(&self.session_path(id)).await?;
        records.remove_session(id);

        debug!("Deleted session {} from disk", id);
        Ok(true)
    }

    async fn scan_sessions_by_owner(&self, owner: &OwnerId) -> Result<Vec<Session>> {
        Ok(self.records.read().await.scan_sessions(owner))
    }
}

/// Write JSON to a sibling temp file, then rename over the target
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json)?)
}

/// Load every `*.json` record in a directory
async fn load_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut items = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "json") {
            items.push(read_json(&path).await?);
        }
    }

    Ok(items)
}
