//! Upload validation at the object-store boundary
//!
//! The catalog never sees clip bytes. It validates what the uploader
//! declares up front, mints the object key, and re-checks the size reported
//! when the upload is finalized.

use chrono::{DateTime, Duration, Utc};
use clipvault_core::OwnerId;
use thiserror::Error;
use uuid::Uuid;

/// Default maximum clip size (500 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Content types accepted when none are configured
pub const DEFAULT_CONTENT_TYPES: &[&str] = &["video/mp4", "video/quicktime", "video/webm"];

/// Prefix under which every clip object key is minted
const KEY_PREFIX: &str = "clips";

/// Why an upload was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadViolation {
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("Empty upload: size must be at least 1 byte")]
    Empty,

    #[error("Content type '{content_type}' not allowed (allowed: {allowed})")]
    DisallowedType { content_type: String, allowed: String },
}

/// Limits applied to uploads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    /// How long a reserved object key stays valid
    pub ticket_ttl: Duration,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_content_types: DEFAULT_CONTENT_TYPES.iter().map(|t| t.to_string()).collect(),
            ticket_ttl: Duration::minutes(15),
        }
    }
}

/// An object key reserved for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub object_key: String,
    pub expires_at: DateTime<Utc>,
}

impl UploadPolicy {
    pub fn check_size(&self, size: u64) -> Result<(), UploadViolation> {
        if size == 0 {
            return Err(UploadViolation::Empty);
        }
        if size > self.max_size_bytes {
            return Err(UploadViolation::TooLarge {
                size,
                limit: self.max_size_bytes,
            });
        }
        Ok(())
    }

    pub fn check_content_type(&self, content_type: &str) -> Result<(), UploadViolation> {
        let normalized = normalize_content_type(content_type);
        if self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&normalized))
        {
            Ok(())
        } else {
            Err(UploadViolation::DisallowedType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.join(", "),
            })
        }
    }

    /// Validate a declared upload and mint a fresh object key for it
    pub fn issue_ticket(
        &self,
        owner: &OwnerId,
        content_type: &str,
        size: u64,
    ) -> Result<UploadTicket, UploadViolation> {
        self.check_content_type(content_type)?;
        self.check_size(size)?;

        let extension = extension_for(&normalize_content_type(content_type));
        Ok(UploadTicket {
            object_key: format!("{}/{}/{}.{}", KEY_PREFIX, owner, Uuid::new_v4(), extension),
            expires_at: Utc::now() + self.ticket_ttl,
        })
    }
}

/// Check that an object key was minted for `owner`
pub fn key_belongs_to(object_key: &str, owner: &OwnerId) -> bool {
    let prefix = format!("{}/{}/", KEY_PREFIX, owner);
    object_key
        .strip_prefix(&prefix)
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/') && !rest.contains('\n'))
}

/// Drop parameters such as `; codecs=...` and lower-case
fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/webm" => "webm",
        _ => "bin",
    }
}
