//! Session types - named groupings of clips

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::OwnerId;

/// Unique identifier for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random SessionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a SessionId from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping of clips belonging to one owner
///
/// Clips point at sessions, not the other way round. Deleting a session
/// leaves the clips that referenced it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,

    /// Owner the session is permanently bound to
    pub owner: OwnerId,

    /// Display name
    pub name: String,

    pub created_at: DateTime<Utc>,
}

/// Fields for a session that is about to be inserted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    pub owner: OwnerId,
    pub name: String,
}

impl NewSession {
    pub fn new(owner: OwnerId, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }

    /// Build the stored record
    pub fn into_session(self, id: SessionId, created_at: DateTime<Utc>) -> Session {
        Session {
            id,
            owner: self.owner,
            name: self.name,
            created_at,
        }
    }
}
