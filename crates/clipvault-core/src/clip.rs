//! Clip types - catalogued media assets

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::{OwnerId, SessionId};

/// Unique identifier for a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    /// Create a new random ClipId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a ClipId from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Camera angle a clip was filmed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Angle {
    Front,
    Side,
    #[serde(rename = "45")]
    FortyFive,
}

impl Angle {
    /// Label used on the wire and in searchable text
    pub fn as_str(&self) -> &'static str {
        match self {
            Angle::Front => "front",
            Angle::Side => "side",
            Angle::FortyFive => "45",
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Angle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(Angle::Front),
            "side" => Ok(Angle::Side),
            "45" => Ok(Angle::FortyFive),
            _ => Err(CoreError::InvalidAngle(s.to_string())),
        }
    }
}

/// Apparatus a clip was recorded on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Apparatus {
    Floor,
    Rings,
    Bar,
    Parallettes,
}

impl Apparatus {
    /// Label used on the wire and in searchable text
    pub fn as_str(&self) -> &'static str {
        match self {
            Apparatus::Floor => "floor",
            Apparatus::Rings => "rings",
            Apparatus::Bar => "bar",
            Apparatus::Parallettes => "parallettes",
        }
    }
}

impl fmt::Display for Apparatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Apparatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "floor" => Ok(Apparatus::Floor),
            "rings" => Ok(Apparatus::Rings),
            "bar" => Ok(Apparatus::Bar),
            "parallettes" => Ok(Apparatus::Parallettes),
            _ => Err(CoreError::InvalidApparatus(s.to_string())),
        }
    }
}

/// A Clip is one media asset held in the object store
///
/// The owner and object key are fixed when the clip is created. Everything
/// under "descriptive metadata" can be changed by the owner through a
/// `ClipMetaUpdate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique identifier for this clip
    pub id: ClipId,

    /// Owner the clip is permanently bound to
    pub owner: OwnerId,

    /// Object-store key holding the clip bytes (globally unique, never reused)
    pub object_key: String,

    /// Assigned by the store at insert; primary sort key for listings
    pub created_at: DateTime<Utc>,

    /// Size reported when the upload was finalized
    pub size_bytes: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    // Descriptive metadata
    /// Free-text tags, order and case preserved, duplicates allowed
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub angle: Option<Angle>,

    #[serde(default)]
    pub apparatus: Option<Apparatus>,

    #[serde(default)]
    pub favorite: bool,

    /// Session this clip is grouped under; may outlive the session itself
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

impl Clip {
    /// Apply a metadata update, replacing every supplied field
    pub fn apply(&mut self, update: &ClipMetaUpdate) {
        if let Some(tags) = &update.tags {
            self.tags = tags.clone();
        }
        if let Some(angle) = update.angle {
            self.angle = angle;
        }
        if let Some(apparatus) = update.apparatus {
            self.apparatus = apparatus;
        }
        if let Some(favorite) = update.favorite {
            self.favorite = favorite;
        }
        if let Some(session_id) = update.session_id {
            self.session_id = session_id;
        }
    }
}

/// Fields for a clip that is about to be inserted
///
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClip {
    pub owner: OwnerId,
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
    pub favorite: bool,
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

impl NewClip {
    /// Create a bare clip with no descriptive metadata
    pub fn new(owner: OwnerId, object_key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            owner,
            object_key: object_key.into(),
            size_bytes,
            duration_secs: None,
            width: None,
            height: None,
            tags: Vec::new(),
            angle: None,
            apparatus: None,
            favorite: false,
            session_id: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_angle(mut self, angle: Angle) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn with_apparatus(mut self, apparatus: Apparatus) -> Self {
        self.apparatus = Some(apparatus);
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Build the stored record
    pub fn into_clip(self, id: ClipId, created_at: DateTime<Utc>) -> Clip {
        Clip {
            id,
            owner: self.owner,
            object_key: self.object_key,
            created_at,
            size_bytes: self.size_bytes,
            duration_secs: self.duration_secs,
            width: self.width,
            height: self.height,
            tags: self.tags,
            angle: self.angle,
            apparatus: self.apparatus,
            favorite: self.favorite,
            session_id: self.session_id,
        }
    }
}

/// Partial update of a clip's descriptive metadata
///
/// A missing field leaves the stored value untouched. For the nullable
/// fields, an explicit `null` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipMetaUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub angle: Option<Option<Angle>>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub apparatus: Option<Option<Apparatus>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub session_id: Option<Option<SessionId>>,
}

impl ClipMetaUpdate {
    /// True when the update carries no fields
    pub fn is_empty(&self) -> bool {
        self.tags.is_none()
            && self.angle.is_none()
            && self.apparatus.is_none()
            && self.favorite.is_none()
            && self.session_id.is_none()
    }
}

/// Serde helper distinguishing a missing field from an explicit null
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
