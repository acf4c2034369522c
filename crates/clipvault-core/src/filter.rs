//! Listing filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Angle, Apparatus, SessionId};

/// Inclusive bounds on a clip's creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Check whether a timestamp lies within the range, bounds included
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// An inverted range matches nothing
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Structured predicate set for clip listings
///
/// Every field is optional and an absent field imposes no constraint.
/// Supplied fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipFilters {
    /// Matches clips carrying at least one of these tags (exact, case-sensitive).
    /// An empty list is treated as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Matches clips filmed from this angle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<Angle>,

    /// Matches clips recorded on this apparatus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparatus: Option<Apparatus>,

    /// Matches clips whose favorite flag equals this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,

    /// Matches clips grouped under this session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,

    /// Restricts the scan to clips created within this range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl ClipFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
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
        self.favorite = Some(favorite);
        self
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }
}
