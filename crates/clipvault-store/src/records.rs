//! In-memory record tables and owner indexes shared by the store backends

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use clipvault_core::{
    Clip, ClipId, DateRange, NewClip, NewSession, OwnerId, Session, SessionId,
};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{Result, StoreError};

type OwnerIndex<Id> = HashMap<OwnerId, BTreeSet<(DateTime<Utc>, Id)>>;

/// Record tables plus per-owner indexes keyed by `(created_at, id)`
///
/// Iterating an index in reverse yields newest first, with the record id as
/// the tie-break for identical timestamps.
#[derive(Default)]
pub(crate) struct Records {
    clips: HashMap<ClipId, Clip>,
    sessions: HashMap<SessionId, Session>,
    clips_by_owner: OwnerIndex<ClipId>,
    sessions_by_owner: OwnerIndex<SessionId>,
    /// Every object key ever inserted, including deleted clips'
    object_keys: HashSet<String>,
    last_assigned: Option<DateTime<Utc>>,
}

impl Records {
    /// Next creation timestamp, strictly greater than any assigned before
    pub fn next_timestamp(&mut self, clock: &dyn Clock) -> DateTime<Utc> {
        let now = clock.now();
        let at = match self.last_assigned {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_assigned = Some(at);
        at
    }

    /// Raise the timestamp floor to cover a record loaded from disk
    pub fn observe_timestamp(&mut self, at: DateTime<Utc>) {
        if self.last_assigned.map_or(true, |last| at > last) {
            self.last_assigned = Some(at);
        }
    }

    pub fn remember_key(&mut self, key: impl Into<String>) {
        self.object_keys.insert(key.into());
    }

    // Clips

    /// Validate and stamp a new clip without inserting it
    pub fn prepare_clip(&mut self, new: NewClip, clock: &dyn Clock) -> Result<Clip> {
        if self.object_keys.contains(&new.object_key) {
            return Err(StoreError::DuplicateObjectKey(new.object_key));
        }
        let created_at = self.next_timestamp(clock);
        Ok(new.into_clip(ClipId::new(), created_at))
    }

    /// Insert or replace a clip
    pub fn put_clip(&mut self, clip: Clip) {
        if let Some(previous) = self.clips.get(&clip.id) {
            let key = (previous.created_at, previous.id);
            if let Some(index) = self.clips_by_owner.get_mut(&previous.owner) {
                index.remove(&key);
            }
        }
        self.object_keys.insert(clip.object_key.clone());
        self.clips_by_owner
            .entry(clip.owner.clone())
            .or_default()
            .insert((clip.created_at, clip.id));
        self.clips.insert(clip.id, clip);
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.get(&id)
    }

    /// Remove a clip; its object key stays reserved
    pub fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
        let clip = self.clips.remove(&id)?;
        if let Some(index) = self.clips_by_owner.get_mut(&clip.owner) {
            index.remove(&(clip.created_at, clip.id));
            if index.is_empty() {
                self.clips_by_owner.remove(&clip.owner);
            }
        }
        Some(clip)
    }

    /// Owner's clips, newest first, optionally bounded by an inclusive range
    pub fn scan_clips(&self, owner: &OwnerId, range: Option<DateRange>) -> Vec<Clip> {
        let Some(index) = self.clips_by_owner.get(owner) else {
            return Vec::new();
        };
        let ids: Vec<ClipId> = match range {
            Some(range) if range.is_empty() => return Vec::new(),
            Some(range) => index
                .range(
                    (range.start, ClipId(Uuid::nil()))
                        ..=(range.end, ClipId(Uuid::from_u128(u128::MAX))),
                )
                .rev()
                .map(|(_, id)| *id)
                .collect(),
            None => index.iter().rev().map(|(_, id)| *id).collect(),
        };
        ids.into_iter()
            .filter_map(|id| self.clips.get(&id).cloned())
            .collect()
    }

    // Sessions

    pub fn prepare_session(&mut self, new: NewSession, clock: &dyn Clock) -> Session {
        let created_at = self.next_timestamp(clock);
        new.into_session(SessionId::new(), created_at)
    }

    pub fn put_session(&mut self, session: Session) {
        self.sessions_by_owner
            .entry(session.owner.clone())
            .or_default()
            .insert((session.created_at, session.id));
        self.sessions.insert(session.id, session);
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn remove_session(&mut self, id: SessionId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;
        if let Some(index) = self.sessions_by_owner.get_mut(&session.owner) {
            index.remove(&(session.created_at, session.id));
            if index.is_empty() {
                self.sessions_by_owner.remove(&session.owner);
            }
        }
        Some(session)
    }

    pub fn scan_sessions(&self, owner: &OwnerId) -> Vec<Session> {
        self.sessions_by_owner
            .get(owner)
            .map(|index| {
                index
                    .iter()
                    .rev()
                    .filter_map(|(_, id)| self.sessions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id).unwrap()
    }

    #[test]
    fn test_timestamps_strictly_increase_under_frozen_clock() {
        let clock = ManualClock::at_millis(1_000);
        let mut records = Records::default();
        let a = records.next_timestamp(&clock);
        let b = records.next_timestamp(&clock);
        assert!(b > a);
        assert_eq!((b - a).num_milliseconds(), 1);
    }

    #[test]
    fn test_identical_timestamps_break_ties_by_id_descending() {
        let at = DateTime::from_timestamp_millis(500).unwrap();
        let mut records = Records::default();
        let mut ids = Vec::new();
        for i in 0..3 {
            let clip = NewClip::new(owner("u1"), format!("k{i}"), 1).into_clip(ClipId::new(), at);
            ids.push(clip.id);
            records.put_clip(clip);
        }
        ids.sort();
        ids.reverse();

        let scanned: Vec<ClipId> = records
            .scan_clips(&owner("u1"), None)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(scanned, ids);
    }

    #[test]
    fn test_inverted_range_scans_nothing() {
        let clock = ManualClock::at_millis(100);
        let mut records = Records::default();
        let clip = records.prepare_clip(NewClip::new(owner("u1"), "k", 1), &clock).unwrap();
        records.put_clip(clip);

        let end = DateTime::from_timestamp_millis(0).unwrap();
        let start = DateTime::from_timestamp_millis(1_000).unwrap();
        assert!(records.scan_clips(&owner("u1"), Some(DateRange::new(start, end))).is_empty());
    }
}
