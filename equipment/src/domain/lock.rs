//! Docking lock aggregate: identity, status domain and relations.

use serde::{Deserialize, Serialize};

use super::bike::BikeId;
use super::station::StationId;

/// Identifier assigned to a docking lock on first persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockId(i64);

impl LockId {
    /// Wrap a raw identifier value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for LockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational status of a docking lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockStatus {
    New,
    Free,
    Occupied,
    InRepair,
    Retired,
}

impl LockStatus {
    /// Whether a lock in this status may be attached to a station.
    pub fn accepts_integration(self) -> bool {
        matches!(self, Self::New | Self::InRepair)
    }

    /// Whether this status is a valid destination when detaching a lock from
    /// its station.
    pub fn is_out_of_service(self) -> bool {
        matches!(self, Self::InRepair | Self::Retired)
    }

    /// Wire spelling, used in log events and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Free => "FREE",
            Self::Occupied => "OCCUPIED",
            Self::InRepair => "IN_REPAIR",
            Self::Retired => "RETIRED",
        }
    }
}

impl std::fmt::Display for LockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A docking lock record.
///
/// Invariant: `bike_id` is populated exactly when the status is `Occupied`.
/// Invariant: `station_id` is populated only while the lock is integrated
/// into a station; a new lock, or one pulled for repair or retirement, has no
/// station reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lock {
    pub id: Option<LockId>,
    /// Network-unique asset number. Immutable after registration.
    pub number: u32,
    pub location: String,
    pub year: u16,
    pub model: String,
    pub status: LockStatus,
    pub bike_id: Option<BikeId>,
    pub station_id: Option<StationId>,
    #[serde(default)]
    pub deleted: bool,
}

impl Lock {
    /// Build an unpersisted record from registration input; every new lock
    /// starts in the `New` status with no relations.
    pub fn from_draft(draft: LockDraft) -> Self {
        Self {
            id: None,
            number: draft.number,
            location: draft.location,
            year: draft.year,
            model: draft.model,
            status: LockStatus::New,
            bike_id: None,
            station_id: None,
            deleted: false,
        }
    }

    /// True when the occupancy invariant holds: a bike reference is present
    /// exactly when the status is `Occupied`.
    pub fn occupancy_is_consistent(&self) -> bool {
        self.bike_id.is_some() == (self.status == LockStatus::Occupied)
    }
}

/// Registration input for a docking lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockDraft {
    pub number: u32,
    pub location: String,
    pub year: u16,
    pub model: String,
}

/// Partial update of a lock's descriptive fields. `number` is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockUpdate {
    pub location: Option<String>,
    pub year: Option<u16>,
    pub model: Option<String>,
}

impl LockUpdate {
    /// Apply the populated fields to an existing record.
    pub fn apply(self, lock: &mut Lock) {
        if let Some(location) = self.location {
            lock.location = location;
        }
        if let Some(year) = self.year {
            lock.year = year;
        }
        if let Some(model) = self.model {
            lock.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lock() -> Lock {
        Lock::from_draft(LockDraft {
            number: 42,
            location: "Praça XV".to_owned(),
            year: 2022,
            model: "T-200".to_owned(),
        })
    }

    #[test]
    fn draft_builds_new_lock_without_relations() {
        let lock = sample_lock();

        assert_eq!(lock.status, LockStatus::New);
        assert_eq!(lock.bike_id, None);
        assert_eq!(lock.station_id, None);
        assert!(lock.occupancy_is_consistent());
    }

    #[test]
    fn occupancy_consistency_tracks_status_and_reference() {
        let mut lock = sample_lock();

        lock.status = LockStatus::Occupied;
        assert!(!lock.occupancy_is_consistent());

        lock.bike_id = Some(BikeId::new(3));
        assert!(lock.occupancy_is_consistent());

        lock.status = LockStatus::Free;
        assert!(!lock.occupancy_is_consistent());
    }
}
