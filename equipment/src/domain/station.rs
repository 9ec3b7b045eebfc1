//! Docking station ("totem") aggregate.
//!
//! A station does not store the set of locks attached to it. The reference
//! direction is `Lock::station_id`; the registry serves the lock collection
//! as a query-time projection so there is no second source of truth to keep
//! in sync.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a station on first persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(i64);

impl StationId {
    /// Wrap a raw identifier value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A docking station record. Stations carry no status field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: Option<StationId>,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub deleted: bool,
}

impl Station {
    /// Build an unpersisted record from registration input.
    pub fn from_draft(draft: StationDraft) -> Self {
        Self {
            id: None,
            location: draft.location,
            description: draft.description,
            deleted: false,
        }
    }
}

/// Registration input for a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDraft {
    pub location: String,
    pub description: String,
}

/// Partial update of a station's descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationUpdate {
    pub location: Option<String>,
    pub description: Option<String>,
}

impl StationUpdate {
    /// Apply the populated fields to an existing record.
    pub fn apply(self, station: &mut Station) {
        if let Some(location) = self.location {
            station.location = location;
        }
        if let Some(description) = self.description {
            station.description = description;
        }
    }
}
