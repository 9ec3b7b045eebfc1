//! Bicycle aggregate: identity, status domain and mutation payloads.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a bicycle on first persist.
///
/// Identifiers are process-unique and monotonically increasing; the storage
/// adapter assigns them, never the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BikeId(i64);

impl BikeId {
    /// Wrap a raw identifier value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BikeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational status of a bicycle.
///
/// Serialised with the wire spellings used by transport adapters
/// (`NEW`, `AVAILABLE`, `IN_USE`, `REPAIR_REQUESTED`, `IN_REPAIR`, `RETIRED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeStatus {
    New,
    Available,
    InUse,
    RepairRequested,
    InRepair,
    Retired,
}

impl BikeStatus {
    /// Whether a bike in this status may be inducted into the network.
    pub fn accepts_induction(self) -> bool {
        matches!(self, Self::New | Self::InRepair)
    }

    /// Whether this status is a valid destination when removing a bike from
    /// the network.
    pub fn is_out_of_service(self) -> bool {
        matches!(self, Self::InRepair | Self::Retired)
    }

    /// Wire spelling, used in log events and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Available => "AVAILABLE",
            Self::InUse => "IN_USE",
            Self::RepairRequested => "REPAIR_REQUESTED",
            Self::InRepair => "IN_REPAIR",
            Self::Retired => "RETIRED",
        }
    }
}

impl std::fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bicycle record.
///
/// `id` is `None` until the record is first persisted. The tombstone flag
/// (`deleted`) is only ever set through the soft-delete path; tombstoned
/// records stay in storage and are excluded from default listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    pub id: Option<BikeId>,
    pub brand: String,
    pub model: String,
    pub year: u16,
    /// Network-unique asset number stamped on the frame. Immutable after
    /// registration.
    pub number: u32,
    pub status: BikeStatus,
    #[serde(default)]
    pub deleted: bool,
}

impl Bike {
    /// Build an unpersisted record from registration input; every new bike
    /// starts in the `New` status.
    pub fn from_draft(draft: BikeDraft) -> Self {
        Self {
            id: None,
            brand: draft.brand,
            model: draft.model,
            year: draft.year,
            number: draft.number,
            status: BikeStatus::New,
            deleted: false,
        }
    }
}

/// Registration input for a bicycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeDraft {
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub number: u32,
}

/// Partial update of a bicycle's descriptive fields.
///
/// `number` and `status` are deliberately absent: the asset number is
/// immutable and status moves only through the lifecycle and orchestration
/// operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeUpdate {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
}

impl BikeUpdate {
    /// Apply the populated fields to an existing record.
    pub fn apply(self, bike: &mut Bike) {
        if let Some(brand) = self.brand {
            bike.brand = brand;
        }
        if let Some(model) = self.model {
            bike.model = model;
        }
        if let Some(year) = self.year {
            bike.year = year;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_builds_new_unpersisted_bike() {
        let bike = Bike::from_draft(BikeDraft {
            brand: "Caloi".to_owned(),
            model: "10".to_owned(),
            year: 2023,
            number: 7,
        });

        assert_eq!(bike.id, None);
        assert_eq!(bike.status, BikeStatus::New);
        assert!(!bike.deleted);
    }

    #[test]
    fn status_serialises_with_wire_spelling() {
        let wire = serde_json::to_string(&BikeStatus::RepairRequested).expect("serialise");
        assert_eq!(wire, "\"REPAIR_REQUESTED\"");

        let parsed: BikeStatus = serde_json::from_str("\"IN_USE\"").expect("parse");
        assert_eq!(parsed, BikeStatus::InUse);
    }

    #[test]
    fn update_applies_only_populated_fields() {
        let mut bike = Bike::from_draft(BikeDraft {
            brand: "Caloi".to_owned(),
            model: "10".to_owned(),
            year: 2023,
            number: 7,
        });

        BikeUpdate {
            model: Some("Elite".to_owned()),
            ..BikeUpdate::default()
        }
        .apply(&mut bike);

        assert_eq!(bike.brand, "Caloi");
        assert_eq!(bike.model, "Elite");
        assert_eq!(bike.year, 2023);
        assert_eq!(bike.number, 7);
    }
}
