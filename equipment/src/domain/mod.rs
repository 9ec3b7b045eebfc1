//! Domain model, lifecycle services and orchestration.
//!
//! Purpose: define the equipment aggregates (bike, docking lock, station),
//! the storage ports they are persisted through, and the services enforcing
//! their lifecycle rules. The orchestrator in [`network_service`] owns every
//! workflow that touches more than one aggregate at a time.
//!
//! Public surface:
//! - `Bike` / `Lock` / `Station` — equipment aggregates and their drafts,
//!   updates and status enumerations.
//! - `Error` / `ErrorCode` — transport-agnostic failure taxonomy.
//! - `BikeService` / `LockService` / `StationService` — single-aggregate
//!   lifecycle managers.
//! - `NetworkService` — cross-aggregate orchestration.
//! - `EntityLockRegistry` — per-identifier mutual exclusion shared by
//!   compound workflows.

pub mod bike;
pub mod bike_service;
pub mod entity_locks;
pub mod error;
pub mod lock;
pub mod lock_service;
pub mod network_service;
pub mod ports;
pub mod station;
pub mod station_service;

pub use self::bike::{Bike, BikeDraft, BikeId, BikeStatus, BikeUpdate};
pub use self::bike_service::BikeService;
pub use self::entity_locks::{EntityGuards, EntityKey, EntityLockRegistry};
pub use self::error::{Error, ErrorCode};
pub use self::lock::{Lock, LockDraft, LockId, LockStatus, LockUpdate};
pub use self::lock_service::LockService;
pub use self::network_service::NetworkService;
pub use self::station::{Station, StationDraft, StationId, StationUpdate};
pub use self::station_service::StationService;

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
