//! Port for docking lock persistence.

use async_trait::async_trait;

use crate::domain::{Lock, LockId, StationId};

use super::RepositoryError;

/// Port for reading and writing docking lock records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LockRepository: Send + Sync {
    /// Persist the record, assigning a fresh identifier when it has none.
    async fn save(&self, lock: Lock) -> Result<Lock, RepositoryError>;

    /// Fetch a live (non-tombstoned) record by identifier.
    async fn find_by_id(&self, id: LockId) -> Result<Option<Lock>, RepositoryError>;

    /// List records; tombstoned rows are included only on request.
    async fn list(&self, include_deleted: bool) -> Result<Vec<Lock>, RepositoryError>;

    /// Set the tombstone flag on an existing record. Unknown identifiers are
    /// ignored.
    async fn soft_delete(&self, id: LockId) -> Result<(), RepositoryError>;

    /// All live locks whose station reference equals the given station.
    async fn find_by_station_id(&self, id: StationId) -> Result<Vec<Lock>, RepositoryError>;
}
