//! Port for docking station persistence.

use async_trait::async_trait;

use crate::domain::{Station, StationId};

use super::RepositoryError;

/// Port for reading and writing station records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Persist the record, assigning a fresh identifier when it has none.
    async fn save(&self, station: Station) -> Result<Station, RepositoryError>;

    /// Fetch a live (non-tombstoned) record by identifier.
    async fn find_by_id(&self, id: StationId) -> Result<Option<Station>, RepositoryError>;

    /// List records; tombstoned rows are included only on request.
    async fn list(&self, include_deleted: bool) -> Result<Vec<Station>, RepositoryError>;

    /// Set the tombstone flag on an existing record. Unknown identifiers are
    /// ignored.
    async fn soft_delete(&self, id: StationId) -> Result<(), RepositoryError>;
}
