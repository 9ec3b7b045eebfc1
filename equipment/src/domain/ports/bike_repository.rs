//! Port for bicycle persistence.

use async_trait::async_trait;

use crate::domain::{Bike, BikeId};

use super::RepositoryError;

/// Port for reading and writing bicycle records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BikeRepository: Send + Sync {
    /// Persist the record, assigning a fresh identifier when it has none.
    /// Saving a record that already carries an identifier overwrites the
    /// stored row.
    async fn save(&self, bike: Bike) -> Result<Bike, RepositoryError>;

    /// Fetch a live (non-tombstoned) record by identifier.
    async fn find_by_id(&self, id: BikeId) -> Result<Option<Bike>, RepositoryError>;

    /// List records; tombstoned rows are included only on request.
    async fn list(&self, include_deleted: bool) -> Result<Vec<Bike>, RepositoryError>;

    /// Set the tombstone flag on an existing record. Unknown identifiers are
    /// ignored.
    async fn soft_delete(&self, id: BikeId) -> Result<(), RepositoryError>;

    /// Batch fetch, silently skipping tombstoned and unknown identifiers.
    async fn find_by_ids(&self, ids: &[BikeId]) -> Result<Vec<Bike>, RepositoryError>;
}
