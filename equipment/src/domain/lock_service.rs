//! Docking lock lifecycle manager.
//!
//! Unlike the bike primitive, `change_status` here refuses the two moves
//! that would corrupt occupancy: producing `Occupied` directly, and freeing
//! an occupied lock without releasing its bike.

use std::sync::Arc;

use serde_json::json;

use crate::domain::ports::{LockRepository, RepositoryError};
use crate::domain::{DomainResult, Error, Lock, LockDraft, LockId, LockStatus, LockUpdate};

fn map_repository_error(error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            Error::internal(format!("lock storage unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("lock storage error: {message}"))
        }
    }
}

/// Docking lock lifecycle service.
#[derive(Clone)]
pub struct LockService<R> {
    locks: Arc<R>,
}

impl<R> LockService<R> {
    /// Create a new service over the given repository.
    pub fn new(locks: Arc<R>) -> Self {
        Self { locks }
    }
}

impl<R> LockService<R>
where
    R: LockRepository,
{
    /// Register a new lock; it enters the fleet in the `New` status, not yet
    /// attached to any station.
    pub async fn register(&self, draft: LockDraft) -> DomainResult<Lock> {
        let lock = self
            .locks
            .save(Lock::from_draft(draft))
            .await
            .map_err(map_repository_error)?;
        tracing::info!(id = ?lock.id, number = lock.number, "lock registered");
        Ok(lock)
    }

    /// List locks, tombstoned ones only on request.
    pub async fn list(&self, include_deleted: bool) -> DomainResult<Vec<Lock>> {
        self.locks
            .list(include_deleted)
            .await
            .map_err(map_repository_error)
    }

    /// Fetch a lock by identifier.
    pub async fn get(&self, id: LockId) -> DomainResult<Lock> {
        self.locks
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("lock {id} not found")))
    }

    /// Partially update descriptive fields. The asset number is not
    /// reachable through this path.
    pub async fn update(&self, id: LockId, update: LockUpdate) -> DomainResult<Lock> {
        let mut lock = self.get(id).await?;
        update.apply(&mut lock);
        self.locks.save(lock).await.map_err(map_repository_error)
    }

    /// Set a new status and persist.
    ///
    /// Occupancy may only be produced by the lock-bike workflow, and an
    /// occupied lock may only be freed by the unlock or removal workflows,
    /// which also release the bike.
    pub async fn change_status(&self, id: LockId, new_status: LockStatus) -> DomainResult<Lock> {
        let mut lock = self.get(id).await?;

        if new_status == LockStatus::Occupied {
            return Err(Error::invalid_transition(
                "OCCUPIED cannot be set directly; use the lock-bike workflow",
            ));
        }
        if lock.status == LockStatus::Occupied && new_status == LockStatus::Free {
            return Err(Error::invalid_transition(format!(
                "lock {id} is occupied and cannot be freed directly; unlock or remove its bike",
            )));
        }

        let previous = lock.status;
        lock.status = new_status;
        let lock = self.locks.save(lock).await.map_err(map_repository_error)?;
        tracing::info!(
            lock_id = id.value(),
            from = %previous,
            to = %new_status,
            "lock status changed"
        );
        Ok(lock)
    }

    /// Soft-delete a lock. A lock holding a bike can never be deleted.
    pub async fn delete(&self, id: LockId) -> DomainResult<()> {
        let lock = self.get(id).await?;
        if lock.status == LockStatus::Occupied || lock.bike_id.is_some() {
            return Err(Error::conflict(format!(
                "lock {id} is occupied by a bike and cannot be deleted"
            ))
            .with_details(json!({ "lockId": id, "bikeId": lock.bike_id })));
        }
        self.locks
            .soft_delete(id)
            .await
            .map_err(map_repository_error)?;
        tracing::info!(lock_id = id.value(), "lock soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lock_service_tests.rs"]
mod tests;
