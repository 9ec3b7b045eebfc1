//! Bicycle lifecycle manager.
//!
//! Enforces registration, partial update and deletion eligibility for
//! bicycles in isolation. `change_status` is the low-level primitive and
//! performs no transition check of its own; transition legality for
//! network-coupled moves belongs to the orchestrator.

use std::sync::Arc;

use serde_json::json;

use crate::domain::ports::{BikeRepository, RepositoryError};
use crate::domain::{Bike, BikeDraft, BikeId, BikeStatus, BikeUpdate, DomainResult, Error};

fn map_repository_error(error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            Error::internal(format!("bike storage unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("bike storage error: {message}"))
        }
    }
}

/// Bicycle lifecycle service.
#[derive(Clone)]
pub struct BikeService<R> {
    bikes: Arc<R>,
}

impl<R> BikeService<R> {
    /// Create a new service over the given repository.
    pub fn new(bikes: Arc<R>) -> Self {
        Self { bikes }
    }
}

impl<R> BikeService<R>
where
    R: BikeRepository,
{
    /// Register a new bicycle; it enters the fleet in the `New` status.
    ///
    /// Uniqueness of the asset number is not checked here; the storage
    /// collaborator may add such a constraint.
    pub async fn register(&self, draft: BikeDraft) -> DomainResult<Bike> {
        let bike = self
            .bikes
            .save(Bike::from_draft(draft))
            .await
            .map_err(map_repository_error)?;
        tracing::info!(id = ?bike.id, number = bike.number, "bike registered");
        Ok(bike)
    }

    /// List bicycles, tombstoned ones only on request.
    pub async fn list(&self, include_deleted: bool) -> DomainResult<Vec<Bike>> {
        self.bikes
            .list(include_deleted)
            .await
            .map_err(map_repository_error)
    }

    /// Fetch a bicycle by identifier.
    pub async fn get(&self, id: BikeId) -> DomainResult<Bike> {
        self.bikes
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("bike {id} not found")))
    }

    /// Partially update descriptive fields. The asset number and status are
    /// not reachable through this path.
    pub async fn update(&self, id: BikeId, update: BikeUpdate) -> DomainResult<Bike> {
        let mut bike = self.get(id).await?;
        update.apply(&mut bike);
        self.bikes.save(bike).await.map_err(map_repository_error)
    }

    /// Unconditionally set a new status and persist.
    pub async fn change_status(&self, id: BikeId, new_status: BikeStatus) -> DomainResult<Bike> {
        let mut bike = self.get(id).await?;
        let previous = bike.status;
        bike.status = new_status;
        let bike = self.bikes.save(bike).await.map_err(map_repository_error)?;
        tracing::info!(
            bike_id = id.value(),
            from = %previous,
            to = %new_status,
            "bike status changed"
        );
        Ok(bike)
    }

    /// Soft-delete a bicycle. Only retired bikes are eligible: retirement is
    /// what guarantees the bike is no longer docked anywhere.
    pub async fn delete(&self, id: BikeId) -> DomainResult<()> {
        let bike = self.get(id).await?;
        if bike.status != BikeStatus::Retired {
            return Err(Error::invalid_transition(format!(
                "only retired bikes can be deleted; bike {id} is {}",
                bike.status
            ))
            .with_details(json!({ "bikeId": id, "status": bike.status })));
        }
        self.bikes
            .soft_delete(id)
            .await
            .map_err(map_repository_error)?;
        tracing::info!(bike_id = id.value(), "bike soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "bike_service_tests.rs"]
mod tests;
