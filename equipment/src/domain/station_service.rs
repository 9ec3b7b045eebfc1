//! Station registry.
//!
//! Stations own nothing directly: the set of attached locks is a projection
//! over `Lock::station_id`, and the bikes "at" a station are the bikes held
//! by its occupied locks. Both collections are resolved at query time.

use std::sync::Arc;

use serde_json::json;

use crate::domain::ports::{BikeRepository, LockRepository, RepositoryError, StationRepository};
use crate::domain::{
    Bike, DomainResult, Error, Lock, LockStatus, Station, StationDraft, StationId, StationUpdate,
};

fn map_repository_error(error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            Error::internal(format!("station storage unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("station storage error: {message}"))
        }
    }
}

/// Station registry service.
#[derive(Clone)]
pub struct StationService<S, L, B> {
    stations: Arc<S>,
    locks: Arc<L>,
    bikes: Arc<B>,
}

impl<S, L, B> StationService<S, L, B> {
    /// Create a new registry over the three repositories.
    pub fn new(stations: Arc<S>, locks: Arc<L>, bikes: Arc<B>) -> Self {
        Self {
            stations,
            locks,
            bikes,
        }
    }
}

impl<S, L, B> StationService<S, L, B>
where
    S: StationRepository,
    L: LockRepository,
    B: BikeRepository,
{
    /// Register a new station. Stations carry no status.
    pub async fn register(&self, draft: StationDraft) -> DomainResult<Station> {
        let station = self
            .stations
            .save(Station::from_draft(draft))
            .await
            .map_err(map_repository_error)?;
        tracing::info!(id = ?station.id, "station registered");
        Ok(station)
    }

    /// List stations, tombstoned ones only on request.
    pub async fn list(&self, include_deleted: bool) -> DomainResult<Vec<Station>> {
        self.stations
            .list(include_deleted)
            .await
            .map_err(map_repository_error)
    }

    /// Fetch a station by identifier.
    pub async fn get(&self, id: StationId) -> DomainResult<Station> {
        self.stations
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("station {id} not found")))
    }

    /// Partially update descriptive fields.
    pub async fn update(&self, id: StationId, update: StationUpdate) -> DomainResult<Station> {
        let mut station = self.get(id).await?;
        update.apply(&mut station);
        self.stations
            .save(station)
            .await
            .map_err(map_repository_error)
    }

    /// All live locks attached to the station.
    pub async fn list_locks(&self, id: StationId) -> DomainResult<Vec<Lock>> {
        self.get(id).await?;
        self.locks
            .find_by_station_id(id)
            .await
            .map_err(map_repository_error)
    }

    /// All bikes currently docked at the station: the bikes referenced by
    /// its occupied locks, batch-fetched. Empty when the station has no
    /// locks or none are occupied.
    pub async fn list_bikes(&self, id: StationId) -> DomainResult<Vec<Bike>> {
        let locks = self.list_locks(id).await?;

        let bike_ids: Vec<_> = locks
            .iter()
            .filter(|lock| lock.status == LockStatus::Occupied)
            .filter_map(|lock| lock.bike_id)
            .collect();
        if bike_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.bikes
            .find_by_ids(&bike_ids)
            .await
            .map_err(map_repository_error)
    }

    /// Soft-delete a station. Refused while any lock still references it.
    pub async fn delete(&self, id: StationId) -> DomainResult<()> {
        self.get(id).await?;

        let attached = self
            .locks
            .find_by_station_id(id)
            .await
            .map_err(map_repository_error)?;
        if !attached.is_empty() {
            return Err(Error::conflict(format!(
                "station {id} has {} attached lock(s) and cannot be deleted",
                attached.len()
            ))
            .with_details(json!({ "stationId": id, "attachedLocks": attached.len() })));
        }

        self.stations
            .soft_delete(id)
            .await
            .map_err(map_repository_error)?;
        tracing::info!(station_id = id.value(), "station soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "station_service_tests.rs"]
mod tests;
