//! Network orchestrator: the compound workflows coupling bikes, locks and
//! stations.
//!
//! Every operation here reads several entities, validates a joint
//! precondition set and writes several entities. Atomicity against
//! concurrent callers comes from the [`EntityLockRegistry`]: all touched
//! identifiers are acquired (canonical order) before any precondition is
//! checked, and released only after the final write.
//!
//! Precondition precedence is fixed so failures are deterministic: entity
//! existence first (bike before lock), then bike-side state, then lock-side
//! state, then argument validity. Writes go bike first, then lock.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entity_locks::{EntityKey, EntityLockRegistry};
use crate::domain::ports::{BikeRepository, LockRepository, RepositoryError, StationRepository};
use crate::domain::{
    Bike, BikeId, BikeStatus, DomainResult, Error, Lock, LockId, LockStatus, StationId,
};

fn map_repository_error(error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            Error::internal(format!("equipment storage unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("equipment storage error: {message}"))
        }
    }
}

/// Orchestrates the cross-entity equipment workflows.
pub struct NetworkService<B, L, S> {
    bikes: Arc<B>,
    locks: Arc<L>,
    stations: Arc<S>,
    entity_locks: Arc<EntityLockRegistry>,
}

// Hand-written so cloning does not demand `Clone` repositories; only the
// handles are duplicated.
impl<B, L, S> Clone for NetworkService<B, L, S> {
    fn clone(&self) -> Self {
        Self {
            bikes: Arc::clone(&self.bikes),
            locks: Arc::clone(&self.locks),
            stations: Arc::clone(&self.stations),
            entity_locks: Arc::clone(&self.entity_locks),
        }
    }
}

impl<B, L, S> NetworkService<B, L, S> {
    /// Create a new orchestrator over the three repositories.
    ///
    /// All orchestrators mutating the same store must share one registry;
    /// per-entity mutual exclusion only holds within a registry.
    pub fn new(
        bikes: Arc<B>,
        locks: Arc<L>,
        stations: Arc<S>,
        entity_locks: Arc<EntityLockRegistry>,
    ) -> Self {
        Self {
            bikes,
            locks,
            stations,
            entity_locks,
        }
    }
}

impl<B, L, S> NetworkService<B, L, S>
where
    B: BikeRepository,
    L: LockRepository,
    S: StationRepository,
{
    /// Induct a bike into the network by docking it in a free lock.
    ///
    /// The bike must be `New` or `InRepair`; the lock must be `Free`. On
    /// success the bike becomes `Available` and the lock `Occupied`,
    /// referencing the bike exclusively.
    pub async fn induct_bike(&self, bike_id: BikeId, lock_id: LockId) -> DomainResult<Lock> {
        let _guards = self
            .entity_locks
            .acquire(vec![EntityKey::Bike(bike_id), EntityKey::Lock(lock_id)])
            .await;

        let mut bike = self.find_bike(bike_id).await?;
        let mut lock = self.find_lock(lock_id).await?;

        if !bike.status.accepts_induction() {
            return Err(Error::invalid_transition(format!(
                "bike {bike_id} in status {} cannot be inducted",
                bike.status
            ))
            .with_details(json!({ "bikeId": bike_id, "status": bike.status })));
        }
        if lock.status != LockStatus::Free {
            return Err(Error::conflict(format!("lock {lock_id} is not free"))
                .with_details(json!({ "lockId": lock_id, "status": lock.status })));
        }

        bike.status = BikeStatus::Available;
        lock.status = LockStatus::Occupied;
        lock.bike_id = bike.id;

        self.bikes.save(bike).await.map_err(map_repository_error)?;
        let lock = self.locks.save(lock).await.map_err(map_repository_error)?;
        tracing::info!(
            bike_id = bike_id.value(),
            lock_id = lock_id.value(),
            "bike inducted into network"
        );
        Ok(lock)
    }

    /// Remove a bike from the network for repair or retirement.
    ///
    /// The lock must be occupied by exactly this bike, and the final status
    /// must be `InRepair` or `Retired`. On success the lock is freed.
    pub async fn remove_bike(
        &self,
        bike_id: BikeId,
        lock_id: LockId,
        final_status: BikeStatus,
    ) -> DomainResult<Bike> {
        let _guards = self
            .entity_locks
            .acquire(vec![EntityKey::Bike(bike_id), EntityKey::Lock(lock_id)])
            .await;

        let mut bike = self.find_bike(bike_id).await?;
        let mut lock = self.find_lock(lock_id).await?;

        if lock.bike_id != Some(bike_id) {
            return Err(
                Error::conflict(format!("bike {bike_id} is not in lock {lock_id}")).with_details(
                    json!({ "bikeId": bike_id, "lockId": lock_id, "heldBikeId": lock.bike_id }),
                ),
            );
        }
        if lock.status != LockStatus::Occupied {
            return Err(Error::conflict(format!("lock {lock_id} is not occupied")));
        }
        if !final_status.is_out_of_service() {
            return Err(Error::invalid_argument(format!(
                "final status {final_status} is not valid for removal"
            )));
        }

        bike.status = final_status;
        lock.status = LockStatus::Free;
        lock.bike_id = None;

        let bike = self.bikes.save(bike).await.map_err(map_repository_error)?;
        self.locks.save(lock).await.map_err(map_repository_error)?;
        tracing::info!(
            bike_id = bike_id.value(),
            lock_id = lock_id.value(),
            final_status = %final_status,
            "bike removed from network"
        );
        Ok(bike)
    }

    /// Attach a lock to a station, making it operational.
    ///
    /// The lock must not already belong to a station and must be `New` or
    /// `InRepair`. On success it references the station and becomes `Free`.
    /// Only the lock is written: the station's lock collection is a
    /// projection over this reference.
    pub async fn attach_lock(&self, lock_id: LockId, station_id: StationId) -> DomainResult<Lock> {
        let _guards = self
            .entity_locks
            .acquire(vec![EntityKey::Lock(lock_id), EntityKey::Station(station_id)])
            .await;

        let mut lock = self.find_lock(lock_id).await?;
        self.ensure_station_exists(station_id).await?;

        if let Some(current) = lock.station_id {
            return Err(Error::conflict(format!(
                "lock {lock_id} is already integrated to station {current}"
            ))
            .with_details(json!({ "lockId": lock_id, "stationId": current })));
        }
        if !lock.status.accepts_integration() {
            return Err(Error::invalid_transition(format!(
                "lock {lock_id} in status {} cannot be integrated",
                lock.status
            ))
            .with_details(json!({ "lockId": lock_id, "status": lock.status })));
        }

        lock.station_id = Some(station_id);
        lock.status = LockStatus::Free;

        let lock = self.locks.save(lock).await.map_err(map_repository_error)?;
        tracing::info!(
            lock_id = lock_id.value(),
            station_id = station_id.value(),
            "lock attached to station"
        );
        Ok(lock)
    }

    /// Detach a lock from its station for repair or retirement.
    ///
    /// The lock must belong to the given station and must not be holding a
    /// bike; the final status must be `InRepair` or `Retired`.
    pub async fn detach_lock(
        &self,
        lock_id: LockId,
        station_id: StationId,
        final_status: LockStatus,
    ) -> DomainResult<Lock> {
        let _guards = self
            .entity_locks
            .acquire(vec![EntityKey::Lock(lock_id), EntityKey::Station(station_id)])
            .await;

        let mut lock = self.find_lock(lock_id).await?;
        self.ensure_station_exists(station_id).await?;

        if lock.station_id != Some(station_id) {
            return Err(Error::conflict(format!(
                "lock {lock_id} does not belong to station {station_id}"
            ))
            .with_details(
                json!({ "lockId": lock_id, "stationId": station_id, "currentStationId": lock.station_id }),
            ));
        }
        if lock.status == LockStatus::Occupied {
            return Err(Error::conflict(format!(
                "lock {lock_id} is occupied by a bike and cannot be removed"
            )));
        }
        if !final_status.is_out_of_service() {
            return Err(Error::invalid_argument(format!(
                "final status {final_status} is not valid for removal"
            )));
        }

        lock.status = final_status;
        lock.station_id = None;

        let lock = self.locks.save(lock).await.map_err(map_repository_error)?;
        tracing::info!(
            lock_id = lock_id.value(),
            station_id = station_id.value(),
            final_status = %final_status,
            "lock detached from station"
        );
        Ok(lock)
    }

    /// Dock a checked-out bike into a free lock (cyclist return).
    ///
    /// Distinct from induction: the bike must currently be `InUse`. On
    /// success the lock is `Occupied` and the bike `Available` again.
    pub async fn lock_bike(&self, lock_id: LockId, bike_id: BikeId) -> DomainResult<Lock> {
        let _guards = self
            .entity_locks
            .acquire(vec![EntityKey::Bike(bike_id), EntityKey::Lock(lock_id)])
            .await;

        let mut bike = self.find_bike(bike_id).await?;
        let mut lock = self.find_lock(lock_id).await?;

        if bike.status != BikeStatus::InUse {
            return Err(
                Error::conflict(format!("bike {bike_id} is not checked out"))
                    .with_details(json!({ "bikeId": bike_id, "status": bike.status })),
            );
        }
        if lock.status != LockStatus::Free {
            return Err(Error::conflict(format!("lock {lock_id} is not free"))
                .with_details(json!({ "lockId": lock_id, "status": lock.status })));
        }

        bike.status = BikeStatus::Available;
        lock.status = LockStatus::Occupied;
        lock.bike_id = bike.id;

        self.bikes.save(bike).await.map_err(map_repository_error)?;
        let lock = self.locks.save(lock).await.map_err(map_repository_error)?;
        tracing::info!(
            bike_id = bike_id.value(),
            lock_id = lock_id.value(),
            "bike returned and locked"
        );
        Ok(lock)
    }

    /// Release the bike held by an occupied lock (cyclist checkout).
    ///
    /// The touched bike is only discovered by reading the lock, so the
    /// workflow first reads without guards to learn the key set, acquires,
    /// and re-reads; if occupancy changed in between it starts over.
    pub async fn unlock_bike(&self, lock_id: LockId) -> DomainResult<Bike> {
        loop {
            let observed = self.find_lock(lock_id).await?;

            let mut keys = vec![EntityKey::Lock(lock_id)];
            if let Some(bike_id) = observed.bike_id {
                keys.push(EntityKey::Bike(bike_id));
            }
            let _guards = self.entity_locks.acquire(keys).await;

            let mut lock = self.find_lock(lock_id).await?;
            if lock.bike_id != observed.bike_id {
                continue;
            }

            if lock.status != LockStatus::Occupied {
                return Err(Error::conflict(format!("lock {lock_id} is not occupied")));
            }
            let Some(bike_id) = lock.bike_id else {
                return Err(Error::data_inconsistency(format!(
                    "lock {lock_id} is occupied but references no bike"
                )));
            };
            let mut bike = self
                .bikes
                .find_by_id(bike_id)
                .await
                .map_err(map_repository_error)?
                .ok_or_else(|| {
                    Error::data_inconsistency(format!(
                        "lock {lock_id} references bike {bike_id}, which does not exist"
                    ))
                })?;

            lock.status = LockStatus::Free;
            lock.bike_id = None;
            bike.status = BikeStatus::InUse;

            let bike = self.bikes.save(bike).await.map_err(map_repository_error)?;
            self.locks.save(lock).await.map_err(map_repository_error)?;
            tracing::info!(
                bike_id = bike_id.value(),
                lock_id = lock_id.value(),
                "bike unlocked for checkout"
            );
            return Ok(bike);
        }
    }

    /// The bike currently held by a lock, if any.
    pub async fn bike_in_lock(&self, lock_id: LockId) -> DomainResult<Option<Bike>> {
        let lock = self.find_lock(lock_id).await?;
        let Some(bike_id) = lock.bike_id else {
            return Ok(None);
        };

        let bike = self
            .bikes
            .find_by_id(bike_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::data_inconsistency(format!(
                    "lock {lock_id} references bike {bike_id}, which does not exist"
                ))
            })?;
        Ok(Some(bike))
    }

    async fn find_bike(&self, id: BikeId) -> DomainResult<Bike> {
        self.bikes
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("bike {id} not found")))
    }

    async fn find_lock(&self, id: LockId) -> DomainResult<Lock> {
        self.locks
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("lock {id} not found")))
    }

    async fn ensure_station_exists(&self, id: StationId) -> DomainResult<()> {
        self.stations
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("station {id} not found")))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "network_service_tests.rs"]
mod tests;
