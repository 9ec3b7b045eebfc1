//! Tests for the station registry.
//!
//! The registry's interesting behaviour is relational, so these tests run
//! against the in-memory adapter instead of mocks.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{BikeRepository, LockRepository, StationRepository};
use crate::domain::{Bike, BikeDraft, BikeId, BikeStatus, ErrorCode, Lock, LockDraft, LockId};
use crate::outbound::persistence::{
    InMemoryBikeRepository, InMemoryLockRepository, InMemoryStationRepository,
};

struct Harness {
    stations: Arc<InMemoryStationRepository>,
    locks: Arc<InMemoryLockRepository>,
    bikes: Arc<InMemoryBikeRepository>,
    service: StationService<InMemoryStationRepository, InMemoryLockRepository, InMemoryBikeRepository>,
}

fn harness() -> Harness {
    let stations = Arc::new(InMemoryStationRepository::new());
    let locks = Arc::new(InMemoryLockRepository::new());
    let bikes = Arc::new(InMemoryBikeRepository::new());
    let service = StationService::new(
        Arc::clone(&stations),
        Arc::clone(&locks),
        Arc::clone(&bikes),
    );
    Harness {
        stations,
        locks,
        bikes,
        service,
    }
}

impl Harness {
    async fn station(&self) -> StationId {
        self.stations
            .save(Station::from_draft(StationDraft {
                location: "Centro".to_owned(),
                description: "Praça XV".to_owned(),
            }))
            .await
            .expect("save station")
            .id
            .expect("assigned id")
    }

    async fn lock_at(
        &self,
        station: Option<StationId>,
        status: LockStatus,
        bike: Option<BikeId>,
        number: u32,
    ) -> LockId {
        let mut lock = Lock::from_draft(LockDraft {
            number,
            location: "Centro".to_owned(),
            year: 2022,
            model: "T-200".to_owned(),
        });
        lock.station_id = station;
        lock.status = status;
        lock.bike_id = bike;
        self.locks
            .save(lock)
            .await
            .expect("save lock")
            .id
            .expect("assigned id")
    }

    async fn bike_with_status(&self, status: BikeStatus, number: u32) -> BikeId {
        let mut bike = Bike::from_draft(BikeDraft {
            brand: "Caloi".to_owned(),
            model: "10".to_owned(),
            year: 2023,
            number,
        });
        bike.status = status;
        self.bikes
            .save(bike)
            .await
            .expect("save bike")
            .id
            .expect("assigned id")
    }
}

#[tokio::test]
async fn list_locks_requires_an_existing_station() {
    let h = harness();
    let error = h
        .service
        .list_locks(StationId::new(9))
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains("station 9"));
}

#[tokio::test]
async fn list_locks_projects_only_this_stations_live_locks() {
    let h = harness();
    let station = h.station().await;
    let other = h.station().await;

    let attached = h.lock_at(Some(station), LockStatus::Free, None, 1).await;
    h.lock_at(Some(other), LockStatus::Free, None, 2).await;
    let ghost = h.lock_at(Some(station), LockStatus::Free, None, 3).await;
    h.locks.soft_delete(ghost).await.expect("tombstone");

    let locks = h.service.list_locks(station).await.expect("list locks");

    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].id, Some(attached));
}

#[tokio::test]
async fn list_bikes_is_empty_without_occupied_locks() {
    let h = harness();
    let station = h.station().await;
    h.lock_at(Some(station), LockStatus::Free, None, 1).await;

    let bikes = h.service.list_bikes(station).await.expect("list bikes");
    assert!(bikes.is_empty());
}

#[tokio::test]
async fn list_bikes_fetches_the_docked_bikes() {
    let h = harness();
    let station = h.station().await;

    let docked = h.bike_with_status(BikeStatus::Available, 1).await;
    h.lock_at(Some(station), LockStatus::Occupied, Some(docked), 1)
        .await;
    h.lock_at(Some(station), LockStatus::Free, None, 2).await;

    let bikes = h.service.list_bikes(station).await.expect("list bikes");

    assert_eq!(bikes.len(), 1);
    assert_eq!(bikes[0].id, Some(docked));
}

#[tokio::test]
async fn delete_refuses_while_locks_are_attached() {
    let h = harness();
    let station = h.station().await;
    let lock = h.lock_at(Some(station), LockStatus::Free, None, 1).await;

    let error = h
        .service
        .delete(station)
        .await
        .expect_err("delete refused");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert!(error.message().contains("1 attached lock"));

    // Detach the lock; deletion then succeeds and tombstones the record.
    let mut detached = h
        .locks
        .find_by_id(lock)
        .await
        .expect("find")
        .expect("present");
    detached.station_id = None;
    detached.status = LockStatus::Retired;
    h.locks.save(detached).await.expect("save");

    h.service.delete(station).await.expect("delete succeeds");

    assert!(h.service.list(false).await.expect("list").is_empty());
    assert_eq!(h.service.list(true).await.expect("list all").len(), 1);
}

#[tokio::test]
async fn update_applies_partial_fields() {
    let h = harness();
    let station = h.station().await;

    let updated = h
        .service
        .update(
            station,
            StationUpdate {
                location: None,
                description: Some("Terminal central".to_owned()),
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.location, "Centro");
    assert_eq!(updated.description, "Terminal central");
}

#[tokio::test]
async fn register_assigns_an_identifier() {
    let h = harness();
    let station = h
        .service
        .register(StationDraft {
            location: "Centro".to_owned(),
            description: "Praça XV".to_owned(),
        })
        .await
        .expect("register succeeds");

    assert!(station.id.is_some());
    assert!(!station.deleted);
}
