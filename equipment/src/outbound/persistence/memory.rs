//! In-memory storage adapters keyed by identifier.
//!
//! One map per table behind a `std::sync::Mutex`; guards are never held
//! across await points. Identifiers come from a per-table monotonic counter.
//! Deletion is a tombstone flag, never removal from the map, so tombstoned
//! rows stay retrievable through `list(include_deleted = true)`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{BikeRepository, LockRepository, RepositoryError, StationRepository};
use crate::domain::{Bike, BikeId, Lock, LockId, Station, StationId};

/// Row access the generic table needs from each entity type.
trait Record: Clone {
    fn id(&self) -> Option<i64>;
    fn assign_id(&mut self, id: i64);
    fn is_deleted(&self) -> bool;
    fn mark_deleted(&mut self);
}

impl Record for Bike {
    fn id(&self) -> Option<i64> {
        self.id.map(BikeId::value)
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(BikeId::new(id));
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

impl Record for Lock {
    fn id(&self) -> Option<i64> {
        self.id.map(LockId::value)
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(LockId::new(id));
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

impl Record for Station {
    fn id(&self) -> Option<i64> {
        self.id.map(StationId::value)
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(StationId::new(id));
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

#[derive(Debug)]
struct Table<T> {
    rows: HashMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Record> Table<T> {
    fn save(&mut self, mut entity: T) -> T {
        let id = match entity.id() {
            Some(id) => {
                // Keep the counter ahead of rows saved with explicit ids.
                self.next_id = self.next_id.max(id + 1);
                id
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                entity.assign_id(id);
                id
            }
        };
        self.rows.insert(id, entity.clone());
        entity
    }

    fn find(&self, id: i64) -> Option<T> {
        self.rows.get(&id).filter(|row| !row.is_deleted()).cloned()
    }

    fn list(&self, include_deleted: bool) -> Vec<T> {
        self.rows
            .values()
            .filter(|row| include_deleted || !row.is_deleted())
            .cloned()
            .collect()
    }

    fn soft_delete(&mut self, id: i64) {
        if let Some(row) = self.rows.get_mut(&id) {
            row.mark_deleted();
        }
    }
}

fn table<T>(cell: &Mutex<Table<T>>) -> MutexGuard<'_, Table<T>> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory bicycle table.
#[derive(Debug, Default)]
pub struct InMemoryBikeRepository {
    bikes: Mutex<Table<Bike>>,
}

impl InMemoryBikeRepository {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BikeRepository for InMemoryBikeRepository {
    async fn save(&self, bike: Bike) -> Result<Bike, RepositoryError> {
        Ok(table(&self.bikes).save(bike))
    }

    async fn find_by_id(&self, id: BikeId) -> Result<Option<Bike>, RepositoryError> {
        Ok(table(&self.bikes).find(id.value()))
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Bike>, RepositoryError> {
        Ok(table(&self.bikes).list(include_deleted))
    }

    async fn soft_delete(&self, id: BikeId) -> Result<(), RepositoryError> {
        table(&self.bikes).soft_delete(id.value());
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[BikeId]) -> Result<Vec<Bike>, RepositoryError> {
        let bikes = table(&self.bikes);
        Ok(ids.iter().filter_map(|id| bikes.find(id.value())).collect())
    }
}

/// In-memory docking lock table.
#[derive(Debug, Default)]
pub struct InMemoryLockRepository {
    locks: Mutex<Table<Lock>>,
}

impl InMemoryLockRepository {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockRepository for InMemoryLockRepository {
    async fn save(&self, lock: Lock) -> Result<Lock, RepositoryError> {
        Ok(table(&self.locks).save(lock))
    }

    async fn find_by_id(&self, id: LockId) -> Result<Option<Lock>, RepositoryError> {
        Ok(table(&self.locks).find(id.value()))
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Lock>, RepositoryError> {
        Ok(table(&self.locks).list(include_deleted))
    }

    async fn soft_delete(&self, id: LockId) -> Result<(), RepositoryError> {
        table(&self.locks).soft_delete(id.value());
        Ok(())
    }

    async fn find_by_station_id(&self, id: StationId) -> Result<Vec<Lock>, RepositoryError> {
        let locks = table(&self.locks);
        Ok(locks
            .rows
            .values()
            .filter(|lock| lock.station_id == Some(id) && !lock.deleted)
            .cloned()
            .collect())
    }
}

/// In-memory station table.
#[derive(Debug, Default)]
pub struct InMemoryStationRepository {
    stations: Mutex<Table<Station>>,
}

impl InMemoryStationRepository {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, station: Station) -> Result<Station, RepositoryError> {
        Ok(table(&self.stations).save(station))
    }

    async fn find_by_id(&self, id: StationId) -> Result<Option<Station>, RepositoryError> {
        Ok(table(&self.stations).find(id.value()))
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Station>, RepositoryError> {
        Ok(table(&self.stations).list(include_deleted))
    }

    async fn soft_delete(&self, id: StationId) -> Result<(), RepositoryError> {
        table(&self.stations).soft_delete(id.value());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BikeDraft, LockDraft, LockStatus, StationDraft};

    fn bike(number: u32) -> Bike {
        Bike::from_draft(BikeDraft {
            brand: "Caloi".to_owned(),
            model: "10".to_owned(),
            year: 2023,
            number,
        })
    }

    fn lock(number: u32) -> Lock {
        Lock::from_draft(LockDraft {
            number,
            location: "Praça XV".to_owned(),
            year: 2022,
            model: "T-200".to_owned(),
        })
    }

    #[tokio::test]
    async fn save_assigns_monotonic_ids() {
        let repo = InMemoryBikeRepository::new();

        let first = repo.save(bike(1)).await.expect("save");
        let second = repo.save(bike(2)).await.expect("save");

        assert_eq!(first.id, Some(BikeId::new(1)));
        assert_eq!(second.id, Some(BikeId::new(2)));
    }

    #[tokio::test]
    async fn save_with_id_overwrites_in_place() {
        let repo = InMemoryBikeRepository::new();

        let mut saved = repo.save(bike(1)).await.expect("save");
        saved.brand = "Monark".to_owned();
        repo.save(saved.clone()).await.expect("resave");

        let fetched = repo
            .find_by_id(saved.id.expect("assigned id"))
            .await
            .expect("find");
        assert_eq!(fetched.map(|b| b.brand), Some("Monark".to_owned()));
    }

    #[tokio::test]
    async fn tombstoned_rows_hide_from_find_and_default_list() {
        let repo = InMemoryBikeRepository::new();
        let saved = repo.save(bike(1)).await.expect("save");
        let id = saved.id.expect("assigned id");

        repo.soft_delete(id).await.expect("delete");

        assert_eq!(repo.find_by_id(id).await.expect("find"), None);
        assert!(repo.list(false).await.expect("list").is_empty());

        let all = repo.list(true).await.expect("list deleted");
        assert_eq!(all.len(), 1);
        assert!(all[0].deleted);
    }

    #[tokio::test]
    async fn soft_delete_of_unknown_id_is_a_no_op() {
        let repo = InMemoryLockRepository::new();
        repo.soft_delete(LockId::new(99)).await.expect("delete");
        assert!(repo.list(true).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn find_by_ids_skips_unknown_and_tombstoned() {
        let repo = InMemoryBikeRepository::new();
        let kept = repo.save(bike(1)).await.expect("save");
        let dropped = repo.save(bike(2)).await.expect("save");
        repo.soft_delete(dropped.id.expect("assigned id"))
            .await
            .expect("delete");

        let found = repo
            .find_by_ids(&[
                kept.id.expect("assigned id"),
                dropped.id.expect("assigned id"),
                BikeId::new(99),
            ])
            .await
            .expect("batch fetch");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, 1);
    }

    #[tokio::test]
    async fn find_by_station_id_filters_reference_and_tombstone() {
        let repo = InMemoryLockRepository::new();
        let station = StationId::new(5);

        let mut attached = lock(1);
        attached.station_id = Some(station);
        attached.status = LockStatus::Free;
        repo.save(attached).await.expect("save");

        let mut elsewhere = lock(2);
        elsewhere.station_id = Some(StationId::new(6));
        repo.save(elsewhere).await.expect("save");

        let mut ghost = lock(3);
        ghost.station_id = Some(station);
        let ghost = repo.save(ghost).await.expect("save");
        repo.soft_delete(ghost.id.expect("assigned id"))
            .await
            .expect("delete");

        let found = repo.find_by_station_id(station).await.expect("query");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, 1);
    }

    #[tokio::test]
    async fn station_round_trip() {
        let repo = InMemoryStationRepository::new();
        let saved = repo
            .save(Station::from_draft(StationDraft {
                location: "Centro".to_owned(),
                description: "Praça XV".to_owned(),
            }))
            .await
            .expect("save");

        let fetched = repo
            .find_by_id(saved.id.expect("assigned id"))
            .await
            .expect("find");
        assert_eq!(fetched, Some(saved));
    }
}
