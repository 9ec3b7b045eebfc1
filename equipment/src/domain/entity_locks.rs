//! Per-entity mutual exclusion for compound workflows.
//!
//! Every orchestrator operation touches two or three entities and must appear
//! atomic to concurrent callers. The registry hands out one async mutex per
//! entity identifier; a workflow acquires every identifier it will touch
//! before validating preconditions and holds the guards until its final write
//! commits.
//!
//! Acquisition always happens in the canonical order given by
//! [`EntityKey`]'s derived `Ord` (entity kind first, ascending identifier
//! within a kind), so two workflows contending for overlapping sets cannot
//! deadlock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::bike::BikeId;
use super::lock::LockId;
use super::station::StationId;

/// Identity of a lockable entity across the three tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKey {
    Bike(BikeId),
    Lock(LockId),
    Station(StationId),
}

/// Hands out per-identifier mutexes to compound workflows.
///
/// Mutex cells are created lazily on first use of an identifier and kept for
/// the registry's lifetime; the population is bounded by the fleet size.
#[derive(Debug, Default)]
pub struct EntityLockRegistry {
    cells: Mutex<HashMap<EntityKey, Arc<AsyncMutex<()>>>>,
}

/// Guards held for one compound workflow. Dropping releases every entity.
#[derive(Debug)]
pub struct EntityGuards {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl EntityLockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire exclusive access to every given entity, waiting on contended
    /// entries. Duplicate keys are collapsed; acquisition follows the
    /// canonical key order regardless of the order keys are passed in.
    pub async fn acquire(&self, mut keys: Vec<EntityKey>) -> EntityGuards {
        keys.sort_unstable();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.cell(key).lock_owned().await);
        }
        EntityGuards { _guards: guards }
    }

    fn cell(&self, key: EntityKey) -> Arc<AsyncMutex<()>> {
        let mut cells = self
            .cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cells.entry(key).or_default())
    }
}
