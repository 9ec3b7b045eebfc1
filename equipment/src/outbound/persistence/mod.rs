//! Persistence adapters.
//!
//! Only the in-memory adapter ships with this crate; relational or remote
//! backends are expected to live with the deployment that needs them and
//! implement the same ports.

mod memory;

pub use memory::{InMemoryBikeRepository, InMemoryLockRepository, InMemoryStationRepository};
