//! Storage collaborator ports for the three equipment tables.
//!
//! The lifecycle services and the orchestrator depend only on these traits;
//! any conforming adapter (in-memory, relational, remote) can be injected.
//! The crate ships an in-memory adapter in `outbound::persistence`.

mod bike_repository;
mod lock_repository;
mod station_repository;

#[cfg(test)]
pub use bike_repository::MockBikeRepository;
pub use bike_repository::BikeRepository;
#[cfg(test)]
pub use lock_repository::MockLockRepository;
pub use lock_repository::LockRepository;
#[cfg(test)]
pub use station_repository::MockStationRepository;
pub use station_repository::StationRepository;

/// Errors surfaced by storage adapters.
///
/// These describe faults in the collaborator itself, not domain outcomes;
/// services map them to [`crate::domain::ErrorCode::Internal`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The backend could not be reached.
    #[error("storage connection failed: {message}")]
    Connection { message: String },
    /// A query or write failed during execution.
    #[error("storage query failed: {message}")]
    Query { message: String },
}

impl RepositoryError {
    /// Build a [`RepositoryError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`RepositoryError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}
