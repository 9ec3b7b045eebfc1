//! Equipment lifecycle and orchestration for a bike-share docking network.
//!
//! The crate tracks three linked asset types (bicycles, docking locks and
//! stations) and enforces which state transitions are legal, in what order,
//! and which compensating updates must happen together when a workflow spans
//! two or three assets at once.
//!
//! Transport, input validation and durable storage are external
//! collaborators: callers drive the services in [`domain`] directly and
//! inject any storage adapter conforming to [`domain::ports`]. An in-memory
//! adapter ships in [`outbound::persistence`].

pub mod domain;
pub mod outbound;
