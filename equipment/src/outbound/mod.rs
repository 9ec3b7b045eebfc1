//! Driven adapters implementing the domain's storage ports.

pub mod persistence;
