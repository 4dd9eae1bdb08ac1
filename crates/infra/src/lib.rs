//! Infrastructure layer: document storage, repositories, services and wiring.
//!
//! Everything that touches the filesystem or coordinates more than one
//! collection lives here; the domain crates stay pure.

pub mod config;
pub mod repository;
pub mod services;
pub mod store;
