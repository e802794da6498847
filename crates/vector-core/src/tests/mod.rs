//! Crate-level tests driving [`VectorPlugin`](crate::plugin::VectorPlugin)
//! against the in-memory [`World`](crate::world::World).
//!
//! # Test Structure
//!
//! - `determinism.rs`: same seed and inputs give identical outputs
//! - `integration.rs`: end-to-end scenarios through the event methods
//! - `helpers.rs`: test host setup and factory functions

mod helpers;
