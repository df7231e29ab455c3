//! Precomputed nearest-neighbor rankings of locations.
//!
//! Built once from the travel matrix and shared read-only by the
//! construction and rescheduling phases.

mod index;

pub use index::ProximityIndex;
