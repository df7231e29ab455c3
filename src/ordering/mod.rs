//! Precomputed orderings that drive seed selection.
//!
//! Built once from the catalog and shared read-only by the construction
//! phase.

mod order;

pub use order::TaskOrdering;
