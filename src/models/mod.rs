//! Domain model types for field-service scheduling.
//!
//! Provides the core abstractions: tasks and callbacks resolved through a
//! common schedulable-unit view, resources with per-day shift windows, the
//! validated problem catalog, routes as timed stop sequences, and the
//! solution with its resource×day assignment grid.

mod catalog;
mod resource;
mod route;
mod solution;
mod task;

pub use catalog::Catalog;
pub use resource::{Resource, Shift};
pub use route::Route;
pub use solution::Solution;
pub use task::{Task, TaskId, Unit};
