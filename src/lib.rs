//! # field-dispatch
//!
//! Field-service scheduling library: greedy insertion construction with
//! collaboration-synchronized support routes, resource×day grid
//! assignment, and online rescheduling of callback tasks.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Task, Resource, Catalog, Route, Solution)
//! - [`travel`] — Pairwise travel distance and time matrix
//! - [`proximity`] — Per-location nearest-neighbor rankings
//! - [`ordering`] — Duration, location, and demand orderings over the task set
//! - [`construct`] — Greedy insertion solver and route-to-resource assignment
//! - [`reschedule`] — Trigger-ordered callback replay against a built schedule
//! - [`error`] — Crate-wide error and result types
//!
//! ## Quick start
//!
//! ```
//! use field_dispatch::construct::InsertionSolver;
//! use field_dispatch::models::{Catalog, Resource, Shift, Task};
//! use field_dispatch::travel::TravelMatrix;
//!
//! let mut travel = TravelMatrix::new(3);
//! travel.set(0, 1, 4, 10);
//! travel.set(1, 0, 4, 10);
//! travel.set(1, 2, 2, 5);
//! travel.set(2, 1, 2, 5);
//!
//! let tasks = vec![Task::new(1, 1, 20, 0), Task::new(2, 2, 15, 0)];
//! let resources = vec![Resource::new(1, vec![Shift::new(0, 480, 480)], 1)];
//! let catalog = Catalog::new(travel, tasks, Vec::new(), resources);
//!
//! let report = InsertionSolver::new(&catalog).solve_by_distance().expect("solvable");
//! assert_eq!(report.solution.total_cost(), report.solution.travel_cost() + report.solution.waiting_cost());
//! ```

pub mod construct;
pub mod error;
pub mod models;
pub mod ordering;
pub mod proximity;
pub mod reschedule;
pub mod travel;

pub use error::{Error, Result};
