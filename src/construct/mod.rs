//! Greedy construction of an initial schedule.
//!
//! - [`InsertionSolver`] — nearest-neighbor insertion with
//!   collaboration-synchronized support routes
//! - [`assign_routes`] — bipartite placement of constructed routes onto
//!   the resource×day grid

mod assign;
mod insertion;

pub use assign::assign_routes;
pub use insertion::{InsertionSolver, SolveReport};
