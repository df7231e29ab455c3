//! Distance and travel-time matrices.
//!
//! Provides the dense, possibly asymmetric travel matrix the rest of the
//! crate reads from.

mod matrix;

pub use matrix::TravelMatrix;
