//! Crate-level error type.

use std::fmt;

use crate::models::TaskId;

/// Errors surfaced by scheduling operations.
///
/// Feasibility and capacity misses during greedy construction are local
/// decisions (skip or defer) and never reach this type; only structural
/// problems abort an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A stop id resolved to neither the task nor the callback catalog.
    UnknownUnit {
        /// The id that failed to resolve.
        id: TaskId,
    },
    /// More constructed routes than available resource×day grid cells.
    AssignmentOverflow {
        /// Routes that needed a cell.
        routes: usize,
        /// Cells available on the grid.
        cells: usize,
    },
    /// A callback id carries no trigger time.
    MissingTrigger {
        /// The callback id.
        id: TaskId,
    },
    /// A callback fired on a day with no assigned routes.
    NoActiveRoutes {
        /// Day column of the trigger.
        day: usize,
    },
    /// A callback stream was not in ascending trigger-time order.
    UnorderedCallbacks {
        /// Trigger of the preceding event.
        previous: i64,
        /// Trigger of the offending event.
        current: i64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownUnit { id } => {
                write!(f, "id {id} resolves to neither a task nor a callback")
            }
            Error::AssignmentOverflow { routes, cells } => {
                write!(f, "{routes} routes cannot fit on a {cells}-cell assignment grid")
            }
            Error::MissingTrigger { id } => {
                write!(f, "callback {id} has no trigger time")
            }
            Error::NoActiveRoutes { day } => {
                write!(f, "no routes assigned to day {day}")
            }
            Error::UnorderedCallbacks { previous, current } => {
                write!(
                    f,
                    "callback trigger {current} precedes already-processed trigger {previous}"
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_unit() {
        let e = Error::UnknownUnit { id: 42 };
        assert!(e.to_string().contains("42"));
    }

    #[test]
    fn test_display_overflow() {
        let e = Error::AssignmentOverflow { routes: 9, cells: 6 };
        let s = e.to_string();
        assert!(s.contains('9') && s.contains('6'));
    }

    #[test]
    fn test_display_unordered() {
        let e = Error::UnorderedCallbacks {
            previous: 900,
            current: 100,
        };
        assert!(e.to_string().contains("900"));
    }
}
