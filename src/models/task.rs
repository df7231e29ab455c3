//! Task and schedulable-unit types.

use serde::{Deserialize, Serialize};

/// Identifier of a task or callback. Unique and positive; regular tasks
/// and callbacks live in two disjoint id spaces.
pub type TaskId = u32;

/// A unit of work at a location with a fixed duration and priority.
///
/// Regular tasks and callbacks share this shape; callbacks additionally
/// carry the trigger time at which they become known (minutes into the
/// multi-day horizon, so `trigger / 1440` is the day).
///
/// # Examples
///
/// ```
/// use field_dispatch::models::Task;
///
/// let t = Task::new(7, 3, 45, 1);
/// assert_eq!(t.id(), 7);
/// assert_eq!(t.duration(), 45);
/// assert!(t.trigger().is_none());
///
/// let cb = Task::callback(101, 3, 30, 2, 2000);
/// assert_eq!(cb.trigger(), Some(2000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    location: usize,
    duration: i64,
    priority: i32,
    trigger: Option<i64>,
}

impl Task {
    /// Creates a regular task.
    pub fn new(id: TaskId, location: usize, duration: i64, priority: i32) -> Self {
        Self {
            id,
            location,
            duration,
            priority,
            trigger: None,
        }
    }

    /// Creates a callback task with its trigger time.
    pub fn callback(id: TaskId, location: usize, duration: i64, priority: i32, trigger: i64) -> Self {
        Self {
            id,
            location,
            duration,
            priority,
            trigger: Some(trigger),
        }
    }

    /// Task identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Location index of the task.
    pub fn location(&self) -> usize {
        self.location
    }

    /// Work duration in minutes.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Task priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Trigger time, present only for callbacks.
    pub fn trigger(&self) -> Option<i64> {
        self.trigger
    }
}

/// A schedulable unit resolved from either id space.
///
/// Route-building code operates on this sum type instead of branching on
/// "is it a task or a callback" at every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit<'a> {
    /// A regular task from the task catalog.
    Ordinary(&'a Task),
    /// A callback from the callback catalog.
    Callback(&'a Task),
}

impl Unit<'_> {
    /// Identifier of the underlying unit.
    pub fn id(&self) -> TaskId {
        self.task().id()
    }

    /// Location index of the underlying unit.
    pub fn location(&self) -> usize {
        self.task().location()
    }

    /// Work duration of the underlying unit.
    pub fn duration(&self) -> i64 {
        self.task().duration()
    }

    /// Returns `true` for callback units.
    pub fn is_callback(&self) -> bool {
        matches!(self, Unit::Callback(_))
    }

    fn task(&self) -> &Task {
        match self {
            Unit::Ordinary(t) | Unit::Callback(t) => t,
        }
    }
}
